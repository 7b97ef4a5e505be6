use std::time::Duration;
use scraper::Html;
use log::{info, warn, error};
use crate::fetcher::PageFetcher;
use crate::product::{Field, ProductDetail};
use crate::render_session::RenderSession;
use crate::rules::{apply_rule, field_rules, FieldRule, Rule, Source};

/// Scrapes one product detail page into a [`ProductDetail`].
///
/// Never fails as a whole: every field is looked up on its own and a field
/// that cannot be found is logged and left empty.
pub struct DetailExtractor<'a, F: PageFetcher> {
    fetcher: &'a F,
    session: Option<&'a dyn RenderSession>,
    rules: Vec<FieldRule>,
    render_timeout: Duration,
}

impl<'a, F: PageFetcher> DetailExtractor<'a, F> {
    pub fn new(fetcher: &'a F, session: Option<&'a dyn RenderSession>, render_timeout: Duration) -> Self {
        DetailExtractor {
            fetcher,
            session,
            rules: field_rules(),
            render_timeout,
        }
    }

    pub fn extract(&self, url: &str) -> ProductDetail {
        let mut detail = ProductDetail::default();

        match self.fetcher.fetch(url) {
            Ok(html) => {
                let document = Html::parse_document(&html);
                for rule in self.rules_for(Source::Static) {
                    self.apply(&document, rule, url, &mut detail);
                }
            }
            Err(e) => error!("Failed to retrieve product page {}: {}", url, e),
        }

        match self.session {
            Some(session) => self.extract_rendered(session, url, &mut detail),
            None => warn!("No rendering session; Categories and Image_URL left empty for {}", url),
        }

        info!(
            "Extracted {} of {} fields from {}",
            detail.populated(),
            Field::ALL.len(),
            url
        );
        detail
    }

    fn extract_rendered(&self, session: &dyn RenderSession, url: &str, detail: &mut ProductDetail) {
        let html = match session.load(url) {
            Ok(html) => html,
            Err(e) => {
                error!("Failed to render product page {}: {}", url, e);
                return;
            }
        };

        let document = Html::parse_document(&html);
        for rule in self.rules_for(Source::Rendered) {
            self.apply(&document, rule, url, detail);
        }

        for rule in self.rules_for(Source::Captured) {
            let Rule::ModalImages { trigger, modal, .. } = &rule.rule else {
                continue;
            };
            match session.click_and_capture(trigger, modal, self.render_timeout) {
                Ok(fragment) => self.apply(&Html::parse_fragment(&fragment), rule, url, detail),
                Err(e) => warn!("{} not captured from {}: {}", rule.field.column(), url, e),
            }
        }
    }

    fn rules_for(&self, source: Source) -> impl Iterator<Item = &FieldRule> {
        self.rules.iter().filter(move |r| r.rule.source() == source)
    }

    fn apply(&self, document: &Html, rule: &FieldRule, url: &str, detail: &mut ProductDetail) {
        match apply_rule(document, &rule.rule) {
            Ok(value) => detail.set(rule.field, value),
            Err(miss) => warn!("{} not found on {}: {}", rule.field.column(), url, miss),
        }
    }
}
