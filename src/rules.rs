//! Declarative lookup rules for the product detail page.
//!
//! Every scraped attribute is described by a [`FieldRule`]: which [`Field`] it
//! fills and how to find it. [`apply_rule`] is the single interpreter for all
//! of them, so each rule can be checked against fixture HTML on its own.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use log::warn;
use crate::product::{Field, FieldValue, NOT_AVAILABLE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty `item` texts inside the first `container`.
    Tokens { container: &'static str, item: &'static str },
    /// Text of the first element matching `selector`.
    Text { selector: &'static str },
    /// `"name: url"` for every link in the block headed by `heading`.
    Links { heading: &'static str },
    /// `"key: value"` rows of the first table after the `heading` h3.
    KeyValueTable { heading: &'static str },
    /// Bullets of the first list after the paragraph containing `marker`.
    MarkedList { marker: &'static str },
    /// Option pickers on the rendered page, as `"label:"`, value pairs.
    OptionLabels {
        entry: &'static str,
        label: &'static str,
        selected: &'static str,
        fallback: &'static str,
    },
    /// Gallery images inside a lightbox opened by clicking `trigger`.
    ModalImages {
        trigger: &'static str,
        modal: &'static str,
        gallery: &'static str,
        needle: &'static str,
    },
}

/// Which page state a rule has to be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Plain HTTP response body.
    Static,
    /// DOM after scripts ran in the rendering session.
    Rendered,
    /// Outer HTML captured after an interaction.
    Captured,
}

impl Rule {
    pub fn source(&self) -> Source {
        match self {
            Rule::OptionLabels { .. } => Source::Rendered,
            Rule::ModalImages { .. } => Source::Captured,
            _ => Source::Static,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: Field,
    pub rule: Rule,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldMiss {
    #[error("no element matches '{0}'")]
    Missing(String),
    #[error("no heading '{0}'")]
    Heading(String),
    #[error("nothing follows '{0}'")]
    NoFollowing(String),
    #[error("invalid selector '{0}'")]
    Selector(String),
}

const HEADING: &str = "h3";

/// Lookup table for the retailer's detail page layout.
pub fn field_rules() -> Vec<FieldRule> {
    use Field::*;
    let table = |field, heading| FieldRule { field, rule: Rule::KeyValueTable { heading } };

    vec![
        FieldRule {
            field: Classification,
            rule: Rule::Tokens { container: "section.dn.flex-ns.pb3", item: "li span" },
        },
        FieldRule { field: Name, rule: Rule::Text { selector: "span.fw2.di-ns" } },
        FieldRule {
            field: Finish,
            rule: Rule::Text { selector: r#"span[data-automation="finish-name"]"# },
        },
        FieldRule { field: ManufacturerResources, rule: Rule::Links { heading: "Manufacturer Resources" } },
        table(DimensionsMeasurements, "Dimensions and Measurements"),
        table(IncludedComponents, "Included Components"),
        table(CharacteristicsFeatures, "Characteristics and Features"),
        table(ElectricalOperationalInformation, "Electrical and Operational Information"),
        table(WarrantyProductInformation, "Warranty and Product Information"),
        FieldRule { field: Features, rule: Rule::MarkedList { marker: "Features:" } },
        FieldRule { field: Specifications, rule: Rule::MarkedList { marker: "Specifications:" } },
        FieldRule {
            field: Categories,
            rule: Rule::OptionLabels {
                entry: "li.flex.flex-column.items-start.justify-between.w-100",
                label: "h3.ma0.tc1-title",
                // The darker, thicker border marks the chosen swatch.
                selected: "button.pa0.b--solid.br2.ba.bg-transparent.pointer.b--theme-grey-darker.bw1 div.tc2-title.tl.f6",
                fallback: "div.input.ph3.flex.justify-between.items-center span",
            },
        },
        FieldRule {
            field: ImageUrl,
            rule: Rule::ModalImages {
                trigger: "div.react-transform-component",
                modal: "div.lh-copy.bg-theme-white.h-100.pa4",
                gallery: "div.w-100.w-60-ns",
                needle: ".jpg",
            },
        },
    ]
}

/// Interprets `rule` against `document`.
pub fn apply_rule(document: &Html, rule: &Rule) -> Result<FieldValue, FieldMiss> {
    match rule {
        Rule::Tokens { container, item } => {
            let container_el = first(document, container)?;
            let item_sel = selector(item)?;
            let tokens = container_el
                .select(&item_sel)
                .map(text_of)
                .filter(|t| !t.is_empty())
                .collect();
            Ok(FieldValue::List(tokens))
        }
        Rule::Text { selector: css } => Ok(FieldValue::Text(text_of(first(document, css)?))),
        Rule::Links { heading } => {
            let heading_el = find_heading(document, heading)?;
            let block = heading_el
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|el| el.value().name() == "div")
                .ok_or_else(|| FieldMiss::NoFollowing(heading.to_string()))?;

            let link_sel = selector("a[href]")?;
            let span_sel = selector("span")?;
            let links = block
                .select(&link_sel)
                .filter_map(|a| {
                    let href = a.value().attr("href")?;
                    let name = a
                        .select(&span_sel)
                        .next()
                        .map(text_of)
                        .unwrap_or_else(|| "Unknown".to_string());
                    Some(format!("{}: {}", name, absolute_protocol(href.trim())))
                })
                .collect();
            Ok(FieldValue::List(links))
        }
        Rule::KeyValueTable { heading } => {
            let table = next_after(document, HEADING, |el| text_of(*el) == *heading, "table", heading)?;
            Ok(FieldValue::List(table_pairs(table)?))
        }
        Rule::MarkedList { marker } => {
            let list = next_after(document, "p", |el| text_of(*el).contains(marker), "ul", marker)?;
            let li_sel = selector("li")?;
            Ok(FieldValue::List(list.select(&li_sel).map(text_of).collect()))
        }
        Rule::OptionLabels { entry, label, selected, fallback } => {
            let entry_sel = selector(entry)?;
            let label_sel = selector(label)?;
            let selected_sel = selector(selected)?;
            let fallback_sel = selector(fallback)?;

            let mut pairs = Vec::new();
            let mut entries = 0;
            for item in document.select(&entry_sel) {
                entries += 1;
                let Some(label_el) = item.select(&label_sel).next() else {
                    warn!("Option entry {} has no label; skipped", entries);
                    continue;
                };
                let value = item
                    .select(&selected_sel)
                    .next()
                    .or_else(|| item.select(&fallback_sel).next())
                    .map(text_of);
                match value {
                    Some(value) => {
                        pairs.push(format!("{}:", text_of(label_el)));
                        pairs.push(value);
                    }
                    None => warn!("Option '{}' has no selected value; skipped", text_of(label_el)),
                }
            }
            if entries == 0 {
                return Err(FieldMiss::Missing(entry.to_string()));
            }
            Ok(FieldValue::List(pairs))
        }
        Rule::ModalImages { gallery, needle, .. } => {
            let gallery_el = first(document, gallery)?;
            let img_sel = selector("img[src]")?;
            let urls = gallery_el
                .select(&img_sel)
                .filter_map(|img| img.value().attr("src"))
                .filter(|src| src.contains(needle))
                .map(|src| absolute_protocol(src.trim()))
                .collect();
            Ok(FieldValue::List(urls))
        }
    }
}

fn selector(css: &str) -> Result<Selector, FieldMiss> {
    Selector::parse(css).map_err(|_| FieldMiss::Selector(css.to_string()))
}

fn first<'a>(document: &'a Html, css: &str) -> Result<ElementRef<'a>, FieldMiss> {
    let sel = selector(css)?;
    document
        .select(&sel)
        .next()
        .ok_or_else(|| FieldMiss::Missing(css.to_string()))
}

fn find_heading<'a>(document: &'a Html, heading: &str) -> Result<ElementRef<'a>, FieldMiss> {
    let sel = selector(HEADING)?;
    document
        .select(&sel)
        .find(|el| text_of(*el) == heading)
        .ok_or_else(|| FieldMiss::Heading(heading.to_string()))
}

/// First `target` element after the first `anchor` accepted by `is_anchor`,
/// in document order. `label` names the anchor in the miss.
fn next_after<'a>(
    document: &'a Html,
    anchor: &str,
    is_anchor: impl Fn(&ElementRef<'a>) -> bool,
    target: &str,
    label: &str,
) -> Result<ElementRef<'a>, FieldMiss> {
    let both = selector(&format!("{}, {}", anchor, target))?;
    let mut seen_anchor = false;
    for el in document.select(&both) {
        if seen_anchor && el.value().name() == target {
            return Ok(el);
        }
        if !seen_anchor && el.value().name() == anchor && is_anchor(&el) {
            seen_anchor = true;
        }
    }
    if seen_anchor {
        Err(FieldMiss::NoFollowing(label.to_string()))
    } else {
        Err(FieldMiss::Heading(label.to_string()))
    }
}

fn table_pairs(table: ElementRef) -> Result<Vec<String>, FieldMiss> {
    let tr_sel = selector("tr")?;
    let td_sel = selector("td")?;
    let key_sel = selector("td.w-50 span")?;

    let pairs = table
        .select(&tr_sel)
        .filter(|tr| tr.select(&td_sel).next().is_some())
        .map(|tr| {
            let key = tr
                .select(&key_sel)
                .next()
                .map(text_of)
                .unwrap_or_else(|| "Unknown".to_string());
            let value = tr
                .select(&td_sel)
                .nth(1)
                .map(text_of)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            format!("{}: {}", key, value)
        })
        .collect();
    Ok(pairs)
}

/// Visible text with runs of whitespace collapsed.
pub fn text_of(el: ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `//host/path` becomes `https://host/path`; anything else is returned as-is.
pub fn absolute_protocol(href: &str) -> String {
    if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    }
}
