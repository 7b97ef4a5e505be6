use log::{info, warn};
use crate::delay_manager::DelayManager;
use crate::extractor::DetailExtractor;
use crate::fetcher::PageFetcher;
use crate::input_loader::{Row, Table};
use crate::row_updater::{self, RowStatus};
use crate::search_engine::SearchResolver;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub found: usize,
    pub not_found: usize,
    pub invalid: usize,
    /// Rows past the row cap, passed through untouched.
    pub skipped: usize,
}

impl BatchSummary {
    fn record(&mut self, status: RowStatus) {
        match status {
            RowStatus::Found => self.found += 1,
            RowStatus::NotFound => self.not_found += 1,
            RowStatus::InvalidModel => self.invalid += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.found + self.not_found + self.invalid + self.skipped
    }
}

/// Walks the table top to bottom, one row at a time: resolve the model,
/// scrape its detail page, merge the result back into the row.
pub struct BatchDriver<'a, F: PageFetcher> {
    resolver: SearchResolver<'a, F>,
    extractor: DetailExtractor<'a, F>,
    delay: DelayManager,
    model_column: String,
    max_rows: Option<usize>,
}

impl<'a, F: PageFetcher> BatchDriver<'a, F> {
    pub fn new(
        resolver: SearchResolver<'a, F>,
        extractor: DetailExtractor<'a, F>,
        delay: DelayManager,
        model_column: &str,
    ) -> Self {
        BatchDriver {
            resolver,
            extractor,
            delay,
            model_column: model_column.to_string(),
            max_rows: None,
        }
    }

    /// Processes only the first `max_rows` rows; later rows keep their
    /// input values, blank Status included.
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn delay(&self) -> &DelayManager {
        &self.delay
    }

    /// Updates every row of `table` in place, keeping row order.
    pub fn run(&self, table: &mut Table) -> BatchSummary {
        let total = table.rows.len();
        let mut summary = BatchSummary::default();
        let mut network_rows = 0;

        let rows = std::mem::take(&mut table.rows);
        table.rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                if self.max_rows.map_or(false, |cap| i >= cap) {
                    summary.skipped += 1;
                    return row;
                }

                let model = row
                    .get(&self.model_column)
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string);

                let (row, status) = match model {
                    None => {
                        warn!("No valid model found in row {}. Skipping.", i + 1);
                        (row_updater::mark_unresolved(row, RowStatus::InvalidModel), RowStatus::InvalidModel)
                    }
                    Some(model) => {
                        network_rows += 1;
                        if network_rows > 1 {
                            self.delay.row_delay();
                        }
                        info!("Processing {} / {} : {}", i + 1, total, model);
                        self.process_model(row, &model)
                    }
                };

                summary.record(status);
                row
            })
            .collect();

        info!(
            "Batch complete: {} rows ({} found, {} not found, {} invalid, {} past row cap)",
            summary.total(),
            summary.found,
            summary.not_found,
            summary.invalid,
            summary.skipped
        );
        summary
    }

    fn process_model(&self, row: Row, model: &str) -> (Row, RowStatus) {
        let Some(url) = self.resolver.resolve(model) else {
            warn!("Skipping model {} due to search failure.", model);
            return (row_updater::mark_unresolved(row, RowStatus::NotFound), RowStatus::NotFound);
        };

        let detail = self.extractor.extract(&url);
        info!("Model {} found: {}", model, url);
        (row_updater::merge(row, &detail), RowStatus::Found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::time::Duration;
    use crate::error::ScrapeError;
    use crate::input_loader::{ensure_columns, load_table, STATUS_COLUMN};
    use crate::output_writer::write_table;
    use crate::product::Field;

    const BASE: &str = "https://www.build.com";

    struct FakeSite {
        pages: HashMap<String, String>,
        requested: RefCell<Vec<String>>,
    }

    impl FakeSite {
        fn new() -> Self {
            let mut pages = HashMap::new();
            pages.insert(
                format!("{}/search?term=ABC123", BASE),
                r#"<a class="f-inherit fw-inherit link theme-primary db center mw5" href="/abc123/s1">ABC</a>"#
                    .to_string(),
            );
            pages.insert(
                format!("{}/abc123/s1", BASE),
                r#"<h3>Dimensions and Measurements</h3>
                   <table><tr><td class="w-50"><span>Height</span></td><td>12 in</td></tr></table>"#
                    .to_string(),
            );
            pages.insert(format!("{}/search?term=GONE", BASE), "<p>No results</p>".to_string());
            FakeSite { pages, requested: RefCell::new(Vec::new()) }
        }
    }

    impl PageFetcher for FakeSite {
        fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
            self.requested.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| ScrapeError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
        }
    }

    fn input_table() -> Table {
        let mut table = Table::new(vec!["Model#".into(), "Brand".into()]);
        table.push_cells(["ABC123", "Acme"]);
        table.push_cells(["", "Blank"]);
        table.push_cells(["GONE", "Other"]);
        table.push_cells(["   ", "Spaces"]);
        ensure_columns(&mut table);
        table
    }

    fn driver(site: &FakeSite) -> BatchDriver<'_, FakeSite> {
        let resolver = SearchResolver::new(site, BASE).unwrap();
        let extractor = DetailExtractor::new(site, None, Duration::from_secs(1));
        BatchDriver::new(resolver, extractor, DelayManager::new(Duration::ZERO), "Model#")
    }

    fn run(site: &FakeSite, table: &mut Table) -> BatchSummary {
        driver(site).run(table)
    }

    #[test]
    fn test_every_row_gets_a_status_in_order() {
        let site = FakeSite::new();
        let mut table = input_table();

        let summary = run(&site, &mut table);

        assert_eq!(summary, BatchSummary { found: 1, not_found: 1, invalid: 2, skipped: 0 });
        let statuses: Vec<_> = table.rows.iter().map(|r| r.get(STATUS_COLUMN).unwrap()).collect();
        assert_eq!(statuses, ["Found", "Invalid model", "Not found", "Invalid model"]);
        let brands: Vec<_> = table.rows.iter().map(|r| r.get("Brand").unwrap()).collect();
        assert_eq!(brands, ["Acme", "Blank", "Other", "Spaces"]);
    }

    #[test]
    fn test_found_row_carries_scraped_table() {
        let site = FakeSite::new();
        let mut table = input_table();
        run(&site, &mut table);

        let found = &table.rows[0];
        assert_eq!(found.get("Dimensions&Measurements"), Some("Height: 12 in"));
        assert_eq!(found.get("Name"), Some("N/A"));
    }

    #[test]
    fn test_unresolved_rows_keep_defaults_and_skip_network() {
        let site = FakeSite::new();
        let mut table = input_table();
        run(&site, &mut table);

        for row in &table.rows[1..] {
            for field in Field::ALL {
                assert_eq!(row.get(field.column()), Some("N/A"));
            }
        }
        assert_eq!(
            site.requested.borrow().as_slice(),
            [
                format!("{}/search?term=ABC123", BASE),
                format!("{}/abc123/s1", BASE),
                format!("{}/search?term=GONE", BASE),
            ]
        );
    }

    #[test]
    fn test_rerun_on_output_is_idempotent() {
        let site = FakeSite::new();
        let mut table = input_table();
        run(&site, &mut table);
        let first = table.clone();

        run(&site, &mut table);

        assert_eq!(table, first);
    }

    #[test]
    fn test_delay_only_between_network_rows() {
        let site = FakeSite::new();
        let mut table = Table::new(vec!["Model#".into()]);
        table.push_cells([""]);
        table.push_cells(["ABC123"]);
        table.push_cells([" "]);
        table.push_cells(["GONE"]);
        table.push_cells([""]);
        ensure_columns(&mut table);

        let driver = driver(&site);
        driver.run(&mut table);

        // Two network rows, so exactly one pause between them.
        assert_eq!(driver.delay().pauses(), 1);
    }

    #[test]
    fn test_row_cap_keeps_every_row_in_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, "Model#,Brand\nABC123,Acme\nGONE,Other\nABC123,Third\n,Fourth\n").unwrap();

        let site = FakeSite::new();
        let mut table = load_table(&input, "Model#").unwrap();
        ensure_columns(&mut table);
        let summary = driver(&site).with_max_rows(Some(2)).run(&mut table);
        write_table(&table, &output).unwrap();

        let written = load_table(&output, "Model#").unwrap();
        assert_eq!(written.rows.len(), 4);
        assert_eq!(summary, BatchSummary { found: 1, not_found: 1, invalid: 0, skipped: 2 });
        let statuses: Vec<_> = written.rows.iter().map(|r| r.get(STATUS_COLUMN).unwrap()).collect();
        assert_eq!(statuses, ["Found", "Not found", "", ""]);
        assert_eq!(written.rows[2].get("Brand"), Some("Third"));
        assert_eq!(written.rows[2].get("Dimensions&Measurements"), Some("N/A"));
        assert_eq!(site.requested.borrow().len(), 3);
    }
}
