use product_scraper_lib::{input_loader, output_writer, logger, config};
use product_scraper_lib::{BatchDriver, ChromeSession, Config, DetailExtractor, HttpFetcher, RenderSession, SearchResolver, SessionOptions};
use product_scraper_lib::delay_manager::DelayManager;

use std::error::Error;
use log::{info, error};

fn main() -> Result<(), Box<dyn Error>> {
    // Positional paths only: product_scraper [INPUT] [OUTPUT]
    let (config, source) = Config::load_or_default(config::CONFIG_FILE);
    let config = config.with_args(std::env::args().skip(1));
    logger::init(&config.log_path);
    info!("Starting Product Scraper...");
    source.report();

    // 1. Load Inputs
    let mut table = match input_loader::load_table(&config.input_path, &config.model_column) {
        Ok(table) => table,
        Err(e) => {
            error!("Failed to read input {:?}: {}", config.input_path, e);
            return Err(e.into());
        }
    };
    input_loader::ensure_columns(&mut table);
    if let Some(cap) = config.max_rows {
        info!("Row cap active: processing at most {} rows.", cap);
    }

    // 2. Initialize Engines
    let fetcher = HttpFetcher::new(&config.user_agent, config.request_timeout())?;
    let session = match ChromeSession::launch(&SessionOptions {
        headless: config.headless,
        user_agent: config.user_agent.clone(),
        page_timeout: config.request_timeout(),
    }) {
        Ok(session) => Some(session),
        Err(e) => {
            error!("Could not start rendering session: {}. Categories and Image_URL will be N/A.", e);
            None
        }
    };

    let resolver = SearchResolver::new(&fetcher, &config.base_url)?;
    let extractor = DetailExtractor::new(
        &fetcher,
        session.as_ref().map(|s| s as &dyn RenderSession),
        config.render_timeout(),
    );
    let driver = BatchDriver::new(resolver, extractor, DelayManager::new(config.row_delay()), &config.model_column)
        .with_max_rows(config.max_rows);

    // 3. Scrape
    let summary = driver.run(&mut table);
    drop(driver);
    drop(session);

    // 4. Save
    if let Err(e) = output_writer::write_table(&table, &config.output_path) {
        error!("Failed to save output {:?}: {}", config.output_path, e);
        return Err(e.into());
    }

    info!(
        "Scraping Completed. {} rows: {} found, {} not found, {} invalid.",
        summary.total(),
        summary.found,
        summary.not_found,
        summary.invalid
    );
    Ok(())
}
