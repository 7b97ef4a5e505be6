pub mod error;
pub mod product;
pub mod input_loader;
pub mod output_writer;
pub mod fetcher;
pub mod render_session;
pub mod rules;
pub mod extractor;
pub mod search_engine;
pub mod row_updater;
pub mod delay_manager;
pub mod batch_driver;
pub mod config;
pub mod logger;

// Exporting types for convenience
pub use error::ScrapeError;
pub use product::{Field, FieldValue, ProductDetail};
pub use input_loader::{Row, Table};
pub use fetcher::{PageFetcher, HttpFetcher};
pub use render_session::{RenderSession, ChromeSession, SessionOptions};
pub use extractor::DetailExtractor;
pub use search_engine::SearchResolver;
pub use row_updater::RowStatus;
pub use batch_driver::{BatchDriver, BatchSummary};
pub use config::{Config, ConfigSource};
