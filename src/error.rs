use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: reqwest::StatusCode },
    #[error("input is missing required column '{0}'")]
    MissingColumn(String),
    #[error("input has no worksheet or headers: {0}")]
    EmptyInput(String),
    #[error("browser error: {0}")]
    Browser(String),
    #[error("invalid selector '{0}'")]
    Selector(String),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}
