use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::Deserialize;
use log::{info, error};
use crate::error::ScrapeError;
use crate::fetcher::DEFAULT_USER_AGENT;

pub const CONFIG_FILE: &str = "scraper.json";

/// Run settings. Every field has a default, so the config file is optional
/// and may list only the values it changes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub log_path: PathBuf,
    pub base_url: String,
    pub model_column: String,
    pub row_delay_secs: u64,
    pub render_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Only the first N rows are scraped when set; the rest pass through untouched.
    pub max_rows: Option<usize>,
    pub headless: bool,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_path: PathBuf::from("inventory_feed.csv"),
            output_path: PathBuf::from("updated_products.csv"),
            log_path: PathBuf::from("scraping.log"),
            base_url: "https://www.build.com".to_string(),
            model_column: "Model#".to_string(),
            row_delay_secs: 2,
            render_timeout_secs: 10,
            request_timeout_secs: 30,
            max_rows: None,
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Where the running config came from. Config is read before the logger
/// exists, so this is kept and reported once logging is up.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
    Rejected { path: PathBuf, reason: String },
}

impl ConfigSource {
    pub fn report(&self) {
        match self {
            ConfigSource::Defaults => info!("No config file found. Using defaults."),
            ConfigSource::File(path) => info!("Loaded config from {:?}", path),
            ConfigSource::Rejected { path, reason } => {
                error!("Failed to load config file {:?}: {}. Using defaults.", path, reason)
            }
        }
    }
}

impl Config {
    /// Reads `path` if it exists; a missing file means defaults.
    /// Runs before the logger is installed, so the caller reports the outcome.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>, ScrapeError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str::<Config>(&content)?))
    }

    /// Like [`Config::load`], but never fails: a bad file falls back to
    /// defaults and the reason travels in the returned [`ConfigSource`].
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> (Self, ConfigSource) {
        let path = path.as_ref();
        match Config::load(path) {
            Ok(Some(config)) => (config, ConfigSource::File(path.to_path_buf())),
            Ok(None) => (Config::default(), ConfigSource::Defaults),
            Err(e) => (
                Config::default(),
                ConfigSource::Rejected { path: path.to_path_buf(), reason: e.to_string() },
            ),
        }
    }

    /// Positional `[INPUT] [OUTPUT]` paths override the file.
    pub fn with_args<I: IntoIterator<Item = String>>(mut self, args: I) -> Self {
        let mut args = args.into_iter();
        if let Some(input) = args.next() {
            self.input_path = PathBuf::from(input);
        }
        if let Some(output) = args.next() {
            self.output_path = PathBuf::from(output);
        }
        self
    }

    pub fn row_delay(&self) -> Duration {
        Duration::from_secs(self.row_delay_secs)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(dir.path().join("absent.json")).unwrap().is_none());
        assert_eq!(Config::default().max_rows, None);
    }

    #[test]
    fn test_partial_file_overrides_only_listed_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "max_rows": 6, "row_delay_secs": 0, "model_column": "SKU" }"#).unwrap();

        let config = Config::load(&path).unwrap().unwrap();

        assert_eq!(config.max_rows, Some(6));
        assert_eq!(config.row_delay(), Duration::ZERO);
        assert_eq!(config.model_column, "SKU");
        assert_eq!(config.base_url, "https://www.build.com");
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ScrapeError::Config(_))));

        let (config, source) = Config::load_or_default(&path);
        assert_eq!(config, Config::default());
        assert!(matches!(source, ConfigSource::Rejected { ref reason, .. } if reason.starts_with("invalid config")));
    }

    #[test]
    fn test_load_or_default_names_its_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert_eq!(Config::load_or_default(&path).1, ConfigSource::Defaults);

        fs::write(&path, r#"{ "headless": false }"#).unwrap();
        let (config, source) = Config::load_or_default(&path);
        assert!(!config.headless);
        assert_eq!(source, ConfigSource::File(path));
    }

    #[test]
    fn test_positional_paths_override() {
        let config = Config::default().with_args(vec!["in.xlsx".to_string(), "out/result.csv".to_string()]);
        assert_eq!(config.input_path, PathBuf::from("in.xlsx"));
        assert_eq!(config.output_path, PathBuf::from("out/result.csv"));

        let only_input = Config::default().with_args(vec!["feed.csv".to_string()]);
        assert_eq!(only_input.output_path, PathBuf::from("updated_products.csv"));
    }
}
