use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use headless_chrome::{Browser, LaunchOptions, Tab};
use log::{info, debug};
use crate::error::ScrapeError;

/// A page session that runs scripts and can be clicked through.
/// Only the fields that need live page state go through here.
pub trait RenderSession {
    /// Navigates to `url` and returns the DOM once the page has loaded.
    fn load(&self, url: &str) -> Result<String, ScrapeError>;

    /// Clicks `trigger` once it shows up, then waits for `target` and returns
    /// its outer HTML. Each wait is bounded by `timeout`.
    fn click_and_capture(&self, trigger: &str, target: &str, timeout: Duration) -> Result<String, ScrapeError>;
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub headless: bool,
    pub user_agent: String,
    pub page_timeout: Duration,
}

/// Headless Chrome with a single tab, kept open for the whole run.
/// The browser process is shut down when this is dropped.
pub struct ChromeSession {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    pub fn launch(options: &SessionOptions) -> Result<Self, ScrapeError> {
        let args = vec![
            OsStr::new("--disable-gpu"),
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-extensions"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new("--force-device-scale-factor=1"),
        ];

        let browser = Browser::new(LaunchOptions {
            headless: options.headless,
            window_size: Some((1920, 1080)),
            args,
            // Must outlast the gap between two rendered rows.
            idle_browser_timeout: Duration::from_secs(600),
            ..Default::default()
        })
        .map_err(browser_error)?;

        let tab = browser.new_tab().map_err(browser_error)?;
        tab.set_user_agent(&options.user_agent, Some("en-US,en;q=0.9"), None)
            .map_err(browser_error)?;
        tab.set_default_timeout(options.page_timeout);

        info!("Rendering session started (headless: {})", options.headless);
        Ok(ChromeSession { _browser: browser, tab })
    }
}

impl RenderSession for ChromeSession {
    fn load(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("Rendering {}", url);
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(browser_error)?;
        self.tab.get_content().map_err(browser_error)
    }

    fn click_and_capture(&self, trigger: &str, target: &str, timeout: Duration) -> Result<String, ScrapeError> {
        let element = self
            .tab
            .wait_for_element_with_custom_timeout(trigger, timeout)
            .map_err(browser_error)?;
        element.click().map_err(browser_error)?;

        let captured = self
            .tab
            .wait_for_element_with_custom_timeout(target, timeout)
            .map_err(browser_error)?;
        captured.get_content().map_err(browser_error)
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        info!("Rendering session closed.");
    }
}

fn browser_error(e: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::Browser(e.to_string())
}
