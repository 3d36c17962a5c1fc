//! # fetch::session
//!
//! [`BrowserSession`] owns the single WebDriver session the rendered backend
//! drives.  It is created lazily on first [`acquire`](BrowserSession::acquire)
//! and thrown away on [`reset`](BrowserSession::reset); a session that hit an
//! error is never reused.

use std::time::Duration;

use fantoccini::wd::{Capabilities, TimeoutConfiguration};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tracing::{debug, info, warn};

use super::FetchError;

pub struct BrowserSession {
    webdriver_url: String,
    headless: bool,
    page_load_timeout: Duration,
    client: Option<Client>,
}

impl BrowserSession {
    pub fn new(webdriver_url: &str, headless: bool, page_load_timeout: Duration) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            headless,
            page_load_timeout,
            client: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.client.is_some()
    }

    /// Return the live session, connecting first if there is none.
    pub async fn acquire(&mut self) -> Result<Client, FetchError> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }

        let client = self.connect().await?;
        self.client = Some(client.clone());
        Ok(client)
    }

    /// Close the session if one is open.  Close failures are logged only:
    /// the handle is dropped either way.
    pub async fn release(&mut self) {
        if let Some(client) = self.client.take() {
            match client.close().await {
                Ok(()) => info!("Browser session closed"),
                Err(e) => warn!(error = %e, "Browser session did not close cleanly"),
            }
        }
    }

    /// Discard the current session; the next `acquire` starts a new one.
    pub async fn reset(&mut self) {
        debug!(open = self.is_open(), "Resetting browser session");
        self.release().await;
    }

    fn capabilities(&self) -> Capabilities {
        let mut args = vec![
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--window-size=1920,1080",
        ];
        if self.headless {
            args.push("--headless=new");
        }

        let mut caps = Capabilities::new();
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }

    async fn connect(&self) -> Result<Client, FetchError> {
        info!(webdriver = %self.webdriver_url, headless = self.headless, "Starting browser session");

        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        let client = builder
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| FetchError::Session(format!("cannot start session: {e}")))?;

        let timeouts = TimeoutConfiguration::new(None, Some(self.page_load_timeout), None);
        if let Err(e) = client.update_timeouts(timeouts).await {
            let _ = client.close().await;
            return Err(FetchError::Session(format!("cannot set page-load timeout: {e}")));
        }

        Ok(client)
    }
}
