//! # fetch::rendered
//!
//! Browser backend.  The listing is filled in by client-side scripts, so the
//! page is loaded in a real browser over WebDriver, given a fixed settle
//! time, and each cell is then awaited with a bounded wait.
//!
//! ## Failure policy
//! * cell wait times out → cell is absent (`None`), a `debug-*.png`
//!   screenshot is saved, the page still succeeds
//! * navigation or any other WebDriver command fails → an `error-*.png`
//!   screenshot is attempted and the whole page fails

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, Locator};
use tracing::{debug, info, warn};

use super::session::BrowserSession;
use super::{CellSource, CellText, FetchError, Page, PageSpec};

pub struct RenderedSource {
    session: BrowserSession,
    base_url: String,
    settle: Duration,
    element_timeout: Duration,
    snapshot_dir: PathBuf,
}

impl RenderedSource {
    pub fn new(
        session: BrowserSession,
        base_url: &str,
        settle: Duration,
        element_timeout: Duration,
        snapshot_dir: PathBuf,
    ) -> Self {
        Self {
            session,
            base_url: base_url.to_string(),
            settle,
            element_timeout,
            snapshot_dir,
        }
    }

    async fn read_cells(&self, client: &Client, spec: &PageSpec) -> Result<Vec<CellText>, FetchError> {
        let mut cells = Vec::with_capacity(spec.cells.len());

        for cell in spec.cells {
            let css = cell.selector();
            let found = client
                .wait()
                .at_most(self.element_timeout)
                .for_element(Locator::Css(&css))
                .await;

            let text = match found {
                Ok(element) => {
                    let text = element.text().await.map_err(session_error)?;
                    debug!(asset = %cell.asset, raw = %text, "Cell text found");
                    Some(text)
                }
                Err(CmdError::WaitTimeout) => {
                    warn!(asset = %cell.asset, selector = %css, "Timed out waiting for OI cell");
                    save_snapshot(client, &self.snapshot_dir, spec.page, "debug").await;
                    None
                }
                Err(e) => return Err(session_error(e)),
            };

            cells.push(CellText { asset: cell.asset, text });
        }

        Ok(cells)
    }
}

fn session_error(e: CmdError) -> FetchError {
    FetchError::Session(e.to_string())
}

/// Best effort: a failed screenshot is logged and otherwise ignored.
async fn save_snapshot(client: &Client, dir: &std::path::Path, page: Page, kind: &str) {
    let file = dir.join(snapshot_name(page, kind, chrono::Utc::now()));

    let png = match client.screenshot().await {
        Ok(png) => png,
        Err(e) => {
            warn!(error = %e, "Could not capture screenshot");
            return;
        }
    };

    match tokio::fs::write(&file, png).await {
        Ok(()) => info!(path = %file.display(), "Diagnostic screenshot saved"),
        Err(e) => warn!(path = %file.display(), error = %e, "Could not write screenshot"),
    }
}

fn snapshot_name(page: Page, kind: &str, at: chrono::DateTime<chrono::Utc>) -> String {
    format!("{kind}-{}-{}.png", page.slug(), at.format("%Y%m%dT%H%M%SZ"))
}

#[async_trait]
impl CellSource for RenderedSource {
    fn backend(&self) -> &'static str {
        "rendered"
    }

    async fn fetch_page(&mut self, spec: &PageSpec) -> Result<Vec<CellText>, FetchError> {
        let client = self.session.acquire().await?;
        let url = spec.page.url(&self.base_url);

        info!(page = spec.page.slug(), %url, "Loading OI page in browser");
        if let Err(e) = client.goto(&url).await {
            save_snapshot(&client, &self.snapshot_dir, spec.page, "error").await;
            return Err(FetchError::Navigation { url, reason: e.to_string() });
        }

        tokio::time::sleep(self.settle).await;

        match self.read_cells(&client, spec).await {
            Ok(cells) => Ok(cells),
            Err(e) => {
                save_snapshot(&client, &self.snapshot_dir, spec.page, "error").await;
                Err(e)
            }
        }
    }

    async fn release(&mut self) {
        self.session.reset().await;
    }
}
