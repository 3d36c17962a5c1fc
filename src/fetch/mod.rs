//! # fetch
//!
//! Page retrieval and cell extraction.  Two interchangeable backends sit
//! behind [`CellSource`]:
//!
//! | Backend    | Module       | How                                            |
//! |------------|--------------|------------------------------------------------|
//! | `rendered` | [`rendered`] | WebDriver browser, waits for scripts to settle |
//! | `raw`      | [`raw`]      | Plain HTTP GET + `scraper` DOM query           |
//!
//! A missing cell is not an error: it comes back as `text: None` and the
//! parser reads it as `0`.  Only page-level failures (navigation, session,
//! network) surface as [`FetchError`].

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{Config, FetchBackend};
use crate::engine::parser::parse_oi_value;
use crate::models::{Asset, OiReading, ReadingSet};

pub mod layout;
pub mod raw;
pub mod rendered;
pub mod session;

#[cfg(test)]
pub mod fake;

pub use layout::{CellSpec, Page, PageSpec, COINALYZE};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("browser session error: {0}")]
    Session(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("page layout has no cell for {0}")]
    MissingCell(Asset),
}

/// Raw text of one cell; `None` when the page had no such element.
#[derive(Debug, Clone, PartialEq)]
pub struct CellText {
    pub asset: Asset,
    pub text: Option<String>,
}

#[async_trait]
pub trait CellSource: Send {
    /// Backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    /// Load `spec.page` and read every cell it lists, in order.
    async fn fetch_page(&mut self, spec: &PageSpec) -> Result<Vec<CellText>, FetchError>;

    /// Drop whatever long-lived resource the backend holds.  The next
    /// `fetch_page` starts from scratch.
    async fn release(&mut self);
}

/// Fetch every page of `layout` and parse the cells into a [`ReadingSet`].
pub async fn collect_readings(
    source: &mut dyn CellSource,
    layout: &[PageSpec],
) -> Result<ReadingSet, FetchError> {
    let mut readings = Vec::with_capacity(Asset::ALL.len());

    for spec in layout {
        debug!(page = spec.page.slug(), backend = source.backend(), "Fetching page");

        for cell in source.fetch_page(spec).await? {
            if cell.text.is_none() {
                warn!(asset = %cell.asset, page = spec.page.slug(), "OI cell not found — reading as 0");
            }
            readings.push(OiReading {
                asset: cell.asset,
                value: parse_oi_value(cell.text.as_deref()),
            });
        }
    }

    ReadingSet::from_readings(&readings).map_err(FetchError::MissingCell)
}

/// Build the backend selected by `FETCH_BACKEND`.
pub fn build_source(config: &Config) -> Result<Box<dyn CellSource>, FetchError> {
    match config.backend {
        FetchBackend::Raw => Ok(Box::new(raw::RawSource::new(
            &config.site_url,
            config.page_load_timeout,
            config.page_gap,
        )?)),
        FetchBackend::Rendered => {
            let session = session::BrowserSession::new(
                &config.webdriver_url,
                config.headless,
                config.page_load_timeout,
            );
            Ok(Box::new(rendered::RenderedSource::new(
                session,
                &config.site_url,
                config.settle,
                config.element_timeout,
                config.snapshot_dir.clone(),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeSource;
    use super::*;

    #[tokio::test]
    async fn collects_all_three_readings() {
        let mut source = FakeSource::with_values("$21.4B", "$9.8B", "$30.1B");
        let readings = collect_readings(&mut source, COINALYZE).await.unwrap();
        assert_eq!(readings, ReadingSet::new(21_400_000_000.0, 9_800_000_000.0, 30_100_000_000.0));
    }

    #[tokio::test]
    async fn missing_cell_reads_as_zero() {
        let mut source = FakeSource::with_values("$21.4B", "$9.8B", "$30.1B").missing(Asset::Eth);
        let readings = collect_readings(&mut source, COINALYZE).await.unwrap();
        assert_eq!(readings.eth, 0.0);
        assert_eq!(readings.btc, 21_400_000_000.0);
    }

    #[tokio::test]
    async fn page_failure_is_an_error_not_zeros() {
        let mut source = FakeSource::with_values("1", "2", "3").failing_first(1);
        let err = collect_readings(&mut source, COINALYZE).await.unwrap_err();
        assert!(matches!(err, FetchError::Session(_)));
    }

    #[tokio::test]
    async fn layout_without_an_asset_is_rejected() {
        static BTC_ONLY: &[PageSpec] = &[PageSpec {
            page: Page::Main,
            cells: &[CellSpec { asset: Asset::Btc, row: 1, column: 7 }],
        }];
        let mut source = FakeSource::with_values("1", "2", "3");
        let err = collect_readings(&mut source, BTC_ONLY).await.unwrap_err();
        assert!(matches!(err, FetchError::MissingCell(Asset::Eth)));
    }
}
