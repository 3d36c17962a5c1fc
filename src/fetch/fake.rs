//! In-memory [`CellSource`] for tests: fixed cell texts, scripted failures
//! and counters shared with the test body.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{CellSource, CellText, FetchError, Page, PageSpec};
use crate::models::Asset;

#[derive(Debug, Clone, Default)]
pub struct FakeStats {
    pub page_fetches: Arc<AtomicU32>,
    pub releases: Arc<AtomicU32>,
    in_flight: Arc<AtomicU32>,
    pub max_in_flight: Arc<AtomicU32>,
}

impl FakeStats {
    pub fn page_fetches(&self) -> u32 {
        self.page_fetches.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> u32 {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> u32 {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

pub struct FakeSource {
    cells: Vec<(Asset, Option<String>)>,
    failures_left: u32,
    latency: Duration,
    stats: FakeStats,
}

impl FakeSource {
    pub fn with_values(btc: &str, eth: &str, alt: &str) -> Self {
        Self {
            cells: vec![
                (Asset::Btc, Some(btc.to_string())),
                (Asset::Eth, Some(eth.to_string())),
                (Asset::Alt, Some(alt.to_string())),
            ],
            failures_left: 0,
            latency: Duration::ZERO,
            stats: FakeStats::default(),
        }
    }

    /// Fail the main page of the next `n` attempts.
    pub fn failing_first(mut self, n: u32) -> Self {
        self.failures_left = n;
        self
    }

    pub fn missing(mut self, asset: Asset) -> Self {
        for (a, text) in &mut self.cells {
            if *a == asset {
                *text = None;
            }
        }
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn stats(&self) -> FakeStats {
        self.stats.clone()
    }
}

#[async_trait]
impl CellSource for FakeSource {
    fn backend(&self) -> &'static str {
        "fake"
    }

    async fn fetch_page(&mut self, spec: &PageSpec) -> Result<Vec<CellText>, FetchError> {
        self.stats.page_fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);

        if spec.page == Page::Main && self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(FetchError::Session("simulated browser crash".into()));
        }

        Ok(spec
            .cells
            .iter()
            .map(|cell| CellText {
                asset: cell.asset,
                text: self
                    .cells
                    .iter()
                    .find(|(a, _)| *a == cell.asset)
                    .and_then(|(_, t)| t.clone()),
            })
            .collect())
    }

    async fn release(&mut self) {
        self.stats.releases.fetch_add(1, Ordering::SeqCst);
    }
}
