//! # pipeline
//!
//! The one entry point both the scheduler and on-demand queries use to get
//! readings.  The fetch backend sits behind a `tokio::sync::Mutex`, so a
//! query that arrives mid-cycle waits for the cycle's fetch instead of
//! driving the same browser session concurrently.

use tokio::sync::Mutex;
use tracing::info;

use crate::engine::retry::{RetryExhausted, RetryPolicy};
use crate::fetch::{CellSource, PageSpec, COINALYZE};
use crate::models::ReadingSet;

pub struct Pipeline {
    source: Mutex<Box<dyn CellSource>>,
    backend: &'static str,
    layout: &'static [PageSpec],
    retry: RetryPolicy,
}

impl Pipeline {
    pub fn new(source: Box<dyn CellSource>, retry: RetryPolicy) -> Self {
        Self::with_layout(source, COINALYZE, retry)
    }

    pub fn with_layout(
        source: Box<dyn CellSource>,
        layout: &'static [PageSpec],
        retry: RetryPolicy,
    ) -> Self {
        Self {
            backend: source.backend(),
            source: Mutex::new(source),
            layout,
            retry,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Fetch, parse and retry.  Holds the backend lock for the whole run.
    pub async fn fetch_readings(&self) -> Result<ReadingSet, RetryExhausted> {
        let mut source = self.source.lock().await;
        self.retry.run(source.as_mut(), self.layout).await
    }

    /// Release the backend's resources (browser session) on shutdown.
    pub async fn shutdown(&self) {
        info!(backend = self.backend, "Releasing fetch backend");
        self.source.lock().await.release().await;
    }
}
