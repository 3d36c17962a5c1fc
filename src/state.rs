//! # state
//!
//! Shared application state injected into every Axum handler.
//!
//! The pipeline and monitor are the same instances the scheduled loop uses,
//! so an on-demand query and a scheduled cycle contend for one fetch lock
//! rather than two browser sessions.

use std::sync::Arc;
use std::time::Instant;

use crate::monitor::Monitor;
use crate::notify::Notifier;
use crate::pipeline::Pipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub monitor: Arc<Monitor>,
    /// Where on-demand summaries and failure acknowledgments are posted.
    pub notifier: Arc<dyn Notifier>,
    pub started_at: Instant,
}

pub type SharedState = Arc<AppState>;

pub fn build_state(
    pipeline: Arc<Pipeline>,
    monitor: Arc<Monitor>,
    notifier: Arc<dyn Notifier>,
) -> SharedState {
    Arc::new(AppState {
        pipeline,
        monitor,
        notifier,
        started_at: Instant::now(),
    })
}
