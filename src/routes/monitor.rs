//! # routes::monitor
//!
//! Manual trigger for the alert cycle and a health probe.

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::state::SharedState;

// ─── POST /api/monitor/check ──────────────────────────────────────────────────

/// Run the scheduled cycle now.  Goes through the same cooldown gate, so a
/// manual check cannot bypass the debounce.
pub async fn run_check(State(state): State<SharedState>) -> impl IntoResponse {
    let outcome = state.monitor.run_cycle().await;
    Json(json!({ "ok": true, "result": outcome }))
}

// ─── GET /api/health ──────────────────────────────────────────────────────────

pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    Json(json!({
        "ok":             true,
        "uptime_seconds": state.started_at.elapsed().as_secs(),
        "backend":        state.pipeline.backend(),
        "alert_mode":     state.monitor.mode(),
        "cycles_run":     state.monitor.cycles_run(),
        "alerts_sent":    state.monitor.alerts_sent(),
    }))
}
