//! HTTP surface for on-demand queries.
//!
//! | Method | Path                  | Description                                  |
//! |--------|-----------------------|----------------------------------------------|
//! | GET    | `/api/oi/:asset`      | Scrape now, post + return one asset's OI     |
//! | POST   | `/api/monitor/check`  | Run one alert cycle immediately              |
//! | GET    | `/api/health`         | Uptime, cycle and alert counters             |

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub mod monitor;
pub mod oi;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/oi/:asset",        get(oi::query_asset))
        .route("/api/monitor/check",    post(monitor::run_check))
        .route("/api/health",           get(monitor::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
