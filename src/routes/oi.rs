//! # routes::oi
//!
//! `/btc`, `/eth`, `/alt` style queries: scrape now, post a one-value summary
//! to the channel, and return the value to the caller.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::{error, info, warn};

use crate::{
    engine::format::format_number,
    error::AppError,
    models::Asset,
    notify::message::{failure_message, failure_text, summary_message},
    state::SharedState,
};

// ─── GET /api/oi/:asset ───────────────────────────────────────────────────────

/// ### Response
/// * `200 OK` with `{ "ok": true, "asset": "btc", "value": 2.14e10, "formatted": "$21.4B" }`
/// * `400` for an unknown asset
/// * `503` when every fetch attempt failed
pub async fn query_asset(
    State(state): State<SharedState>,
    Path(asset): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let asset: Asset = asset.parse().map_err(AppError::BadRequest)?;

    let readings = match state.pipeline.fetch_readings().await {
        Ok(readings) => readings,
        Err(e) => {
            error!(asset = %asset, error = %e, "On-demand OI query failed");
            if let Err(e) = state.notifier.send(&failure_message(asset)).await {
                warn!(error = %e, "Could not post failure acknowledgment");
            }
            return Err(AppError::Unavailable(failure_text(asset)));
        }
    };

    let value = readings.get(asset);
    let formatted = format_number(value);
    info!(asset = %asset, value = %formatted, "On-demand OI query answered");

    if let Err(e) = state.notifier.send(&summary_message(asset, value)).await {
        warn!(error = %e, "Could not post OI summary");
    }

    Ok(Json(json!({
        "ok":        true,
        "asset":     asset,
        "value":     value,
        "formatted": formatted,
    })))
}
