//! # error
//!
//! Error type for the HTTP surface.
//!
//! Every handler returns `Result<_, AppError>`.  Axum's `IntoResponse` impl
//! turns these into `{ "ok": false, "error": ... }` bodies so callers always
//! get a machine-readable response, including when the scrape failed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The request named something that does not exist (e.g. an unknown asset).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The site could not be scraped this time; the message is user-facing.
    #[error("{0}")]
    Unavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
        };

        let body = Json(json!({
            "ok":    false,
            "error": message,
        }));

        (status, body).into_response()
    }
}
