use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use seed::SeedError;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::database::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Remote fetch failed: {0}")]
    RemoteFetch(#[from] SeedError),

    #[error("Malformed payload: {0}")]
    Validation(String),
}

/// Failures are reported in the body, the status stays 200.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        warn!("Request failed: {self}");

        (
            StatusCode::OK,
            Json(json!({ "status": "error", "error": self.to_string() })),
        )
            .into_response()
    }
}
