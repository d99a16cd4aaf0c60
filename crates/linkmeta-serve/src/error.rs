//! API error types and response formatting.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// API error type that converts to appropriate HTTP responses.
///
/// Bodies carry only a fixed message; details go to the log.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The `url` query parameter was absent or empty.
    #[error("missing url")]
    MissingUrl,

    /// Scraping or the cache store failed.
    #[error(transparent)]
    Metadata(#[from] linkmeta_core::Error),
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            Self::MissingUrl => (StatusCode::BAD_REQUEST, "Missing url"),
            Self::Metadata(err) => {
                tracing::error!(error = %err, "metadata lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch metadata")
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
