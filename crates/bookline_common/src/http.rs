// --- File: crates/bookline_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::{BooklineError, HttpStatusCode};

/// Extension trait for BooklineError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for BooklineError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            error!("request failed: {}", self);
        }

        // { "error": "...", "details": "..." } with details only for 5xx
        let body = match self.details() {
            Some(details) => json!({
                "error": self.public_message(),
                "details": details,
            }),
            None => json!({ "error": self.public_message() }),
        };

        (status_code, Json(body)).into_response()
    }
}

impl IntoResponse for BooklineError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}
