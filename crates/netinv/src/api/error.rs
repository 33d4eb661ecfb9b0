//! API error types

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use netinv_api::ErrorResponse;
use netinv_inventory::InventoryError;
use tracing::error;

/// Returned for any query string other than none or a single `interface`
pub const BAD_REQUEST_MESSAGE: &str = "only ?interface={interface_name} input format is allowed";

/// Error envelope paired with its HTTP status
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: ErrorResponse,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: ErrorResponse::new(message),
        }
    }

    /// Malformed query string
    pub fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST, BAD_REQUEST_MESSAGE)
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        let status = match err {
            InventoryError::NotFound { .. } => StatusCode::NOT_FOUND,
            InventoryError::Enumeration(_) | InventoryError::Extraction(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(
            status = self.status.as_u16(),
            message = %self.error.error,
            "request failed"
        );
        (self.status, Json(self.error)).into_response()
    }
}
