//! HTTP response DTOs.

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::MarketplaceError;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// Result of adding an item to the cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CartAddResponse {
    /// False when the item was already in the cart.
    pub created: bool,
}

/// Result of clearing the cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CartClearResponse {
    /// Deleted cart lines.
    pub removed: u64,
}

impl IntoResponse for MarketplaceError {
    fn into_response(self) -> Response {
        let status = self.code().http_status();
        if status.is_server_error() {
            tracing::error!(code = %self.code(), message = %self.message(), "Request failed");
        } else {
            tracing::debug!(code = %self.code(), message = %self.message(), "Request rejected");
        }
        (status, Json(self.to_http_response())).into_response()
    }
}
