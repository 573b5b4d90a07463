//! Rich error handling for the marketplace.
//!
//! Every failure surfaced by a use case is a [`MarketplaceError`]: an
//! [`ErrorCode`], a human-readable message and key/value context. The HTTP
//! adapter renders it as `{code, message, status, details}`.
//!
//! # HTTP Status Codes
//!
//! | Status | Usage |
//! |--------|-------|
//! | 400 | Malformed request or invalid field |
//! | 401 | Missing, unknown or expired token; bad credentials |
//! | 403 | Authenticated but not allowed |
//! | 404 | Shop, item, order or user not found |
//! | 409 | Duplicate value, order already paid |
//! | 422 | Insufficient funds or stock, invalid cart selection |
//! | 500 | Storage failure |

use std::collections::HashMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::application::ports::CredentialError;
use crate::domain::shared::{DomainError, RepositoryError, rules};

/// Error codes for the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (400)
    /// Invalid request format or missing fields.
    InvalidRequest,
    /// A field failed validation.
    InvalidField,
    /// CSV import row could not be parsed or stored.
    InvalidImport,

    // Authentication errors (401/403)
    /// No valid session.
    Unauthenticated,
    /// Wrong username or password.
    InvalidCredentials,
    /// Authenticated but not allowed.
    PermissionDenied,

    // Not found errors (404)
    /// Entity not found.
    NotFound,

    // Conflict errors (409)
    /// Unique constraint violated.
    AlreadyExists,
    /// Order status does not allow the action.
    InvalidStateTransition,

    // Business rule errors (422)
    /// Funds do not cover the order.
    InsufficientFunds,
    /// Stock does not cover the order.
    InsufficientStock,
    /// Cart selection is empty or not in the cart.
    InvalidSelection,
    /// Funds would exceed the storable maximum.
    FundsLimitExceeded,

    // Internal errors (500)
    /// Internal server error.
    InternalError,
    /// Database error.
    StorageError,
}

impl ErrorCode {
    /// Get the HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest | Self::InvalidField | Self::InvalidImport => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists | Self::InvalidStateTransition => StatusCode::CONFLICT,
            Self::InsufficientFunds
            | Self::InsufficientStock
            | Self::InvalidSelection
            | Self::FundsLimitExceeded => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalError | Self::StorageError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::InvalidField => "INVALID_FIELD",
            Self::InvalidImport => "INVALID_IMPORT",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::InsufficientStock => "INSUFFICIENT_STOCK",
            Self::InvalidSelection => "INVALID_SELECTION",
            Self::FundsLimitExceeded => "FUNDS_LIMIT_EXCEEDED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::StorageError => "STORAGE_ERROR",
        }
    }

    fn for_rule(rule: &str) -> Self {
        match rule {
            rules::INSUFFICIENT_FUNDS => Self::InsufficientFunds,
            rules::INSUFFICIENT_STOCK => Self::InsufficientStock,
            rules::EMPTY_SELECTION | rules::NOT_IN_CART => Self::InvalidSelection,
            rules::FUNDS_LIMIT => Self::FundsLimitExceeded,
            rules::SELLER_REQUIRED => Self::PermissionDenied,
            _ => Self::InvalidRequest,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A rich error with context for the marketplace.
#[derive(Debug, thiserror::Error)]
pub struct MarketplaceError {
    /// Error code.
    code: ErrorCode,
    /// Human-readable message.
    message: String,
    /// Additional context (key-value pairs).
    context: Vec<(String, String)>,
}

impl MarketplaceError {
    /// Create a new marketplace error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Convert to an HTTP error response body.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        HttpErrorResponse {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
            status: self.code.http_status().as_u16(),
            details: self.context.iter().cloned().collect(),
        }
    }
}

impl std::fmt::Display for MarketplaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

/// HTTP error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// HTTP status code.
    pub status: u16,
    /// Additional details.
    pub details: HashMap<String, String>,
}

/// Convenience constructors for common errors.
impl MarketplaceError {
    /// Invalid request format.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Missing or expired session.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::new(ErrorCode::Unauthenticated, "authentication required")
    }

    /// Login failed.
    #[must_use]
    pub fn invalid_credentials() -> Self {
        Self::new(
            ErrorCode::InvalidCredentials,
            "please enter a correct username and password",
        )
    }

    /// Authenticated but not allowed.
    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Entity not found.
    #[must_use]
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        let id = id.to_string();
        Self::new(ErrorCode::NotFound, format!("{entity} {id} not found"))
            .with_context("entity", entity)
            .with_context("id", id)
    }

    /// CSV import rejected at a row.
    #[must_use]
    pub fn invalid_import(row: usize, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorCode::InvalidImport, format!("row {row}: {message}"))
            .with_context("row", row.to_string())
    }

    /// Internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<CredentialError> for MarketplaceError {
    fn from(err: CredentialError) -> Self {
        tracing::error!(error = %err, "Credential failure");
        Self::internal("credential check failed")
    }
}

impl From<DomainError> for MarketplaceError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err {
            DomainError::InvalidValue { field, .. } => {
                Self::new(ErrorCode::InvalidField, message).with_context("field", field)
            }
            DomainError::BusinessRuleViolation { rule, .. } => {
                Self::new(ErrorCode::for_rule(&rule), message).with_context("rule", rule)
            }
            DomainError::NotFound { entity_type, id } => Self::new(ErrorCode::NotFound, message)
                .with_context("entity", entity_type)
                .with_context("id", id),
            DomainError::InvalidStateTransition { entity, from, .. } => {
                Self::new(ErrorCode::InvalidStateTransition, message)
                    .with_context("entity", entity)
                    .with_context("status", from)
            }
            DomainError::PermissionDenied { .. } => Self::new(ErrorCode::PermissionDenied, message),
        }
    }
}

impl From<RepositoryError> for MarketplaceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Domain(domain) => domain.into(),
            RepositoryError::Conflict { ref entity, .. } => {
                let entity = entity.clone();
                Self::new(ErrorCode::AlreadyExists, err.to_string()).with_context("entity", entity)
            }
            RepositoryError::Corrupt { .. } | RepositoryError::Storage(_) => {
                tracing::error!(error = %err, "Repository failure");
                Self::new(ErrorCode::StorageError, "storage failure")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_mapping() {
        assert_eq!(
            ErrorCode::InvalidField.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::Unauthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::PermissionDenied.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ErrorCode::AlreadyExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::InsufficientFunds.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::StorageError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_marketplace_error_creation() {
        let error = MarketplaceError::new(ErrorCode::InvalidRequest, "Bad request")
            .with_context("field", "amount")
            .with_context("value", "abc");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "Bad request");
        assert_eq!(error.context().len(), 2);
    }

    #[test]
    fn test_to_http_response() {
        let error = MarketplaceError::not_found("Shop", 12);
        let response = error.to_http_response();

        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.status, 404);
        assert_eq!(response.details.get("id").map(String::as_str), Some("12"));
    }

    #[test]
    fn test_error_display() {
        let error = MarketplaceError::invalid_request("Missing field");
        assert_eq!(error.to_string(), "[INVALID_REQUEST] Missing field");
    }

    #[test]
    fn test_business_rules_map_to_codes() {
        let funds: MarketplaceError =
            DomainError::rule(rules::INSUFFICIENT_FUNDS, "short").into();
        assert_eq!(funds.code(), ErrorCode::InsufficientFunds);

        let selection: MarketplaceError = DomainError::rule(rules::NOT_IN_CART, "x").into();
        assert_eq!(selection.code(), ErrorCode::InvalidSelection);
    }

    #[test]
    fn test_invalid_import_carries_row() {
        let error = MarketplaceError::invalid_import(3, "bad price");
        assert_eq!(error.code(), ErrorCode::InvalidImport);
        assert_eq!(error.message(), "row 3: bad price");
        assert_eq!(error.to_http_response().details["row"], "3");
    }

    #[test]
    fn test_repository_errors_map_to_codes() {
        let conflict: MarketplaceError = RepositoryError::conflict("User", "alice").into();
        assert_eq!(conflict.code(), ErrorCode::AlreadyExists);

        let storage: MarketplaceError = RepositoryError::Storage("disk".to_string()).into();
        assert_eq!(storage.code(), ErrorCode::StorageError);
        assert!(!storage.message().contains("disk"));

        let wrapped: MarketplaceError =
            RepositoryError::Domain(DomainError::invalid("price", "negative")).into();
        assert_eq!(wrapped.code(), ErrorCode::InvalidField);
    }
}
