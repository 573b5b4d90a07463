//! Domain errors for the marketplace.

use std::fmt;

use thiserror::Error;

/// Rule identifiers carried by [`DomainError::BusinessRuleViolation`].
pub mod rules {
    /// Buyer funds do not cover the order total.
    pub const INSUFFICIENT_FUNDS: &str = "INSUFFICIENT_FUNDS";
    /// Item stock does not cover the ordered quantity.
    pub const INSUFFICIENT_STOCK: &str = "INSUFFICIENT_STOCK";
    /// Checkout without any selected cart line.
    pub const EMPTY_SELECTION: &str = "EMPTY_SELECTION";
    /// Selected item is not in the buyer's cart.
    pub const NOT_IN_CART: &str = "NOT_IN_CART";
    /// Funds balance would overflow decimal(10,2).
    pub const FUNDS_LIMIT: &str = "FUNDS_LIMIT";
    /// Only sellers may own shops.
    pub const SELLER_REQUIRED: &str = "SELLER_REQUIRED";
}

/// Domain-level errors that can occur in business logic.
///
/// These errors are independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid state transition attempted.
    InvalidStateTransition {
        /// Entity type (e.g., "Order").
        entity: String,
        /// Current state.
        from: String,
        /// Attempted state.
        to: String,
        /// Reason for failure.
        reason: String,
    },

    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Business rule violation.
    BusinessRuleViolation {
        /// Rule name, one of [`rules`].
        rule: String,
        /// Description of the violation.
        message: String,
    },

    /// Entity not found.
    NotFound {
        /// Entity type.
        entity_type: String,
        /// Entity identifier.
        id: String,
    },

    /// The requester may not perform this action.
    PermissionDenied {
        /// What was attempted.
        action: String,
    },
}

impl DomainError {
    /// Shorthand for [`DomainError::InvalidValue`].
    #[must_use]
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for [`DomainError::BusinessRuleViolation`].
    #[must_use]
    pub fn rule(rule: &str, message: impl Into<String>) -> Self {
        Self::BusinessRuleViolation {
            rule: rule.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for [`DomainError::NotFound`].
    #[must_use]
    pub fn not_found(entity_type: &str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    /// Shorthand for [`DomainError::PermissionDenied`].
    #[must_use]
    pub fn denied(action: impl Into<String>) -> Self {
        Self::PermissionDenied {
            action: action.into(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStateTransition {
                entity,
                from,
                to,
                reason,
            } => {
                write!(
                    f,
                    "Invalid state transition for {entity}: {from} -> {to}: {reason}"
                )
            }
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::BusinessRuleViolation { rule, message } => {
                write!(f, "Business rule '{rule}' violated: {message}")
            }
            Self::NotFound { entity_type, id } => {
                write!(f, "{entity_type} not found: {id}")
            }
            Self::PermissionDenied { action } => {
                write!(f, "Permission denied: {action}")
            }
        }
    }
}

impl std::error::Error for DomainError {}

/// Errors raised by repository adapters.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A uniqueness constraint rejected the write.
    #[error("{entity} already exists: {detail}")]
    Conflict {
        /// Entity type.
        entity: String,
        /// Offending value.
        detail: String,
    },

    /// A domain rule failed inside an atomic operation; the transaction was rolled back.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A stored value could not be decoded.
    #[error("corrupt value in column '{field}': {value}")]
    Corrupt {
        /// Column name.
        field: String,
        /// Raw stored value.
        value: String,
    },

    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl RepositoryError {
    /// Shorthand for [`RepositoryError::Conflict`].
    #[must_use]
    pub fn conflict(entity: &str, detail: impl fmt::Display) -> Self {
        Self::Conflict {
            entity: entity.to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shorthand for [`RepositoryError::Corrupt`].
    #[must_use]
    pub fn corrupt(field: &str, value: impl fmt::Display) -> Self {
        Self::Corrupt {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}
