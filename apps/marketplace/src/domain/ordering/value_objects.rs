//! Order status, order codes and checkout selections.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{DomainError, ItemId, Timestamp, UserId};

/// Longest stored order code.
pub const ORDER_CODE_MAX_LEN: usize = 25;

/// Order lifecycle: placed at checkout, paid once funds are debited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Formed from the cart, awaiting payment.
    Placed,
    /// Paid from the buyer's funds.
    Paid,
}

impl OrderStatus {
    /// One-letter storage code.
    #[must_use]
    pub const fn as_code(&self) -> &'static str {
        match self {
            Self::Placed => "o",
            Self::Paid => "b",
        }
    }

    /// Parse a storage code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "o" => Some(Self::Placed),
            "b" => Some(Self::Paid),
            _ => None,
        }
    }

    /// Back office label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Placed => "Placed",
            Self::Paid => "Paid",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placed => write!(f, "PLACED"),
            Self::Paid => write!(f, "PAID"),
        }
    }
}

/// Public order reference: `{user_id:08}_{YYYYMMDDTHHMMSS}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderCode(String);

impl OrderCode {
    /// Code for an order placed by `user` at `at`.
    #[must_use]
    pub fn generate(user: UserId, at: Timestamp) -> Self {
        Self(format!("{:08}_{}", user.get(), at.compact()))
    }

    /// Accept a code received from a client.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidValue`] if empty or too long.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.chars().count() > ORDER_CODE_MAX_LEN {
            return Err(DomainError::invalid(
                "code",
                format!("must have 1 to {ORDER_CODE_MAX_LEN} characters"),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// Borrow the code text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One cart line picked for checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CheckoutSelection {
    /// Item in the cart.
    pub item_id: ItemId,
    /// Quantity to order; defaults to the cart line's quantity.
    #[serde(default)]
    pub quantity: Option<u32>,
}
