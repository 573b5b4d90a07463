//! HTTP request DTOs.
//!
//! Bodies that map one-to-one onto a domain input (registration, profile
//! update, shop and item drafts) deserialize straight into the domain type.

use serde::{Deserialize, Serialize};

use crate::domain::ordering::{CheckoutSelection, OrderStatus};
use crate::domain::shared::{ItemId, Money};

/// Login form.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Funds top-up.
#[derive(Debug, Clone, Deserialize)]
pub struct TopUpRequest {
    /// Amount to add.
    pub amount: Money,
}

/// Add an item to the cart.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AddToCartRequest {
    /// Item to add.
    pub item_id: ItemId,
}

/// Cart lines picked for an order.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    /// Selected items; quantities default to the cart line's.
    #[serde(default)]
    pub items: Vec<CheckoutSelection>,
}

/// Back office order status change.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrderStatusRequest {
    /// New status.
    pub status: OrderStatus,
}

/// Back office seller flag change.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SellerFlagRequest {
    /// New seller flag.
    pub is_seller: bool,
}

/// `?page=` on paginated listings; kept raw so junk falls back to page 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    /// Requested page number.
    #[serde(default)]
    pub page: Option<String>,
}

impl PageQuery {
    /// Borrow the raw page value.
    #[must_use]
    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }
}

/// Sales statistics date range, `YYYY-MM-DD` inclusive.
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsQuery {
    /// First day.
    pub date_from: String,
    /// Last day.
    pub date_to: String,
}
