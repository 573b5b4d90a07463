//! Ordering Repository Trait
//!
//! Carts, checkout and payment. Checkout and payment are atomic: adapters run
//! each in a single transaction and roll back on any error.

use async_trait::async_trait;

use super::entities::{CartLine, Order, OrderDetail, PaymentReceipt};
use super::value_objects::{CheckoutSelection, OrderCode};
use crate::domain::shared::{ItemId, Page, PageRequest, RepositoryError, Timestamp, UserId};

/// Repository trait for carts and orders.
#[async_trait]
pub trait OrderingRepository: Send + Sync {
    /// Get-or-create the user's cart line for `item`; returns whether it was created.
    async fn add_to_cart(&self, user: UserId, item: ItemId) -> Result<bool, RepositoryError>;

    /// The user's cart lines, oldest first.
    async fn cart(&self, user: UserId) -> Result<Vec<CartLine>, RepositoryError>;

    /// Delete all of the user's cart lines; returns how many were removed.
    async fn clear_cart(&self, user: UserId) -> Result<u64, RepositoryError>;

    /// Create an order from selected cart lines and remove them from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Domain`] for an invalid selection and
    /// [`RepositoryError::Conflict`] if the generated code already exists.
    async fn place_order(
        &self,
        user: UserId,
        selection: &[CheckoutSelection],
        now: Timestamp,
    ) -> Result<OrderDetail, RepositoryError>;

    /// Load an order with its lines.
    async fn find_order(&self, code: &OrderCode) -> Result<Option<OrderDetail>, RepositoryError>;

    /// Pay for the user's order from their funds.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Domain`] when the order is missing, already
    /// paid, underfunded or short on stock.
    async fn pay_order(
        &self,
        user: UserId,
        code: &OrderCode,
        now: Timestamp,
    ) -> Result<PaymentReceipt, RepositoryError>;

    /// The user's orders, newest first.
    async fn order_history(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Page<Order>, RepositoryError>;
}
