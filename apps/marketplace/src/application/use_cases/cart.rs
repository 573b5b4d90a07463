//! Cart management and checkout.

use std::sync::Arc;

use crate::application::ports::Clock;
use crate::domain::accounts::Account;
use crate::domain::catalog::CatalogRepository;
use crate::domain::ordering::{CartSummary, CheckoutSelection, OrderDetail, OrderingRepository};
use crate::domain::shared::ItemId;
use crate::error::MarketplaceError;
use crate::observability::{UseCaseTimer, record_order_placed};

/// Use case for the buyer's cart.
pub struct CartUseCase<R>
where
    R: OrderingRepository + CatalogRepository,
{
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> CartUseCase<R>
where
    R: OrderingRepository + CatalogRepository,
{
    /// Create a new CartUseCase.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Put an item in the cart; an existing line is left as is.
    ///
    /// Returns whether a new line was created.
    ///
    /// # Errors
    ///
    /// Unknown items.
    pub async fn add(&self, actor: &Account, item: ItemId) -> Result<bool, MarketplaceError> {
        if self.repo.find_item(item).await?.is_none() {
            return Err(MarketplaceError::not_found("Item", item));
        }
        let created = self.repo.add_to_cart(actor.id(), item).await?;
        tracing::info!(user_id = %actor.id(), item_id = %item, created, "item added to cart");
        Ok(created)
    }

    /// Cart lines with costs and the grand total.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn view(&self, actor: &Account) -> Result<CartSummary, MarketplaceError> {
        Ok(CartSummary::new(self.repo.cart(actor.id()).await?))
    }

    /// Empty the cart; returns the number of removed lines.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn clear(&self, actor: &Account) -> Result<u64, MarketplaceError> {
        let removed = self.repo.clear_cart(actor.id()).await?;
        tracing::info!(user_id = %actor.id(), removed, "cart cleared");
        Ok(removed)
    }

    /// Turn selected cart lines into a placed order.
    ///
    /// # Errors
    ///
    /// Empty selections, items outside the cart, zero quantities.
    pub async fn checkout(
        &self,
        actor: &Account,
        selection: Vec<CheckoutSelection>,
    ) -> Result<OrderDetail, MarketplaceError> {
        let timer = UseCaseTimer::start("place_order");
        timer.finish(self.try_checkout(actor, &selection).await)
    }

    async fn try_checkout(
        &self,
        actor: &Account,
        selection: &[CheckoutSelection],
    ) -> Result<OrderDetail, MarketplaceError> {
        let detail = self
            .repo
            .place_order(actor.id(), selection, self.clock.now())
            .await?;
        record_order_placed(detail.lines.len());
        tracing::info!(
            order_id = %detail.order.id,
            code = %detail.order.code,
            user_id = %actor.id(),
            lines = detail.lines.len(),
            total = %detail.total,
            "order #{} formed",
            detail.order.id
        );
        Ok(detail)
    }
}
