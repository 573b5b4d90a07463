//! Order pages, payment from funds and order history.

use std::sync::Arc;

use crate::application::ports::Clock;
use crate::config::PageSizes;
use crate::domain::accounts::Account;
use crate::domain::ordering::{Order, OrderCode, OrderDetail, OrderingRepository, PaymentReceipt};
use crate::domain::shared::{Page, PageRequest};
use crate::error::MarketplaceError;
use crate::observability::{
    UseCaseTimer, record_order_paid, record_payment_rejection,
};

/// Use case for paying orders.
pub struct PaymentUseCase<R>
where
    R: OrderingRepository,
{
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    page_sizes: PageSizes,
}

impl<R> PaymentUseCase<R>
where
    R: OrderingRepository,
{
    /// Create a new PaymentUseCase.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>, page_sizes: PageSizes) -> Self {
        Self {
            repo,
            clock,
            page_sizes,
        }
    }

    /// One of the requester's orders with its lines.
    ///
    /// # Errors
    ///
    /// Unknown codes and orders of other users are both not found.
    pub async fn view(&self, actor: &Account, code: &str) -> Result<OrderDetail, MarketplaceError> {
        let code = OrderCode::parse(code)?;
        match self.repo.find_order(&code).await? {
            Some(detail) if detail.order.user_id == actor.id() => Ok(detail),
            _ => Err(MarketplaceError::not_found("Order", code)),
        }
    }

    /// Pay one of the requester's placed orders from their funds.
    ///
    /// # Errors
    ///
    /// Unknown or already paid orders, insufficient funds or stock.
    pub async fn pay(&self, actor: &Account, code: &str) -> Result<PaymentReceipt, MarketplaceError> {
        let timer = UseCaseTimer::start("pay_order");
        let result = self.try_pay(actor, code).await;
        if let Err(err) = &result {
            record_payment_rejection(err.code().reason());
            tracing::warn!(user_id = %actor.id(), code = %code, error = %err, "payment rejected");
        }
        timer.finish(result)
    }

    async fn try_pay(&self, actor: &Account, code: &str) -> Result<PaymentReceipt, MarketplaceError> {
        let code = OrderCode::parse(code)?;
        let receipt = self
            .repo
            .pay_order(actor.id(), &code, self.clock.now())
            .await?;

        record_order_paid(receipt.debited);
        tracing::info!(
            order_id = %receipt.order.id,
            code = %receipt.order.code,
            user_id = %actor.id(),
            debited = %receipt.debited,
            balance = %receipt.balance,
            "order #{} paid, {} debited",
            receipt.order.id,
            receipt.debited
        );
        if receipt.status_upgraded {
            tracing::info!(
                user_id = %actor.id(),
                purchases = receipt.purchases,
                status = %receipt.buyer_status,
                "buyer status upgraded to {}",
                receipt.buyer_status
            );
        }
        Ok(receipt)
    }

    /// The requester's orders, newest first.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn history(
        &self,
        actor: &Account,
        page: Option<&str>,
    ) -> Result<Page<Order>, MarketplaceError> {
        let page = PageRequest::parse(page, self.page_sizes.orders);
        Ok(self.repo.order_history(actor.id(), page).await?)
    }
}
