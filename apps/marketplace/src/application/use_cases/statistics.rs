//! Per-shop sales statistics.

use std::sync::Arc;

use crate::domain::accounts::Account;
use crate::domain::catalog::CatalogRepository;
use crate::domain::shared::ShopId;
use crate::domain::statistics::{DateRange, SalesReport, StatisticsRepository};
use crate::error::MarketplaceError;
use crate::observability::UseCaseTimer;

use super::shops::owned_shop;

/// Use case for sales reports.
pub struct SalesStatisticsUseCase<R>
where
    R: CatalogRepository + StatisticsRepository,
{
    repo: Arc<R>,
}

impl<R> SalesStatisticsUseCase<R>
where
    R: CatalogRepository + StatisticsRepository,
{
    /// Create a new SalesStatisticsUseCase.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Quantities sold per item of an owned shop between two `YYYY-MM-DD` days, inclusive.
    ///
    /// # Errors
    ///
    /// Foreign shops, malformed or reversed dates.
    pub async fn report(
        &self,
        actor: &Account,
        shop: ShopId,
        date_from: &str,
        date_to: &str,
    ) -> Result<SalesReport, MarketplaceError> {
        let timer = UseCaseTimer::start("sales_statistics");
        timer.finish(self.try_report(actor, shop, date_from, date_to).await)
    }

    async fn try_report(
        &self,
        actor: &Account,
        shop: ShopId,
        date_from: &str,
        date_to: &str,
    ) -> Result<SalesReport, MarketplaceError> {
        actor.require_seller("viewing sales statistics")?;
        owned_shop(self.repo.as_ref(), actor, shop).await?;
        let range = DateRange::parse(date_from, date_to)?;
        let lines = self.repo.sold_lines(shop, range).await?;
        let report = SalesReport::build(shop, range, lines);
        tracing::debug!(
            shop_id = %shop,
            rows = report.rows.len(),
            total = report.total_quantity,
            "sales report built"
        );
        Ok(report)
    }
}
