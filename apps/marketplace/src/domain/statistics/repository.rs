//! Statistics Repository Trait

use async_trait::async_trait;

use super::report::{DateRange, SoldLine};
use crate::domain::shared::{RepositoryError, ShopId};

/// Read access to ordered items for reporting.
#[async_trait]
pub trait StatisticsRepository: Send + Sync {
    /// Ordered-item rows of `shop` whose order time lies inside `range`.
    async fn sold_lines(
        &self,
        shop: ShopId,
        range: DateRange,
    ) -> Result<Vec<SoldLine>, RepositoryError>;
}
