//! Ordered items for the sales report.

use async_trait::async_trait;

use super::records::count;
use super::{SqliteStore, storage};
use crate::domain::shared::{ItemId, RepositoryError, ShopId};
use crate::domain::statistics::{DateRange, SoldLine, StatisticsRepository};

#[async_trait]
impl StatisticsRepository for SqliteStore {
    async fn sold_lines(
        &self,
        shop: ShopId,
        range: DateRange,
    ) -> Result<Vec<SoldLine>, RepositoryError> {
        let (start, end) = range.bounds();
        let rows = sqlx::query_as::<_, (i64, i64, String, i64)>(
            "SELECT oi.item_id, i.code, i.name, oi.quantity \
             FROM ordered_items oi \
             JOIN items i ON i.id = oi.item_id \
             JOIN orders o ON o.id = oi.order_id \
             WHERE i.shop_id = ?1 AND o.created >= ?2 AND o.created < ?3 \
             ORDER BY oi.id",
        )
        .bind(shop.get())
        .bind(start.unix_millis())
        .bind(end.unix_millis())
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        rows.into_iter()
            .map(|(item_id, code, name, quantity)| {
                Ok(SoldLine {
                    item_id: ItemId::new(item_id),
                    code,
                    name,
                    quantity: count("quantity", quantity)?,
                })
            })
            .collect()
    }
}
