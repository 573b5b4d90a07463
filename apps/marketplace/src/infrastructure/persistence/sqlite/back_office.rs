//! Display rows for every back office table.

use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::sqlite::SqliteRow;

use super::records::{limit_offset, money, order_status, row_count, timestamp};
use super::{SqliteStore, storage};
use crate::domain::back_office::{AdminModel, AdminRow, BackOfficeRepository};
use crate::domain::ordering::{OrderCode, OrderStatus};
use crate::domain::shared::{Page, PageRequest, RepositoryError, UserId};

fn flag(value: bool) -> String {
    value.to_string()
}

fn optional(value: Option<String>) -> String {
    value.unwrap_or_default()
}

impl SqliteStore {
    async fn listing<T, F>(
        &self,
        table: &str,
        select: &str,
        page: PageRequest,
        to_row: F,
    ) -> Result<Page<AdminRow>, RepositoryError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
        F: Fn(T) -> Result<AdminRow, RepositoryError>,
    {
        let (total,) = sqlx::query_as::<_, (i64,)>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        let window = page.resolve(row_count(total));
        let (limit, offset) = limit_offset(window);

        let sql = format!("{select} LIMIT ?1 OFFSET ?2");
        let rows = sqlx::query_as::<_, T>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?
            .into_iter()
            .map(to_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(window.into_page(rows))
    }
}

#[async_trait]
impl BackOfficeRepository for SqliteStore {
    async fn admin_rows(
        &self,
        model: AdminModel,
        page: PageRequest,
    ) -> Result<Page<AdminRow>, RepositoryError> {
        match model {
            AdminModel::Shops => {
                self.listing(
                    "shops",
                    "SELECT s.id, s.name, u.username, s.tags, s.logo \
                     FROM shops s JOIN users u ON u.id = s.seller_id ORDER BY s.id",
                    page,
                    |(id, name, seller, tags, logo): (i64, String, String, String, Option<String>)| {
                        Ok(AdminRow {
                            key: id.to_string(),
                            cells: vec![name, seller, tags, optional(logo)],
                        })
                    },
                )
                .await
            }
            AdminModel::Items => {
                self.listing(
                    "items",
                    "SELECT id, code, name, price, amount FROM items ORDER BY code, id",
                    page,
                    |(id, code, name, price, amount): (i64, i64, String, String, i64)| {
                        Ok(AdminRow {
                            key: id.to_string(),
                            cells: vec![
                                code.to_string(),
                                name,
                                money("price", &price)?.to_string(),
                                amount.to_string(),
                            ],
                        })
                    },
                )
                .await
            }
            AdminModel::Files => {
                self.listing(
                    "item_files",
                    "SELECT f.id, i.name, f.path \
                     FROM item_files f JOIN items i ON i.id = f.item_id ORDER BY f.id",
                    page,
                    |(id, item, path): (i64, String, String)| {
                        Ok(AdminRow {
                            key: id.to_string(),
                            cells: vec![item, path],
                        })
                    },
                )
                .await
            }
            AdminModel::Orders => {
                self.listing(
                    "orders",
                    "SELECT o.code, o.created, o.status, u.username \
                     FROM orders o JOIN users u ON u.id = o.user_id \
                     ORDER BY o.created DESC, o.id DESC",
                    page,
                    |(code, created, status, buyer): (String, i64, String, String)| {
                        Ok(AdminRow {
                            key: code.clone(),
                            cells: vec![
                                code,
                                timestamp("created", created)?.to_rfc3339(),
                                order_status(&status)?.label().to_string(),
                                buyer,
                            ],
                        })
                    },
                )
                .await
            }
            AdminModel::Carts => {
                self.listing(
                    "cart_lines",
                    "SELECT c.id, i.name, c.quantity, u.username \
                     FROM cart_lines c \
                     JOIN items i ON i.id = c.item_id \
                     JOIN users u ON u.id = c.user_id ORDER BY c.id",
                    page,
                    |(id, item, quantity, buyer): (i64, String, i64, String)| {
                        Ok(AdminRow {
                            key: id.to_string(),
                            cells: vec![item, quantity.to_string(), buyer],
                        })
                    },
                )
                .await
            }
            AdminModel::OrderedItems => {
                self.listing(
                    "ordered_items",
                    "SELECT oi.id, o.code, i.name, oi.quantity, u.username, oi.total_cost \
                     FROM ordered_items oi \
                     JOIN orders o ON o.id = oi.order_id \
                     JOIN items i ON i.id = oi.item_id \
                     JOIN users u ON u.id = oi.user_id ORDER BY oi.id",
                    page,
                    |(id, order, item, quantity, buyer, total): (i64, String, String, i64, String, String)| {
                        Ok(AdminRow {
                            key: id.to_string(),
                            cells: vec![
                                order,
                                item,
                                quantity.to_string(),
                                buyer,
                                money("total_cost", &total)?.to_string(),
                            ],
                        })
                    },
                )
                .await
            }
            AdminModel::Profiles => {
                self.listing(
                    "profiles",
                    "SELECT p.user_id, u.username, p.registration_date, p.funds, p.is_seller, p.avatar \
                     FROM profiles p JOIN users u ON u.id = p.user_id ORDER BY p.user_id",
                    page,
                    |(id, user, registered, funds, is_seller, avatar): (i64, String, i64, String, bool, Option<String>)| {
                        Ok(AdminRow {
                            key: id.to_string(),
                            cells: vec![
                                user,
                                timestamp("registration_date", registered)?.to_rfc3339(),
                                money("funds", &funds)?.to_string(),
                                flag(is_seller),
                                optional(avatar),
                            ],
                        })
                    },
                )
                .await
            }
        }
    }

    async fn set_order_status(
        &self,
        code: &OrderCode,
        status: OrderStatus,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = ?2 WHERE code = ?1")
            .bind(code.as_str())
            .bind(status.as_code())
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_seller(&self, user: UserId, is_seller: bool) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE profiles SET is_seller = ?2 WHERE user_id = ?1")
            .bind(user.get())
            .bind(is_seller)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(result.rows_affected() > 0)
    }
}
