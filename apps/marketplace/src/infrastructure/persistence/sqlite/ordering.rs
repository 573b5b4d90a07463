//! Carts, checkout and payment.

use async_trait::async_trait;
use sqlx::SqliteConnection;

use super::accounts::fetch_account;
use super::records::{
    CartLineRecord, ORDER_COLUMNS, OrderLineRecord, OrderRecord, count, limit_offset, row_count,
};
use super::{SqliteStore, storage, write_error};
use crate::domain::ordering::{
    CartLine, CheckoutSelection, Order, OrderCode, OrderDetail, OrderLine, OrderStatus,
    OrderingRepository, PaymentReceipt, plan_checkout, take_stock,
};
use crate::domain::shared::{
    DomainError, ItemId, Money, OrderId, Page, PageRequest, RepositoryError, Timestamp, UserId,
};

async fn cart_lines(conn: &mut SqliteConnection, user: UserId) -> Result<Vec<CartLine>, RepositoryError> {
    sqlx::query_as::<_, CartLineRecord>(
        "SELECT c.id, c.item_id, i.name, i.price, i.amount AS stock, c.quantity \
         FROM cart_lines c JOIN items i ON i.id = c.item_id \
         WHERE c.user_id = ?1 ORDER BY c.id",
    )
    .bind(user.get())
    .fetch_all(conn)
    .await
    .map_err(storage)?
    .into_iter()
    .map(CartLine::try_from)
    .collect()
}

async fn order_by_code(
    conn: &mut SqliteConnection,
    code: &OrderCode,
) -> Result<Option<Order>, RepositoryError> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE code = ?1");
    sqlx::query_as::<_, OrderRecord>(&sql)
        .bind(code.as_str())
        .fetch_optional(conn)
        .await
        .map_err(storage)?
        .map(Order::try_from)
        .transpose()
}

async fn order_lines(conn: &mut SqliteConnection, order: OrderId) -> Result<Vec<OrderLine>, RepositoryError> {
    sqlx::query_as::<_, OrderLineRecord>(
        "SELECT o.item_id, i.name, i.price, o.quantity, o.total_cost \
         FROM ordered_items o JOIN items i ON i.id = o.item_id \
         WHERE o.order_id = ?1 ORDER BY o.id",
    )
    .bind(order.get())
    .fetch_all(conn)
    .await
    .map_err(storage)?
    .into_iter()
    .map(OrderLine::try_from)
    .collect()
}

async fn order_detail(
    conn: &mut SqliteConnection,
    code: &OrderCode,
) -> Result<Option<OrderDetail>, RepositoryError> {
    let Some(order) = order_by_code(&mut *conn, code).await? else {
        return Ok(None);
    };
    let lines = order_lines(conn, order.id).await?;
    Ok(Some(OrderDetail::new(order, lines)))
}

/// Decrement an item's stock, refusing to oversell.
async fn ship(conn: &mut SqliteConnection, item: ItemId, ordered: u32) -> Result<(), RepositoryError> {
    let (stock,) = sqlx::query_as::<_, (i64,)>("SELECT amount FROM items WHERE id = ?1")
        .bind(item.get())
        .fetch_optional(&mut *conn)
        .await
        .map_err(storage)?
        .ok_or_else(|| DomainError::not_found("Item", item))?;
    let left = take_stock(item, count("amount", stock)?, ordered)?;

    sqlx::query("UPDATE items SET amount = ?2 WHERE id = ?1")
        .bind(item.get())
        .bind(i64::from(left))
        .execute(conn)
        .await
        .map_err(storage)?;
    Ok(())
}

#[async_trait]
impl OrderingRepository for SqliteStore {
    async fn add_to_cart(&self, user: UserId, item: ItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO cart_lines (user_id, item_id, quantity) VALUES (?1, ?2, 1) \
             ON CONFLICT (user_id, item_id) DO NOTHING",
        )
        .bind(user.get())
        .bind(item.get())
        .execute(&self.pool)
        .await
        .map_err(storage)?;
        Ok(result.rows_affected() == 1)
    }

    async fn cart(&self, user: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let mut conn = self.pool.acquire().await.map_err(storage)?;
        cart_lines(&mut conn, user).await
    }

    async fn clear_cart(&self, user: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE user_id = ?1")
            .bind(user.get())
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(result.rows_affected())
    }

    async fn place_order(
        &self,
        user: UserId,
        selection: &[CheckoutSelection],
        now: Timestamp,
    ) -> Result<OrderDetail, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let cart = cart_lines(&mut tx, user).await?;
        let planned = plan_checkout(&cart, selection)?;
        let code = OrderCode::generate(user, now);

        let result = sqlx::query(
            "INSERT INTO orders (code, created, status, user_id) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(code.as_str())
        .bind(now.unix_millis())
        .bind(OrderStatus::Placed.as_code())
        .bind(user.get())
        .execute(&mut *tx)
        .await
        .map_err(write_error("Order", format!("code {code}")))?;
        let order_id = result.last_insert_rowid();

        for line in &planned {
            sqlx::query(
                "INSERT INTO ordered_items (order_id, item_id, user_id, quantity, total_cost) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(order_id)
            .bind(line.item_id.get())
            .bind(user.get())
            .bind(i64::from(line.quantity))
            .bind(line.total_cost.to_storage())
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

            sqlx::query("DELETE FROM cart_lines WHERE id = ?1")
                .bind(line.cart_line_id)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }

        let detail = order_detail(&mut tx, &code)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", &code))?;
        tx.commit().await.map_err(storage)?;
        Ok(detail)
    }

    async fn find_order(&self, code: &OrderCode) -> Result<Option<OrderDetail>, RepositoryError> {
        let mut conn = self.pool.acquire().await.map_err(storage)?;
        order_detail(&mut conn, code).await
    }

    async fn pay_order(
        &self,
        user: UserId,
        code: &OrderCode,
        now: Timestamp,
    ) -> Result<PaymentReceipt, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let mut order = order_by_code(&mut tx, code)
            .await?
            .filter(|order| order.user_id == user)
            .ok_or_else(|| DomainError::not_found("Order", code))?;
        let lines = order_lines(&mut tx, order.id).await?;
        order.mark_paid(now)?;

        let mut account = fetch_account(&mut tx, user)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user))?;
        let total: Money = lines.iter().map(|line| line.total_cost).sum();
        let charge = account
            .profile
            .charge(total, u32::try_from(lines.len()).unwrap_or(u32::MAX))?;

        sqlx::query("UPDATE profiles SET funds = ?2, purchases = ?3 WHERE user_id = ?1")
            .bind(user.get())
            .bind(account.profile.funds.to_storage())
            .bind(i64::from(account.profile.purchases))
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        sqlx::query("UPDATE orders SET status = ?2, created = ?3 WHERE id = ?1")
            .bind(order.id.get())
            .bind(order.status.as_code())
            .bind(order.created.unix_millis())
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        for line in &lines {
            ship(&mut tx, line.item_id, line.quantity).await?;
        }

        tx.commit().await.map_err(storage)?;
        Ok(PaymentReceipt {
            order,
            debited: charge.debited,
            balance: account.profile.funds,
            purchases: account.profile.purchases,
            buyer_status: charge.status,
            status_upgraded: charge.upgraded(),
        })
    }

    async fn order_history(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Page<Order>, RepositoryError> {
        let (total,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM orders WHERE user_id = ?1")
            .bind(user.get())
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        let window = page.resolve(row_count(total));
        let (limit, offset) = limit_offset(window);

        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1 \
             ORDER BY created DESC, id DESC LIMIT ?2 OFFSET ?3"
        );
        let orders = sqlx::query_as::<_, OrderRecord>(&sql)
            .bind(user.get())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(window.into_page(orders))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::accounts::{AccountRepository, NewUser};
    use crate::domain::catalog::{CatalogRepository, ItemDraft, ShopDraft};
    use crate::domain::shared::rules;

    struct Seeded {
        store: SqliteStore,
        buyer: UserId,
        item: ItemId,
        now: Timestamp,
    }

    async fn seeded(price_cents: i64, stock: u32) -> Seeded {
        let store = SqliteStore::in_memory().await.unwrap();
        let now = Timestamp::parse("2026-03-01T09:00:00Z").unwrap();
        let user = |name: &str, is_seller| NewUser {
            username: name.to_string(),
            password_hash: "x".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff: false,
            is_seller,
            registered_at: now,
        };
        let seller = store.create_account(user("sam", true)).await.unwrap().id();
        let buyer = store.create_account(user("ann", false)).await.unwrap().id();
        let shop = store
            .create_shop(seller, &ShopDraft { name: "Tea".to_string(), ..ShopDraft::default() })
            .await
            .unwrap();
        let item = store
            .create_item(
                shop.id,
                &ItemDraft {
                    code: 1,
                    name: "Mug".to_string(),
                    description: String::new(),
                    price: Money::from_cents(price_cents),
                    amount: stock,
                    is_promotion: false,
                    is_offer: false,
                    files: vec![],
                },
            )
            .await
            .unwrap()
            .id;
        Seeded { store, buyer, item, now }
    }

    fn pick(item: ItemId, quantity: u32) -> CheckoutSelection {
        CheckoutSelection {
            item_id: item,
            quantity: Some(quantity),
        }
    }

    #[tokio::test]
    async fn add_to_cart_is_get_or_create() {
        let s = seeded(100, 5).await;
        assert!(s.store.add_to_cart(s.buyer, s.item).await.unwrap());
        assert!(!s.store.add_to_cart(s.buyer, s.item).await.unwrap());
        assert_eq!(s.store.cart(s.buyer).await.unwrap().len(), 1);
        assert_eq!(s.store.clear_cart(s.buyer).await.unwrap(), 1);
        assert!(s.store.cart(s.buyer).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn place_order_moves_lines_out_of_the_cart() {
        let s = seeded(250, 5).await;
        s.store.add_to_cart(s.buyer, s.item).await.unwrap();

        let detail = s
            .store
            .place_order(s.buyer, &[pick(s.item, 3)], s.now)
            .await
            .unwrap();
        assert_eq!(detail.order.status, OrderStatus::Placed);
        assert_eq!(detail.total, Money::from_cents(750));
        assert_eq!(detail.lines[0].quantity, 3);
        assert!(s.store.cart(s.buyer).await.unwrap().is_empty());

        let found = s.store.find_order(&detail.order.code).await.unwrap().unwrap();
        assert_eq!(found, detail);
    }

    #[tokio::test]
    async fn invalid_selection_leaves_cart_untouched() {
        let s = seeded(250, 5).await;
        s.store.add_to_cart(s.buyer, s.item).await.unwrap();
        let err = s
            .store
            .place_order(s.buyer, &[pick(ItemId::new(404), 1)], s.now)
            .await
            .unwrap_err();
        assert!(err.to_string().contains(rules::NOT_IN_CART));
        assert_eq!(s.store.cart(s.buyer).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn pay_order_debits_and_ships() {
        let s = seeded(250, 5).await;
        s.store.replenish_funds(s.buyer, Money::from_cents(1000)).await.unwrap();
        s.store.add_to_cart(s.buyer, s.item).await.unwrap();
        let detail = s.store.place_order(s.buyer, &[pick(s.item, 2)], s.now).await.unwrap();

        let paid_at = s.now.plus_seconds(30);
        let receipt = s.store.pay_order(s.buyer, &detail.order.code, paid_at).await.unwrap();
        assert_eq!(receipt.debited, Money::from_cents(500));
        assert_eq!(receipt.balance, Money::from_cents(500));
        assert_eq!(receipt.purchases, 1);
        assert_eq!(receipt.order.created, paid_at);

        let item = s.store.find_item(s.item).await.unwrap().unwrap();
        assert_eq!(item.amount, 3);
    }

    #[tokio::test]
    async fn short_stock_rolls_back_the_payment() {
        let s = seeded(100, 1).await;
        s.store.replenish_funds(s.buyer, Money::from_cents(1000)).await.unwrap();
        s.store.add_to_cart(s.buyer, s.item).await.unwrap();
        let detail = s.store.place_order(s.buyer, &[pick(s.item, 2)], s.now).await.unwrap();

        let err = s.store.pay_order(s.buyer, &detail.order.code, s.now).await.unwrap_err();
        assert!(err.to_string().contains(rules::INSUFFICIENT_STOCK));

        let account = s.store.find_account(s.buyer).await.unwrap().unwrap();
        assert_eq!(account.profile.funds, Money::from_cents(1000));
        assert_eq!(account.profile.purchases, 0);
        let order = s.store.find_order(&detail.order.code).await.unwrap().unwrap();
        assert_eq!(order.order.status, OrderStatus::Placed);
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let s = seeded(100, 9).await;
        for offset in [0, 60] {
            s.store.add_to_cart(s.buyer, s.item).await.unwrap();
            s.store
                .place_order(s.buyer, &[pick(s.item, 1)], s.now.plus_seconds(offset))
                .await
                .unwrap();
        }
        let page = s.store.order_history(s.buyer, PageRequest::first(10)).await.unwrap();
        assert_eq!(page.count, 2);
        assert!(page.items[0].created > page.items[1].created);
    }
}
