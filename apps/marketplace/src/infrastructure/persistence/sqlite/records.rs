//! Row records and their conversion into domain types.

use sqlx::FromRow;

use crate::domain::accounts::{Account, Profile, User};
use crate::domain::catalog::{Item, Shop};
use crate::domain::ordering::{CartLine, Order, OrderCode, OrderLine, OrderStatus};
use crate::domain::shared::{
    ItemId, Money, OrderId, PageWindow, RepositoryError, ShopId, Timestamp, UserId,
};

pub(super) const ACCOUNT_COLUMNS: &str = "u.id, u.username, u.first_name, u.last_name, u.is_staff, \
     p.registration_date, p.is_seller, p.avatar, p.funds, p.purchases";

pub(super) const ITEM_COLUMNS: &str =
    "id, shop_id, code, name, description, price, amount, is_promotion, is_offer";

pub(super) const ORDER_COLUMNS: &str = "id, code, created, status, user_id";

#[derive(Debug, FromRow)]
pub(super) struct AccountRecord {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub registration_date: i64,
    pub is_seller: bool,
    pub avatar: Option<String>,
    pub funds: String,
    pub purchases: i64,
}

impl TryFrom<AccountRecord> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRecord) -> Result<Self, Self::Error> {
        let id = UserId::new(row.id);
        Ok(Self {
            profile: Profile {
                user_id: id,
                registration_date: timestamp("registration_date", row.registration_date)?,
                is_seller: row.is_seller,
                avatar: row.avatar,
                funds: money("funds", &row.funds)?,
                purchases: count("purchases", row.purchases)?,
            },
            user: User {
                id,
                username: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
                is_staff: row.is_staff,
            },
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct ShopRecord {
    pub id: i64,
    pub seller_id: i64,
    pub name: String,
    pub tags: String,
    pub logo: Option<String>,
}

impl From<ShopRecord> for Shop {
    fn from(row: ShopRecord) -> Self {
        Self {
            id: ShopId::new(row.id),
            seller_id: UserId::new(row.seller_id),
            name: row.name,
            tags: row.tags,
            logo: row.logo,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct ItemRecord {
    pub id: i64,
    pub shop_id: i64,
    pub code: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub amount: i64,
    pub is_promotion: bool,
    pub is_offer: bool,
}

impl TryFrom<ItemRecord> for Item {
    type Error = RepositoryError;

    fn try_from(row: ItemRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ItemId::new(row.id),
            shop_id: ShopId::new(row.shop_id),
            code: row.code,
            price: money("price", &row.price)?,
            amount: count("amount", row.amount)?,
            name: row.name,
            description: row.description,
            is_promotion: row.is_promotion,
            is_offer: row.is_offer,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct CartLineRecord {
    pub id: i64,
    pub item_id: i64,
    pub name: String,
    pub price: String,
    pub stock: i64,
    pub quantity: i64,
}

impl TryFrom<CartLineRecord> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartLineRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            item_id: ItemId::new(row.item_id),
            name: row.name,
            price: money("price", &row.price)?,
            stock: count("amount", row.stock)?,
            quantity: count("quantity", row.quantity)?,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct OrderRecord {
    pub id: i64,
    pub code: String,
    pub created: i64,
    pub status: String,
    pub user_id: i64,
}

impl TryFrom<OrderRecord> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderId::new(row.id),
            code: OrderCode::parse(&row.code).map_err(|_| RepositoryError::corrupt("code", &row.code))?,
            created: timestamp("created", row.created)?,
            status: order_status(&row.status)?,
            user_id: UserId::new(row.user_id),
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct OrderLineRecord {
    pub item_id: i64,
    pub name: String,
    pub price: String,
    pub quantity: i64,
    pub total_cost: String,
}

impl TryFrom<OrderLineRecord> for OrderLine {
    type Error = RepositoryError;

    fn try_from(row: OrderLineRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            item_id: ItemId::new(row.item_id),
            name: row.name,
            price: money("price", &row.price)?,
            quantity: count("quantity", row.quantity)?,
            total_cost: money("total_cost", &row.total_cost)?,
        })
    }
}

/// Decode a decimal text column.
pub(super) fn money(field: &str, raw: &str) -> Result<Money, RepositoryError> {
    raw.parse::<Money>()
        .map_err(|_| RepositoryError::corrupt(field, raw))
}

/// Decode a Unix-millisecond column.
pub(super) fn timestamp(field: &str, millis: i64) -> Result<Timestamp, RepositoryError> {
    Timestamp::from_unix_millis(millis).ok_or_else(|| RepositoryError::corrupt(field, millis))
}

/// Decode a non-negative integer column.
pub(super) fn count(field: &str, raw: i64) -> Result<u32, RepositoryError> {
    u32::try_from(raw).map_err(|_| RepositoryError::corrupt(field, raw))
}

/// Decode a one-letter order status column.
pub(super) fn order_status(raw: &str) -> Result<OrderStatus, RepositoryError> {
    OrderStatus::from_code(raw).ok_or_else(|| RepositoryError::corrupt("status", raw))
}

/// Convert a row count reported by SQLite.
pub(super) fn row_count(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or_default()
}

/// `LIMIT` and `OFFSET` bind values for a resolved page.
pub(super) fn limit_offset(window: PageWindow) -> (i64, i64) {
    (
        i64::try_from(window.limit).unwrap_or(i64::MAX),
        i64::try_from(window.offset).unwrap_or(i64::MAX),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("12.50", true ; "decimal text")]
    #[test_case("0", true ; "integer text")]
    #[test_case("twelve", false ; "garbage")]
    fn decodes_money(raw: &str, ok: bool) {
        assert_eq!(money("funds", raw).is_ok(), ok);
    }

    #[test]
    fn negative_counts_are_corrupt() {
        let err = count("amount", -1).unwrap_err();
        assert_eq!(err.to_string(), "corrupt value in column 'amount': -1");
    }

    #[test]
    fn unknown_status_is_corrupt() {
        assert!(order_status("x").is_err());
        assert_eq!(order_status("b").unwrap(), OrderStatus::Paid);
    }
}
