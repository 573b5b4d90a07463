//! Shops, items and their listing projections.

use serde::Serialize;

use super::value_objects::description_lines;
use crate::domain::shared::{ItemId, Money, ShopId, UserId};

/// A seller's shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shop {
    /// Row ID.
    pub id: ShopId,
    /// Owning seller.
    pub seller_id: UserId,
    /// Display name.
    pub name: String,
    /// Free-form tags.
    pub tags: String,
    /// Stored logo path.
    pub logo: Option<String>,
}

impl Shop {
    /// Whether `user` owns this shop.
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.seller_id == user
    }
}

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Row ID.
    pub id: ItemId,
    /// Shop the item is listed in.
    pub shop_id: ShopId,
    /// Article code.
    pub code: i64,
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Unit price.
    pub price: Money,
    /// Units in stock.
    pub amount: u32,
    /// Listed under promotions.
    pub is_promotion: bool,
    /// Listed under special offers.
    pub is_offer: bool,
}

/// An image attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFile {
    /// Row ID.
    pub id: i64,
    /// Owning item.
    pub item_id: ItemId,
    /// Stored path.
    pub path: String,
}

/// Home page row: item name with the shop it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeEntry {
    /// Item row ID.
    pub item_id: ItemId,
    /// Item name.
    pub name: String,
    /// Shop name.
    pub shop_name: String,
}

/// Owner view of an item in a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockLine {
    /// Item row ID.
    pub item_id: ItemId,
    /// Article code.
    pub code: i64,
    /// Item name.
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Units in stock.
    pub amount: u32,
}

/// Showcase card: one per item, with its first image if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowcaseEntry {
    /// Item row ID.
    pub item_id: ItemId,
    /// Item name.
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// First attached image.
    pub image: Option<String>,
}

/// Which items a showcase lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShowcaseKind {
    /// Every item of one shop.
    Shop(ShopId),
    /// Items flagged as promotions.
    Promotions,
    /// Items flagged as special offers.
    Offers,
}

/// Full item page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDetail {
    /// Item row ID.
    pub id: ItemId,
    /// Shop the item is listed in.
    pub shop_id: ShopId,
    /// Article code.
    pub code: i64,
    /// Display name.
    pub name: String,
    /// Description split into lines.
    pub description: Vec<String>,
    /// Unit price.
    pub price: Money,
    /// Stock, only present for sellers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
    /// Listed under promotions.
    pub is_promotion: bool,
    /// Listed under special offers.
    pub is_offer: bool,
    /// Attached image paths.
    pub files: Vec<String>,
}

impl ItemDetail {
    /// Build the page; `show_stock` controls whether `amount` is disclosed.
    #[must_use]
    pub fn new(item: Item, files: Vec<ItemFile>, show_stock: bool) -> Self {
        Self {
            id: item.id,
            shop_id: item.shop_id,
            code: item.code,
            description: description_lines(&item.description),
            name: item.name,
            price: item.price,
            amount: show_stock.then_some(item.amount),
            is_promotion: item.is_promotion,
            is_offer: item.is_offer,
            files: files.into_iter().map(|f| f.path).collect(),
        }
    }
}

/// Result of a CSV import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Rows that created a new item.
    pub created: u32,
    /// Rows that updated an existing item.
    pub updated: u32,
}
