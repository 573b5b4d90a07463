//! Catalog Repository Trait
//!
//! Persistence abstraction for shops, items and item files.

use async_trait::async_trait;

use super::entities::{
    HomeEntry, ImportSummary, Item, ItemFile, Shop, ShowcaseEntry, ShowcaseKind, StockLine,
};
use super::value_objects::{ItemDraft, ShopDraft};
use crate::domain::shared::{ItemId, Page, PageRequest, RepositoryError, ShopId, UserId};

/// Repository trait for the catalog.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Insert a shop owned by `seller`.
    async fn create_shop(&self, seller: UserId, draft: &ShopDraft)
    -> Result<Shop, RepositoryError>;

    /// Overwrite a shop's editable fields.
    async fn update_shop(&self, id: ShopId, draft: &ShopDraft) -> Result<Shop, RepositoryError>;

    /// Find a shop by ID.
    async fn find_shop(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError>;

    /// All shops, by ID.
    async fn list_shops(&self, page: PageRequest) -> Result<Page<Shop>, RepositoryError>;

    /// Shops owned by one seller.
    async fn shops_of(&self, seller: UserId) -> Result<Vec<Shop>, RepositoryError>;

    /// Items of one shop with stock, by code.
    async fn shop_stock(
        &self,
        shop: ShopId,
        page: PageRequest,
    ) -> Result<Page<StockLine>, RepositoryError>;

    /// Every item with its shop name, by item name.
    async fn home_entries(&self, page: PageRequest) -> Result<Page<HomeEntry>, RepositoryError>;

    /// Insert an item and its files.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] when the code is taken.
    async fn create_item(&self, shop: ShopId, draft: &ItemDraft) -> Result<Item, RepositoryError>;

    /// Overwrite an item's fields and append new files.
    async fn update_item(&self, id: ItemId, draft: &ItemDraft) -> Result<Item, RepositoryError>;

    /// Find an item by ID.
    async fn find_item(&self, id: ItemId) -> Result<Option<Item>, RepositoryError>;

    /// Files attached to an item, oldest first.
    async fn item_files(&self, id: ItemId) -> Result<Vec<ItemFile>, RepositoryError>;

    /// Full (unpaginated) showcase listing, by code.
    async fn showcase(&self, kind: ShowcaseKind) -> Result<Vec<ShowcaseEntry>, RepositoryError>;

    /// Upsert every row by code into `shop` inside one transaction.
    ///
    /// Row numbers in errors are one-based positions in `rows`.
    ///
    /// # Errors
    ///
    /// Any failing row rolls back the whole import.
    async fn import_items(
        &self,
        shop: ShopId,
        rows: &[ItemDraft],
    ) -> Result<ImportSummary, RepositoryError>;
}
