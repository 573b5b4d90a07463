//! Item creation, editing, detail pages, the home listing and CSV import.

use std::str::FromStr;
use std::sync::Arc;

use crate::application::ports::ShowcaseCache;
use crate::config::PageSizes;
use crate::domain::accounts::Account;
use crate::domain::catalog::{
    CatalogRepository, HomeEntry, ImportSummary, ItemDetail, ItemDraft,
};
use crate::domain::shared::{ItemId, Money, Page, PageRequest, RepositoryError, ShopId};
use crate::error::{ErrorCode, MarketplaceError};
use crate::observability::{UseCaseTimer, record_items_imported};

use super::shops::owned_shop;

/// Columns of an import row, in order.
pub const IMPORT_COLUMNS: [&str; 5] = ["code", "name", "price", "description", "amount"];

/// Use case for items.
pub struct ItemsUseCase<R>
where
    R: CatalogRepository,
{
    repo: Arc<R>,
    cache: Arc<dyn ShowcaseCache>,
    page_sizes: PageSizes,
}

impl<R> ItemsUseCase<R>
where
    R: CatalogRepository,
{
    /// Create a new ItemsUseCase.
    pub fn new(repo: Arc<R>, cache: Arc<dyn ShowcaseCache>, page_sizes: PageSizes) -> Self {
        Self {
            repo,
            cache,
            page_sizes,
        }
    }

    /// Every item with its shop name, by name.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn home(&self, page: Option<&str>) -> Result<Page<HomeEntry>, MarketplaceError> {
        let page = PageRequest::parse(page, self.page_sizes.home);
        Ok(self.repo.home_entries(page).await?)
    }

    /// Add an item to a shop owned by the requester.
    ///
    /// # Errors
    ///
    /// Foreign shops, invalid fields or a taken code.
    pub async fn create(
        &self,
        actor: &Account,
        shop: ShopId,
        draft: ItemDraft,
    ) -> Result<ItemDetail, MarketplaceError> {
        actor.require_seller("adding items")?;
        owned_shop(self.repo.as_ref(), actor, shop).await?;
        draft.validate()?;
        let item = self.repo.create_item(shop, &draft).await?;
        self.cache.invalidate_all();
        tracing::info!(item_id = %item.id, shop_id = %shop, code = item.code, "item created");
        self.with_files(item.id, true).await
    }

    /// Change an item in a shop owned by the requester; new files are appended.
    ///
    /// # Errors
    ///
    /// Unknown items, foreign shops, invalid fields or a taken code.
    pub async fn edit(
        &self,
        actor: &Account,
        id: ItemId,
        draft: ItemDraft,
    ) -> Result<ItemDetail, MarketplaceError> {
        actor.require_seller("editing items")?;
        let item = self
            .repo
            .find_item(id)
            .await?
            .ok_or_else(|| MarketplaceError::not_found("Item", id))?;
        owned_shop(self.repo.as_ref(), actor, item.shop_id).await?;
        draft.validate()?;
        self.repo.update_item(id, &draft).await?;
        self.cache.invalidate_all();
        tracing::info!(item_id = %id, shop_id = %item.shop_id, "item updated");
        self.with_files(id, true).await
    }

    /// Item page; stock is disclosed to sellers only.
    ///
    /// # Errors
    ///
    /// Unknown items.
    pub async fn detail(
        &self,
        viewer: Option<&Account>,
        id: ItemId,
    ) -> Result<ItemDetail, MarketplaceError> {
        self.with_files(id, viewer.is_some_and(Account::is_seller))
            .await
    }

    /// Upsert items by code from CSV text, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_IMPORT` naming the first failing row.
    pub async fn import_csv(
        &self,
        actor: &Account,
        shop: ShopId,
        data: &str,
    ) -> Result<ImportSummary, MarketplaceError> {
        let timer = UseCaseTimer::start("import_items");
        let result = self.try_import(actor, shop, data).await;
        match &result {
            Ok(summary) => record_items_imported("ok", summary.created + summary.updated),
            Err(_) => record_items_imported("rejected", 0),
        }
        timer.finish(result)
    }

    async fn try_import(
        &self,
        actor: &Account,
        shop: ShopId,
        data: &str,
    ) -> Result<ImportSummary, MarketplaceError> {
        actor.require_seller("importing items")?;
        owned_shop(self.repo.as_ref(), actor, shop).await?;

        let rows = parse_import(data)?;
        if rows.is_empty() {
            return Err(MarketplaceError::invalid_request("the import contains no rows"));
        }

        let summary = self
            .repo
            .import_items(shop, &rows)
            .await
            .map_err(|err| match err {
                RepositoryError::Domain(_) | RepositoryError::Conflict { .. } => {
                    MarketplaceError::new(ErrorCode::InvalidImport, err.to_string())
                }
                other => other.into(),
            })?;
        self.cache.invalidate_all();
        tracing::info!(
            shop_id = %shop,
            created = summary.created,
            updated = summary.updated,
            "items imported"
        );
        Ok(summary)
    }

    async fn with_files(&self, id: ItemId, show_stock: bool) -> Result<ItemDetail, MarketplaceError> {
        let item = self
            .repo
            .find_item(id)
            .await?
            .ok_or_else(|| MarketplaceError::not_found("Item", id))?;
        let files = self.repo.item_files(id).await?;
        Ok(ItemDetail::new(item, files, show_stock))
    }
}

/// Parse `code,name,price,description,amount` rows.
///
/// Blank lines are skipped; row numbers in errors count the remaining rows
/// from one.
///
/// # Errors
///
/// Returns `INVALID_IMPORT` for the first malformed or invalid row.
pub fn parse_import(data: &str) -> Result<Vec<ItemDraft>, MarketplaceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .quote(b'"')
        .flexible(true)
        .from_reader(data.as_bytes());

    let mut drafts = Vec::new();
    for record in reader.records() {
        let row = drafts.len() + 1;
        let record = record.map_err(|e| MarketplaceError::invalid_import(row, e.to_string()))?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if record.len() != IMPORT_COLUMNS.len() {
            return Err(MarketplaceError::invalid_import(
                row,
                format!(
                    "expected {} columns ({}), found {}",
                    IMPORT_COLUMNS.len(),
                    IMPORT_COLUMNS.join(","),
                    record.len()
                ),
            ));
        }

        let field = |index: usize| record.get(index).unwrap_or_default().trim();
        let code = field(0)
            .parse::<i64>()
            .map_err(|_| MarketplaceError::invalid_import(row, "code must be an integer"))?;
        let price = Money::from_str(field(2))
            .map_err(|_| MarketplaceError::invalid_import(row, "price must be a decimal number"))?;
        let amount = field(4).parse::<u32>().map_err(|_| {
            MarketplaceError::invalid_import(row, "amount must be a non-negative integer")
        })?;

        let draft = ItemDraft {
            code,
            name: field(1).to_string(),
            description: record.get(3).unwrap_or_default().to_string(),
            price,
            amount,
            is_promotion: false,
            is_offer: false,
            files: Vec::new(),
        };
        draft
            .validate()
            .map_err(|e| MarketplaceError::invalid_import(row, e.to_string()))?;
        drafts.push(draft);
    }
    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::Fixture;
    use crate::domain::catalog::ShowcaseKind;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    #[test]
    fn parses_rows_and_skips_blank_lines() {
        let rows = parse_import("1,Mug,4.50,\"Big, blue\\nceramic\",3\n\n2,Plate,7,,0\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, 1);
        assert_eq!(rows[0].description, "Big, blue\\nceramic");
        assert_eq!(rows[0].price, Money::new(dec!(4.50)));
        assert_eq!(rows[1].amount, 0);
    }

    #[test_case("x,Mug,1,d,1", "code" ; "non numeric code")]
    #[test_case("1,Mug,abc,d,1", "price" ; "non numeric price")]
    #[test_case("1,Mug,1.999,d,1", "price" ; "over precise price")]
    #[test_case("1,Mug,1,d,-2", "amount" ; "negative amount")]
    #[test_case("1,Mug,1,d", "columns" ; "missing column")]
    #[test_case("1,,1,d,1", "name" ; "blank name")]
    fn rejects_bad_rows(line: &str, mentions: &str) {
        let data = format!("5,Fine,1,ok,1\n{line}\n");
        let err = parse_import(&data).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidImport);
        assert!(err.message().starts_with("row 2:"), "{}", err.message());
        assert!(err.message().contains(mentions), "{}", err.message());
    }

    #[tokio::test]
    async fn import_is_all_or_nothing() {
        let fx = Fixture::new().await;
        let seller = fx.seller("sam").await;
        let shop = fx.shop(&seller, "Tea").await;

        let err = fx
            .items
            .import_csv(&seller, shop.id, "1,Mug,4,d,3\n2,Pot,oops,d,1\n")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidImport);
        assert_eq!(fx.items.home(None).await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn import_upserts_by_code() {
        let fx = Fixture::new().await;
        let seller = fx.seller("sam").await;
        let shop = fx.shop(&seller, "Tea").await;

        let first = fx
            .items
            .import_csv(&seller, shop.id, "1,Mug,4,d,3\n2,Pot,9,d,1\n")
            .await
            .unwrap();
        assert_eq!(first, ImportSummary { created: 2, updated: 0 });

        let second = fx
            .items
            .import_csv(&seller, shop.id, "2,Big Pot,11,d,5\n3,Cup,2,d,8\n")
            .await
            .unwrap();
        assert_eq!(second, ImportSummary { created: 1, updated: 1 });

        let stock = fx.shops.detail(&seller, shop.id, None).await.unwrap();
        assert_eq!(stock.items.count, 3);
        let pot = stock.items.items.iter().find(|line| line.code == 2).unwrap();
        assert_eq!(pot.name, "Big Pot");
        assert_eq!(pot.amount, 5);
    }

    #[tokio::test]
    async fn import_refuses_codes_of_other_shops() {
        let fx = Fixture::new().await;
        let seller = fx.seller("sam").await;
        let other = fx.seller("sue").await;
        let mine = fx.shop(&seller, "Tea").await;
        let theirs = fx.shop(&other, "Cups").await;
        fx.items.import_csv(&other, theirs.id, "7,Cup,2,d,1\n").await.unwrap();

        let err = fx
            .items
            .import_csv(&seller, mine.id, "8,Saucer,1,d,1\n7,Stolen,2,d,1\n")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidImport);
        assert!(err.message().contains("row 2"), "{}", err.message());

        let stock = fx.shops.detail(&seller, mine.id, None).await.unwrap();
        assert_eq!(stock.items.count, 0);
    }

    #[tokio::test]
    async fn detail_shows_stock_to_sellers_only() {
        let fx = Fixture::new().await;
        let seller = fx.seller("sam").await;
        let buyer = fx.buyer("ann").await;
        let shop = fx.shop(&seller, "Tea").await;
        let item = fx.item(&seller, shop.id, 10, "9.99", 4).await;

        let as_seller = fx.items.detail(Some(&seller), item.id).await.unwrap();
        assert_eq!(as_seller.amount, Some(4));
        let as_buyer = fx.items.detail(Some(&buyer), item.id).await.unwrap();
        assert_eq!(as_buyer.amount, None);
        let anonymous = fx.items.detail(None, item.id).await.unwrap();
        assert_eq!(anonymous.amount, None);
    }

    #[tokio::test]
    async fn edit_appends_files_and_invalidates_showcases() {
        let fx = Fixture::new().await;
        let seller = fx.seller("sam").await;
        let shop = fx.shop(&seller, "Tea").await;
        let item = fx.item(&seller, shop.id, 10, "9.99", 4).await;
        fx.cache.put(ShowcaseKind::Shop(shop.id), fx.cache.generation(), Arc::new(vec![]));

        let mut draft = Fixture::draft(10, "9.99", 4);
        draft.files = vec!["files/a.png".to_string()];
        fx.items.edit(&seller, item.id, draft.clone()).await.unwrap();
        draft.files = vec!["files/b.png".to_string()];
        let detail = fx.items.edit(&seller, item.id, draft).await.unwrap();

        assert_eq!(detail.files, vec!["files/a.png", "files/b.png"]);
        assert!(fx.cache.get(ShowcaseKind::Shop(shop.id)).is_none());
    }

    #[tokio::test]
    async fn duplicate_code_is_a_conflict() {
        let fx = Fixture::new().await;
        let seller = fx.seller("sam").await;
        let shop = fx.shop(&seller, "Tea").await;
        fx.item(&seller, shop.id, 10, "1", 1).await;

        let err = fx
            .items
            .create(&seller, shop.id, Fixture::draft(10, "2", 1))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyExists);
    }
}
