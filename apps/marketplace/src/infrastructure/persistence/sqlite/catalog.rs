//! Shops, items, item files and the listing read models.

use async_trait::async_trait;
use sqlx::SqliteConnection;

use super::records::{
    ITEM_COLUMNS, ItemRecord, ShopRecord, count, limit_offset, money, row_count,
};
use super::{SqliteStore, storage, write_error};
use crate::domain::catalog::{
    CatalogRepository, HomeEntry, ImportSummary, Item, ItemDraft, ItemFile, Shop, ShopDraft,
    ShowcaseEntry, ShowcaseKind, StockLine,
};
use crate::domain::shared::{
    DomainError, ItemId, Page, PageRequest, RepositoryError, ShopId, UserId,
};

async fn fetch_item(conn: &mut SqliteConnection, id: ItemId) -> Result<Option<Item>, RepositoryError> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1");
    sqlx::query_as::<_, ItemRecord>(&sql)
        .bind(id.get())
        .fetch_optional(conn)
        .await
        .map_err(storage)?
        .map(Item::try_from)
        .transpose()
}

async fn require_item(conn: &mut SqliteConnection, id: ItemId) -> Result<Item, RepositoryError> {
    fetch_item(conn, id)
        .await?
        .ok_or_else(|| DomainError::not_found("Item", id).into())
}

async fn attach_files(
    conn: &mut SqliteConnection,
    id: ItemId,
    files: &[String],
) -> Result<(), RepositoryError> {
    for path in files {
        sqlx::query("INSERT INTO item_files (item_id, path) VALUES (?1, ?2)")
            .bind(id.get())
            .bind(path)
            .execute(&mut *conn)
            .await
            .map_err(storage)?;
    }
    Ok(())
}

#[async_trait]
impl CatalogRepository for SqliteStore {
    async fn create_shop(
        &self,
        seller: UserId,
        draft: &ShopDraft,
    ) -> Result<Shop, RepositoryError> {
        let result = sqlx::query("INSERT INTO shops (seller_id, name, tags, logo) VALUES (?1, ?2, ?3, ?4)")
            .bind(seller.get())
            .bind(&draft.name)
            .bind(&draft.tags)
            .bind(draft.logo.as_deref())
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(Shop {
            id: ShopId::new(result.last_insert_rowid()),
            seller_id: seller,
            name: draft.name.clone(),
            tags: draft.tags.clone(),
            logo: draft.logo.clone(),
        })
    }

    async fn update_shop(&self, id: ShopId, draft: &ShopDraft) -> Result<Shop, RepositoryError> {
        let result = sqlx::query("UPDATE shops SET name = ?2, tags = ?3, logo = COALESCE(?4, logo) WHERE id = ?1")
            .bind(id.get())
            .bind(&draft.name)
            .bind(&draft.tags)
            .bind(draft.logo.as_deref())
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Shop", id).into());
        }
        self.find_shop(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Shop", id).into())
    }

    async fn find_shop(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError> {
        let row = sqlx::query_as::<_, ShopRecord>(
            "SELECT id, seller_id, name, tags, logo FROM shops WHERE id = ?1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;
        Ok(row.map(Shop::from))
    }

    async fn list_shops(&self, page: PageRequest) -> Result<Page<Shop>, RepositoryError> {
        let (total,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM shops")
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        let window = page.resolve(row_count(total));
        let (limit, offset) = limit_offset(window);

        let rows = sqlx::query_as::<_, ShopRecord>(
            "SELECT id, seller_id, name, tags, logo FROM shops ORDER BY id LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        Ok(window.into_page(rows.into_iter().map(Shop::from).collect()))
    }

    async fn shops_of(&self, seller: UserId) -> Result<Vec<Shop>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShopRecord>(
            "SELECT id, seller_id, name, tags, logo FROM shops WHERE seller_id = ?1 ORDER BY id",
        )
        .bind(seller.get())
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        Ok(rows.into_iter().map(Shop::from).collect())
    }

    async fn shop_stock(
        &self,
        shop: ShopId,
        page: PageRequest,
    ) -> Result<Page<StockLine>, RepositoryError> {
        let (total,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM items WHERE shop_id = ?1")
            .bind(shop.get())
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        let window = page.resolve(row_count(total));
        let (limit, offset) = limit_offset(window);

        let rows = sqlx::query_as::<_, (i64, i64, String, String, i64)>(
            "SELECT id, code, name, price, amount FROM items WHERE shop_id = ?1 \
             ORDER BY code LIMIT ?2 OFFSET ?3",
        )
        .bind(shop.get())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        let lines = rows
            .into_iter()
            .map(|(id, code, name, price, amount)| {
                Ok(StockLine {
                    item_id: ItemId::new(id),
                    code,
                    name,
                    price: money("price", &price)?,
                    amount: count("amount", amount)?,
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;
        Ok(window.into_page(lines))
    }

    async fn home_entries(&self, page: PageRequest) -> Result<Page<HomeEntry>, RepositoryError> {
        let (total,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        let window = page.resolve(row_count(total));
        let (limit, offset) = limit_offset(window);

        let rows = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT i.id, i.name, s.name FROM items i JOIN shops s ON s.id = i.shop_id \
             ORDER BY i.name, i.id LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(window.into_page(
            rows.into_iter()
                .map(|(id, name, shop_name)| HomeEntry {
                    item_id: ItemId::new(id),
                    name,
                    shop_name,
                })
                .collect(),
        ))
    }

    async fn create_item(&self, shop: ShopId, draft: &ItemDraft) -> Result<Item, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let result = sqlx::query(
            "INSERT INTO items (shop_id, code, name, description, price, amount, is_promotion, is_offer) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(shop.get())
        .bind(draft.code)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price.to_storage())
        .bind(i64::from(draft.amount))
        .bind(draft.is_promotion)
        .bind(draft.is_offer)
        .execute(&mut *tx)
        .await
        .map_err(write_error("Item", format!("code {}", draft.code)))?;
        let id = ItemId::new(result.last_insert_rowid());

        attach_files(&mut tx, id, &draft.files).await?;
        let item = require_item(&mut tx, id).await?;
        tx.commit().await.map_err(storage)?;
        Ok(item)
    }

    async fn update_item(&self, id: ItemId, draft: &ItemDraft) -> Result<Item, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let result = sqlx::query(
            "UPDATE items SET code = ?2, name = ?3, description = ?4, price = ?5, amount = ?6, \
             is_promotion = ?7, is_offer = ?8 WHERE id = ?1",
        )
        .bind(id.get())
        .bind(draft.code)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price.to_storage())
        .bind(i64::from(draft.amount))
        .bind(draft.is_promotion)
        .bind(draft.is_offer)
        .execute(&mut *tx)
        .await
        .map_err(write_error("Item", format!("code {}", draft.code)))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Item", id).into());
        }

        attach_files(&mut tx, id, &draft.files).await?;
        let item = require_item(&mut tx, id).await?;
        tx.commit().await.map_err(storage)?;
        Ok(item)
    }

    async fn find_item(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let mut conn = self.pool.acquire().await.map_err(storage)?;
        fetch_item(&mut conn, id).await
    }

    async fn item_files(&self, id: ItemId) -> Result<Vec<ItemFile>, RepositoryError> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, path FROM item_files WHERE item_id = ?1 ORDER BY id",
        )
        .bind(id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        Ok(rows
            .into_iter()
            .map(|(file_id, path)| ItemFile {
                id: file_id,
                item_id: id,
                path,
            })
            .collect())
    }

    async fn showcase(&self, kind: ShowcaseKind) -> Result<Vec<ShowcaseEntry>, RepositoryError> {
        let filter = match kind {
            ShowcaseKind::Shop(_) => "i.shop_id = ?1",
            ShowcaseKind::Promotions => "i.is_promotion = 1",
            ShowcaseKind::Offers => "i.is_offer = 1",
        };
        let sql = format!(
            "SELECT i.id, i.name, i.price, \
             (SELECT f.path FROM item_files f WHERE f.item_id = i.id ORDER BY f.id LIMIT 1) \
             FROM items i WHERE {filter} ORDER BY i.code"
        );
        let mut query = sqlx::query_as::<_, (i64, String, String, Option<String>)>(&sql);
        if let ShowcaseKind::Shop(shop) = kind {
            query = query.bind(shop.get());
        }
        let rows = query.fetch_all(&self.pool).await.map_err(storage)?;

        rows.into_iter()
            .map(|(id, name, price, image)| {
                Ok(ShowcaseEntry {
                    item_id: ItemId::new(id),
                    name,
                    price: money("price", &price)?,
                    image,
                })
            })
            .collect()
    }

    async fn import_items(
        &self,
        shop: ShopId,
        rows: &[ItemDraft],
    ) -> Result<ImportSummary, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        let mut summary = ImportSummary::default();

        for (index, row) in rows.iter().enumerate() {
            let number = index + 1;
            let existing = sqlx::query_as::<_, (i64, i64)>("SELECT id, shop_id FROM items WHERE code = ?1")
                .bind(row.code)
                .fetch_optional(&mut *tx)
                .await
                .map_err(storage)?;

            match existing {
                Some((_, owner)) if owner != shop.get() => {
                    return Err(DomainError::invalid(
                        "code",
                        format!("row {number}: code {} belongs to another shop", row.code),
                    )
                    .into());
                }
                Some((id, _)) => {
                    sqlx::query(
                        "UPDATE items SET name = ?2, description = ?3, price = ?4, amount = ?5 WHERE id = ?1",
                    )
                    .bind(id)
                    .bind(&row.name)
                    .bind(&row.description)
                    .bind(row.price.to_storage())
                    .bind(i64::from(row.amount))
                    .execute(&mut *tx)
                    .await
                    .map_err(storage)?;
                    summary.updated += 1;
                }
                None => {
                    sqlx::query(
                        "INSERT INTO items (shop_id, code, name, description, price, amount) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    )
                    .bind(shop.get())
                    .bind(row.code)
                    .bind(&row.name)
                    .bind(&row.description)
                    .bind(row.price.to_storage())
                    .bind(i64::from(row.amount))
                    .execute(&mut *tx)
                    .await
                    .map_err(write_error("Item", format!("row {number}: code {}", row.code)))?;
                    summary.created += 1;
                }
            }
        }

        tx.commit().await.map_err(storage)?;
        Ok(summary)
    }
}
