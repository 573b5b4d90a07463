//! Shop creation, editing and listings.

use std::sync::Arc;

use crate::application::dto::ShopDetailDto;
use crate::config::PageSizes;
use crate::domain::accounts::Account;
use crate::domain::catalog::{CatalogRepository, Shop, ShopDraft};
use crate::domain::shared::{Page, PageRequest, ShopId};
use crate::error::MarketplaceError;

/// Load a shop and check that `actor` owns it.
pub(crate) async fn owned_shop<R>(
    repo: &R,
    actor: &Account,
    id: ShopId,
) -> Result<Shop, MarketplaceError>
where
    R: CatalogRepository + ?Sized,
{
    let shop = repo
        .find_shop(id)
        .await?
        .ok_or_else(|| MarketplaceError::not_found("Shop", id))?;
    if !shop.is_owned_by(actor.id()) {
        tracing::warn!(shop_id = %id, user_id = %actor.id(), "access to foreign shop refused");
        return Err(MarketplaceError::permission_denied(format!(
            "shop {id} belongs to another seller"
        )));
    }
    Ok(shop)
}

/// Use case for shops.
pub struct ShopsUseCase<R>
where
    R: CatalogRepository,
{
    repo: Arc<R>,
    page_sizes: PageSizes,
}

impl<R> ShopsUseCase<R>
where
    R: CatalogRepository,
{
    /// Create a new ShopsUseCase.
    pub fn new(repo: Arc<R>, page_sizes: PageSizes) -> Self {
        Self { repo, page_sizes }
    }

    /// Open a shop owned by the requester.
    ///
    /// # Errors
    ///
    /// Non-sellers are refused; invalid fields are rejected.
    pub async fn create(&self, actor: &Account, draft: ShopDraft) -> Result<Shop, MarketplaceError> {
        actor.require_seller("creating a shop")?;
        draft.validate()?;
        let shop = self.repo.create_shop(actor.id(), &draft).await?;
        tracing::info!(shop_id = %shop.id, seller_id = %actor.id(), name = %shop.name, "shop created");
        Ok(shop)
    }

    /// Every shop.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn list(&self, page: Option<&str>) -> Result<Page<Shop>, MarketplaceError> {
        let page = PageRequest::parse(page, self.page_sizes.shops);
        Ok(self.repo.list_shops(page).await?)
    }

    /// Shops owned by the requester.
    ///
    /// # Errors
    ///
    /// Non-sellers are refused.
    pub async fn mine(&self, actor: &Account) -> Result<Vec<Shop>, MarketplaceError> {
        actor.require_seller("listing own shops")?;
        Ok(self.repo.shops_of(actor.id()).await?)
    }

    /// Change a shop owned by the requester.
    ///
    /// # Errors
    ///
    /// Unknown or foreign shops, invalid fields.
    pub async fn edit(
        &self,
        actor: &Account,
        id: ShopId,
        draft: ShopDraft,
    ) -> Result<Shop, MarketplaceError> {
        actor.require_seller("editing a shop")?;
        owned_shop(self.repo.as_ref(), actor, id).await?;
        draft.validate()?;
        let shop = self.repo.update_shop(id, &draft).await?;
        tracing::info!(shop_id = %id, "shop updated");
        Ok(shop)
    }

    /// Owner view of a shop with a page of its stock.
    ///
    /// # Errors
    ///
    /// Unknown or foreign shops.
    pub async fn detail(
        &self,
        actor: &Account,
        id: ShopId,
        page: Option<&str>,
    ) -> Result<ShopDetailDto, MarketplaceError> {
        actor.require_seller("viewing shop stock")?;
        let shop = owned_shop(self.repo.as_ref(), actor, id).await?;
        let page = PageRequest::parse(page, self.page_sizes.shop_detail);
        let items = self.repo.shop_stock(id, page).await?;
        Ok(ShopDetailDto { shop, items })
    }
}
