//! Cached showcase listings: per shop, promotions and special offers.

use std::sync::Arc;

use crate::application::ports::ShowcaseCache;
use crate::config::PageSizes;
use crate::domain::catalog::{CatalogRepository, ShowcaseEntry, ShowcaseKind};
use crate::domain::shared::{Page, PageRequest, ShopId};
use crate::error::MarketplaceError;
use crate::observability::record_showcase_cache;

/// Use case for showcases.
pub struct ShowcaseUseCase<R>
where
    R: CatalogRepository,
{
    repo: Arc<R>,
    cache: Arc<dyn ShowcaseCache>,
    page_sizes: PageSizes,
}

impl<R> ShowcaseUseCase<R>
where
    R: CatalogRepository,
{
    /// Create a new ShowcaseUseCase.
    pub fn new(repo: Arc<R>, cache: Arc<dyn ShowcaseCache>, page_sizes: PageSizes) -> Self {
        Self {
            repo,
            cache,
            page_sizes,
        }
    }

    /// Every item of a shop.
    ///
    /// # Errors
    ///
    /// Unknown shops.
    pub async fn shop(
        &self,
        id: ShopId,
        page: Option<&str>,
    ) -> Result<Page<ShowcaseEntry>, MarketplaceError> {
        if self.repo.find_shop(id).await?.is_none() {
            return Err(MarketplaceError::not_found("Shop", id));
        }
        self.page(ShowcaseKind::Shop(id), page, self.page_sizes.showcase)
            .await
    }

    /// Items flagged as promotions.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn promotions(
        &self,
        page: Option<&str>,
    ) -> Result<Page<ShowcaseEntry>, MarketplaceError> {
        self.page(ShowcaseKind::Promotions, page, self.page_sizes.promotions)
            .await
    }

    /// Items flagged as special offers.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn offers(&self, page: Option<&str>) -> Result<Page<ShowcaseEntry>, MarketplaceError> {
        self.page(ShowcaseKind::Offers, page, self.page_sizes.offers)
            .await
    }

    async fn page(
        &self,
        kind: ShowcaseKind,
        page: Option<&str>,
        size: u32,
    ) -> Result<Page<ShowcaseEntry>, MarketplaceError> {
        let entries = self.listing(kind).await?;
        let window = PageRequest::parse(page, size).resolve(entries.len() as u64);
        Ok(window.slice(&entries))
    }

    async fn listing(&self, kind: ShowcaseKind) -> Result<Arc<Vec<ShowcaseEntry>>, MarketplaceError> {
        if let Some(entries) = self.cache.get(kind) {
            record_showcase_cache(true);
            return Ok(entries);
        }
        record_showcase_cache(false);
        let generation = self.cache.generation();
        let entries = Arc::new(self.repo.showcase(kind).await?);
        if self.cache.put(kind, generation, Arc::clone(&entries)) {
            tracing::debug!(?kind, entries = entries.len(), "showcase cached");
        }
        Ok(entries)
    }
}
