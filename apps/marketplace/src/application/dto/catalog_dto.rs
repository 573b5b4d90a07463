//! Catalog and back office DTOs

use serde::Serialize;

use crate::domain::back_office::AdminModel;
use crate::domain::catalog::{Shop, StockLine};
use crate::domain::shared::Page;

/// Owner view of a shop: the shop and a page of its stock.
#[derive(Debug, Clone, Serialize)]
pub struct ShopDetailDto {
    /// The shop.
    pub shop: Shop,
    /// Its items with stock.
    pub items: Page<StockLine>,
}

/// Back office menu entry.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AdminModelDto {
    /// URL segment.
    pub model: &'static str,
    /// Plural name.
    pub verbose_name_plural: &'static str,
}

impl From<AdminModel> for AdminModelDto {
    fn from(model: AdminModel) -> Self {
        Self {
            model: model.slug(),
            verbose_name_plural: model.verbose_name_plural(),
        }
    }
}
