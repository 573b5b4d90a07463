//! Back Office Repository Trait

use async_trait::async_trait;

use super::model::{AdminModel, AdminRow};
use crate::domain::ordering::{OrderCode, OrderStatus};
use crate::domain::shared::{Page, PageRequest, RepositoryError, UserId};

/// Staff access to every table.
#[async_trait]
pub trait BackOfficeRepository: Send + Sync {
    /// One page of display rows for `model`.
    async fn admin_rows(
        &self,
        model: AdminModel,
        page: PageRequest,
    ) -> Result<Page<AdminRow>, RepositoryError>;

    /// Overwrite an order's status; returns whether the order exists.
    async fn set_order_status(
        &self,
        code: &OrderCode,
        status: OrderStatus,
    ) -> Result<bool, RepositoryError>;

    /// Overwrite a profile's seller flag; returns whether the profile exists.
    async fn set_seller(&self, user: UserId, is_seller: bool) -> Result<bool, RepositoryError>;
}
