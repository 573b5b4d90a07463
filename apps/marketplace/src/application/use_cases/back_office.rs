//! Staff-only table listings and the two editable fields.

use std::sync::Arc;

use crate::application::dto::AdminModelDto;
use crate::config::PageSizes;
use crate::domain::accounts::Account;
use crate::domain::back_office::{AdminListing, AdminModel, BackOfficeRepository};
use crate::domain::ordering::{OrderCode, OrderStatus};
use crate::domain::shared::{PageRequest, UserId};
use crate::error::MarketplaceError;

/// Use case for the back office.
pub struct BackOfficeUseCase<R>
where
    R: BackOfficeRepository,
{
    repo: Arc<R>,
    page_sizes: PageSizes,
}

impl<R> BackOfficeUseCase<R>
where
    R: BackOfficeRepository,
{
    /// Create a new BackOfficeUseCase.
    pub fn new(repo: Arc<R>, page_sizes: PageSizes) -> Self {
        Self { repo, page_sizes }
    }

    /// Every table, in menu order.
    ///
    /// # Errors
    ///
    /// Non-staff are refused.
    pub fn models(&self, actor: &Account) -> Result<Vec<AdminModelDto>, MarketplaceError> {
        actor.require_staff()?;
        Ok(AdminModel::ALL.into_iter().map(AdminModelDto::from).collect())
    }

    /// One page of a table.
    ///
    /// # Errors
    ///
    /// Non-staff are refused; unknown tables are not found.
    pub async fn list(
        &self,
        actor: &Account,
        model: &str,
        page: Option<&str>,
    ) -> Result<AdminListing, MarketplaceError> {
        actor.require_staff()?;
        let model =
            AdminModel::from_slug(model).ok_or_else(|| MarketplaceError::not_found("Model", model))?;
        let page = PageRequest::parse(page, self.page_sizes.admin);
        let rows = self.repo.admin_rows(model, page).await?;
        Ok(AdminListing::new(model, rows))
    }

    /// Overwrite an order's status.
    ///
    /// # Errors
    ///
    /// Non-staff are refused; unknown orders are not found.
    pub async fn set_order_status(
        &self,
        actor: &Account,
        code: &str,
        status: OrderStatus,
    ) -> Result<(), MarketplaceError> {
        actor.require_staff()?;
        let code = OrderCode::parse(code)?;
        if !self.repo.set_order_status(&code, status).await? {
            return Err(MarketplaceError::not_found("Order", code));
        }
        tracing::info!(staff_id = %actor.id(), code = %code, status = %status, "order status changed");
        Ok(())
    }

    /// Grant or revoke the seller flag.
    ///
    /// # Errors
    ///
    /// Non-staff are refused; unknown users are not found.
    pub async fn set_seller(
        &self,
        actor: &Account,
        user: UserId,
        is_seller: bool,
    ) -> Result<(), MarketplaceError> {
        actor.require_staff()?;
        if !self.repo.set_seller(user, is_seller).await? {
            return Err(MarketplaceError::not_found("Profile", user));
        }
        tracing::info!(staff_id = %actor.id(), user_id = %user, is_seller, "seller flag changed");
        Ok(())
    }
}
