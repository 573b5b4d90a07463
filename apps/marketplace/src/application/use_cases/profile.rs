//! Profile page, profile edits and funds top-ups.

use std::sync::Arc;

use crate::application::dto::{FundsDto, ProfileDto};
use crate::domain::accounts::{Account, AccountRepository, ProfileUpdate};
use crate::domain::shared::Money;
use crate::error::MarketplaceError;
use crate::observability::{UseCaseTimer, record_funds_replenished};

/// Use case for a user's own profile.
pub struct ProfileUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
}

impl<R> ProfileUseCase<R>
where
    R: AccountRepository,
{
    /// Create a new ProfileUseCase.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// The requester's profile.
    #[must_use]
    pub fn view(&self, actor: &Account) -> ProfileDto {
        ProfileDto::from_account(actor)
    }

    /// Change names and avatar.
    ///
    /// # Errors
    ///
    /// Overlong names or a storage failure.
    pub async fn edit(
        &self,
        actor: &Account,
        update: ProfileUpdate,
    ) -> Result<ProfileDto, MarketplaceError> {
        update.validate()?;
        let account = self.repo.update_profile(actor.id(), &update).await?;
        tracing::info!(user_id = %actor.id(), "profile updated");
        Ok(ProfileDto::from_account(&account))
    }

    /// Add `amount` to the requester's funds.
    ///
    /// # Errors
    ///
    /// A non-positive or over-precise amount, or a balance past the storable maximum.
    pub async fn replenish_funds(
        &self,
        actor: &Account,
        amount: Money,
    ) -> Result<FundsDto, MarketplaceError> {
        let timer = UseCaseTimer::start("replenish_funds");
        timer.finish(self.try_replenish(actor, amount).await)
    }

    async fn try_replenish(
        &self,
        actor: &Account,
        amount: Money,
    ) -> Result<FundsDto, MarketplaceError> {
        amount.validate_top_up("amount")?;
        let balance = self.repo.replenish_funds(actor.id(), amount).await?;
        record_funds_replenished(amount);
        tracing::info!(
            user_id = %actor.id(),
            amount = %amount,
            balance = %balance,
            "funds replenished by {amount}"
        );
        Ok(FundsDto {
            added: amount,
            balance,
        })
    }
}
