//! Account Repository Trait
//!
//! Persistence abstraction for users, profiles and sessions.

use async_trait::async_trait;

use super::entities::{Account, Credentials, NewUser, Session};
use super::value_objects::ProfileUpdate;
use crate::domain::shared::{Money, RepositoryError, Timestamp, UserId};

/// Repository trait for accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a user and its profile atomically.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] when the username is taken.
    async fn create_account(&self, user: NewUser) -> Result<Account, RepositoryError>;

    /// Find the stored password hash for a username.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<Credentials>, RepositoryError>;

    /// Load a user with its profile.
    async fn find_account(&self, id: UserId) -> Result<Option<Account>, RepositoryError>;

    /// Apply a profile edit and return the updated account.
    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Account, RepositoryError>;

    /// Add `amount` to the user's funds inside one transaction; returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Domain`] when the top-up breaks a funds rule.
    async fn replenish_funds(&self, id: UserId, amount: Money) -> Result<Money, RepositoryError>;

    /// Store a new session, dropping sessions already expired at its
    /// creation time.
    async fn create_session(&self, session: &Session) -> Result<(), RepositoryError>;

    /// Resolve an unexpired session to its user.
    async fn find_session(
        &self,
        token_hash: &str,
        now: Timestamp,
    ) -> Result<Option<UserId>, RepositoryError>;

    /// Delete a session; returns whether it existed.
    async fn revoke_session(&self, token_hash: &str) -> Result<bool, RepositoryError>;
}
