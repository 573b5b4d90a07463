//! Users, profiles and sessions.

use async_trait::async_trait;
use sqlx::SqliteConnection;

use super::records::{ACCOUNT_COLUMNS, AccountRecord};
use super::{SqliteStore, storage, write_error};
use crate::domain::accounts::{Account, AccountRepository, Credentials, NewUser, ProfileUpdate, Session};
use crate::domain::shared::{DomainError, Money, RepositoryError, Timestamp, UserId};

/// Load one account on an open connection or transaction.
pub(super) async fn fetch_account(
    conn: &mut SqliteConnection,
    id: UserId,
) -> Result<Option<Account>, RepositoryError> {
    let sql = format!(
        "SELECT {ACCOUNT_COLUMNS} FROM users u JOIN profiles p ON p.user_id = u.id WHERE u.id = ?1"
    );
    sqlx::query_as::<_, AccountRecord>(&sql)
        .bind(id.get())
        .fetch_optional(conn)
        .await
        .map_err(storage)?
        .map(Account::try_from)
        .transpose()
}

async fn require_account(
    conn: &mut SqliteConnection,
    id: UserId,
) -> Result<Account, RepositoryError> {
    fetch_account(conn, id)
        .await?
        .ok_or_else(|| DomainError::not_found("User", id).into())
}

#[async_trait]
impl AccountRepository for SqliteStore {
    async fn create_account(&self, user: NewUser) -> Result<Account, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, first_name, last_name, is_staff) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_staff)
        .execute(&mut *tx)
        .await
        .map_err(write_error("User", format!("username {}", user.username)))?;
        let id = UserId::new(result.last_insert_rowid());

        sqlx::query(
            "INSERT INTO profiles (user_id, registration_date, is_seller, funds, purchases) \
             VALUES (?1, ?2, ?3, ?4, 0)",
        )
        .bind(id.get())
        .bind(user.registered_at.unix_millis())
        .bind(user.is_seller)
        .bind(Money::ZERO.to_storage())
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        let account = require_account(&mut tx, id).await?;
        tx.commit().await.map_err(storage)?;
        Ok(account)
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<Credentials>, RepositoryError> {
        let row = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, password_hash FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;
        Ok(row.map(|(id, password_hash)| Credentials {
            user_id: UserId::new(id),
            password_hash,
        }))
    }

    async fn find_account(&self, id: UserId) -> Result<Option<Account>, RepositoryError> {
        let mut conn = self.pool.acquire().await.map_err(storage)?;
        fetch_account(&mut conn, id).await
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Account, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        sqlx::query(
            "UPDATE users SET first_name = COALESCE(?2, first_name), \
             last_name = COALESCE(?3, last_name) WHERE id = ?1",
        )
        .bind(id.get())
        .bind(update.first_name.as_deref())
        .bind(update.last_name.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        sqlx::query("UPDATE profiles SET avatar = COALESCE(?2, avatar) WHERE user_id = ?1")
            .bind(id.get())
            .bind(update.avatar.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        let account = require_account(&mut tx, id).await?;
        tx.commit().await.map_err(storage)?;
        Ok(account)
    }

    async fn replenish_funds(&self, id: UserId, amount: Money) -> Result<Money, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let mut account = require_account(&mut tx, id).await?;
        let balance = account.profile.top_up(amount)?;

        sqlx::query("UPDATE profiles SET funds = ?2 WHERE user_id = ?1")
            .bind(id.get())
            .bind(balance.to_storage())
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        tx.commit().await.map_err(storage)?;
        Ok(balance)
    }

    async fn create_session(&self, session: &Session) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        let purged = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?1")
            .bind(session.created_at.unix_millis())
            .execute(&mut *tx)
            .await
            .map_err(storage)?
            .rows_affected();
        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&session.token_hash)
        .bind(session.user_id.get())
        .bind(session.created_at.unix_millis())
        .bind(session.expires_at.unix_millis())
        .execute(&mut *tx)
        .await
        .map_err(write_error("Session", "token"))?;
        tx.commit().await.map_err(storage)?;

        if purged > 0 {
            tracing::debug!(purged, "expired sessions removed");
        }
        Ok(())
    }

    async fn find_session(
        &self,
        token_hash: &str,
        now: Timestamp,
    ) -> Result<Option<UserId>, RepositoryError> {
        let row = sqlx::query_as::<_, (i64,)>(
            "SELECT user_id FROM sessions WHERE token_hash = ?1 AND expires_at > ?2",
        )
        .bind(token_hash)
        .bind(now.unix_millis())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;
        Ok(row.map(|(id,)| UserId::new(id)))
    }

    async fn revoke_session(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(result.rows_affected() > 0)
    }
}
