//! SQLite adapter implementing every repository trait on one pooled store.
//!
//! Money is stored as decimal text, timestamps as Unix milliseconds. Flows
//! that must be atomic (registration, checkout, payment, top-ups and CSV
//! import) run inside a single transaction.

mod accounts;
mod back_office;
mod catalog;
mod migrations;
mod ordering;
mod records;
mod statistics;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::config::PersistenceConfig;
use crate::domain::shared::RepositoryError;

pub use migrations::MIGRATIONS;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pooled SQLite store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open the configured database and apply migrations.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the database cannot be opened
    /// or migrated.
    pub async fn connect(config: &PersistenceConfig) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(storage)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = if config.is_in_memory() {
            // Every connection to `:memory:` is a separate database.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
        } else {
            ensure_parent_dir(&config.database_url)?;
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options)
                .await
        }
        .map_err(storage)?;

        let store = Self { pool };
        store.migrate().await?;
        tracing::info!(
            url = %config.database_url,
            max_connections = config.max_connections,
            "database ready"
        );
        Ok(store)
    }

    /// Fresh, migrated in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if SQLite cannot start.
    pub async fn in_memory() -> Result<Self, RepositoryError> {
        Self::connect(&PersistenceConfig {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
    }

    /// Apply the schema; every statement is idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if a statement fails.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        for statement in MIGRATIONS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(storage)?;
        }
        Ok(())
    }

    /// Check that the database answers.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the query fails.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(storage)
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn ensure_parent_dir(url: &str) -> Result<(), RepositoryError> {
    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();
    match Path::new(path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .map_err(|e| RepositoryError::Storage(format!("create {}: {e}", dir.display()))),
        _ => Ok(()),
    }
}

/// Any backend failure.
pub(super) fn storage(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(err.to_string())
}

/// Whether a write hit a UNIQUE constraint.
pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some("2067")
                || db_err.code().as_deref() == Some("1555")
    )
}

/// Map a write error, turning UNIQUE violations into conflicts on `entity`.
pub(super) fn write_error(entity: &str, detail: impl std::fmt::Display) -> impl FnOnce(sqlx::Error) -> RepositoryError {
    let detail = detail.to_string();
    let entity = entity.to_string();
    move |err| {
        if is_unique_violation(&err) {
            RepositoryError::conflict(&entity, detail)
        } else {
            storage(err)
        }
    }
}
