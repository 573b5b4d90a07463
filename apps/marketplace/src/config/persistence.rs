//! Database configuration.

use serde::{Deserialize, Serialize};

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// SQLite connection URL (`sqlite://path.db` or `sqlite::memory:`).
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl PersistenceConfig {
    /// Whether the URL points at an in-memory database.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:")
    }
}

fn default_database_url() -> String {
    "sqlite://./data/marketplace.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}
