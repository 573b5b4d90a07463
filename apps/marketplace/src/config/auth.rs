//! Session and staff bootstrap configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session lifetime in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
    /// Staff account created at startup if missing.
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_secs: default_token_ttl(),
            bootstrap_admin: None,
        }
    }
}

/// Credentials of the bootstrap staff account.
#[derive(Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    /// Username.
    pub username: String,
    /// Plain password, hashed before storage.
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

const fn default_token_ttl() -> u64 {
    // two weeks
    14 * 24 * 60 * 60
}
