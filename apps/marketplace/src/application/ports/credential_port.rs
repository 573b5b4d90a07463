//! Credential Port (Driven Port)
//!
//! Password hashing and bearer token issuing.

/// Credential handling error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CredentialError {
    /// Hashing failed.
    #[error("password hashing failed: {message}")]
    Hash { message: String },

    /// A stored hash could not be parsed.
    #[error("stored password hash is malformed: {message}")]
    MalformedHash { message: String },
}

/// A freshly issued bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Value handed to the client.
    pub token: String,
    /// Digest stored server-side.
    pub digest: String,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"<redacted>")
            .field("digest", &self.digest)
            .finish()
    }
}

/// Port for password and token handling.
pub trait CredentialPort: Send + Sync {
    /// Hash a password into a self-describing string.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Hash`] if the hasher fails.
    fn hash_password(&self, password: &str) -> Result<String, CredentialError>;

    /// Check a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::MalformedHash`] if `hash` cannot be parsed.
    fn verify_password(&self, hash: &str, password: &str) -> Result<bool, CredentialError>;

    /// Issue a new random token.
    fn issue_token(&self) -> IssuedToken;

    /// Digest of a presented token, as stored by [`CredentialPort::issue_token`].
    fn digest_token(&self, token: &str) -> String;
}
