//! Argon2 Credential Adapter (Driven Adapter)
//!
//! Passwords are stored as Argon2id PHC strings. Bearer tokens are 32 random
//! bytes, hex encoded; only their SHA-256 digest is persisted.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use sha2::{Digest, Sha256};

use crate::application::ports::{CredentialError, CredentialPort, IssuedToken};

const TOKEN_BYTES: usize = 32;

/// Argon2-backed [`CredentialPort`].
#[derive(Debug, Clone)]
pub struct Argon2Credentials {
    params: Params,
}

impl Default for Argon2Credentials {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2Credentials {
    /// Default Argon2id cost.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom cost; falls back to the defaults for out-of-range values.
    #[must_use]
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Self {
        let params = Params::new(memory_kib, iterations, 1, None).unwrap_or_default();
        Self { params }
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialPort for Argon2Credentials {
    fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        self.hasher()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::Hash {
                message: e.to_string(),
            })
    }

    fn verify_password(&self, hash: &str, password: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(hash).map_err(|e| CredentialError::MalformedHash {
            message: e.to_string(),
        })?;
        // Parameters come from the PHC string, not from self.
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    fn issue_token(&self) -> IssuedToken {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        let digest = self.digest_token(&token);
        IssuedToken { token, digest }
    }

    fn digest_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Credentials {
        Argon2Credentials::with_cost(8, 1)
    }

    #[test]
    fn hash_then_verify() {
        let creds = cheap();
        let hash = creds.hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(creds.verify_password(&hash, "hunter22").unwrap());
        assert!(!creds.verify_password(&hash, "hunter23").unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let creds = cheap();
        let a = creds.hash_password("hunter22").unwrap();
        let b = creds.hash_password("hunter22").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let err = cheap().verify_password("not-a-phc-string", "x").unwrap_err();
        assert!(matches!(err, CredentialError::MalformedHash { .. }));
    }

    #[test]
    fn tokens_are_random_hex_with_stable_digest() {
        let creds = cheap();
        let a = creds.issue_token();
        let b = creds.issue_token();
        assert_eq!(a.token.len(), TOKEN_BYTES * 2);
        assert!(a.token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.token, b.token);
        assert_eq!(a.digest, creds.digest_token(&a.token));
        assert_eq!(a.digest.len(), 64);
    }
}
