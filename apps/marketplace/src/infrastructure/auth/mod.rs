//! Credential adapter: Argon2 password hashes and SHA-256 token digests.

mod argon2_credentials;

pub use argon2_credentials::Argon2Credentials;
