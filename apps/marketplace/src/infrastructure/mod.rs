//! Infrastructure Layer
//!
//! Adapters that connect the application core to the outside world:
//!
//! - **auth**: argon2 password hashing and session tokens
//! - **cache**: in-process showcase cache
//! - **config**: dependency injection container
//! - **http**: axum REST API
//! - **persistence**: SQLite repositories

pub mod auth;
pub mod cache;
pub mod config;
pub mod http;
pub mod persistence;
