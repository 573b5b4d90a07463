// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Marketplace - Rust Core Library
//!
//! Sellers run shops and list items; buyers fill a cart, place orders and
//! pay them from an internal funds balance. Sellers see per-shop sales
//! statistics and staff manage everything from a back office.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business rules and repository traits
//!   - `accounts`: users, profiles, funds, buyer status, sessions
//!   - `catalog`: shops, items, files, showcase projections
//!   - `ordering`: cart lines, orders, checkout planning, stock
//!   - `statistics`: sales report over a date range
//!   - `back_office`: admin models and display rows
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: clock, credentials, showcase cache
//!   - `use_cases`: one per feature area
//!   - `dto`: composite outputs for API boundaries
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: SQLite repositories
//!   - `http`: axum REST API
//!   - `auth`, `cache`: credential hashing and the showcase cache
//!   - `config`: dependency injection container

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// YAML configuration.
pub mod config;

/// Error codes and HTTP error bodies.
pub mod error;

/// Prometheus metrics.
pub mod observability;

/// Tracing subscriber and OTLP export.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use domain::shared::{ItemId, Money, OrderId, ShopId, Timestamp, UserId};
pub use error::{ErrorCode, MarketplaceError};

pub use application::ports::{Clock, FixedClock, Repositories, SystemClock};

pub use infrastructure::config::Container;
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::persistence::SqliteStore;
