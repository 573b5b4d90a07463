//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Entities**: Rows with identity (users, shops, items, orders)
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Services**: Stateless business rules (checkout planning, stock)
//! - **Repository Traits**: Persistence abstractions (implemented in adapters)
//!
//! # Bounded Contexts
//!
//! - [`accounts`]: Users, profiles, funds and sessions
//! - [`catalog`]: Shops, items and public listings
//! - [`ordering`]: Carts, checkout and payment
//! - [`statistics`]: Per-shop sales reports
//! - [`back_office`]: Staff listings of every table

pub mod accounts;
pub mod back_office;
pub mod catalog;
pub mod ordering;
pub mod shared;
pub mod statistics;
