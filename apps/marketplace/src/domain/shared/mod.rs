//! Shared Domain Types
//!
//! Value objects and errors shared across bounded contexts.

pub mod errors;
pub mod value_objects;

pub use errors::{DomainError, RepositoryError, rules};
pub use value_objects::{
    ItemId, Money, OrderId, Page, PageRequest, PageWindow, ShopId, Timestamp, UserId,
};
