//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod identifiers;
mod money;
mod pagination;
mod timestamp;

pub use identifiers::{ItemId, OrderId, ShopId, UserId};
pub use money::Money;
pub use pagination::{Page, PageRequest, PageWindow};
pub use timestamp::Timestamp;
