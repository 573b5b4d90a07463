//! Data Transfer Objects (DTOs)
//!
//! Use case outputs that combine several domain values.

mod account_dto;
mod catalog_dto;

pub use account_dto::{FundsDto, ProfileDto, SessionDto};
pub use catalog_dto::{AdminModelDto, ShopDetailDto};
