//! Back Office Bounded Context
//!
//! Staff-only tabular listings of every table, each with its human-readable
//! names and a fixed set of display columns, plus the two editable fields
//! (order status, seller flag).

pub mod model;
pub mod repository;

pub use model::{AdminListing, AdminModel, AdminRow, Column};
pub use repository::BackOfficeRepository;
