//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.
//! Each takes the authenticated [`Account`](crate::domain::accounts::Account)
//! of the requester where access depends on it.

mod back_office;
mod cart;
mod items;
mod payment;
mod profile;
mod session;
mod shops;
mod showcase;
mod statistics;

#[cfg(test)]
pub(crate) mod test_support;

pub use back_office::BackOfficeUseCase;
pub use cart::CartUseCase;
pub use items::{IMPORT_COLUMNS, ItemsUseCase, parse_import};
pub use payment::PaymentUseCase;
pub use profile::ProfileUseCase;
pub use session::SessionUseCase;
pub use shops::ShopsUseCase;
pub use showcase::ShowcaseUseCase;
pub use statistics::SalesStatisticsUseCase;
