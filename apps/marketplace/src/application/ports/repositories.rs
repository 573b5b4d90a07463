//! Aggregate repository bound.

use crate::domain::accounts::AccountRepository;
use crate::domain::back_office::BackOfficeRepository;
use crate::domain::catalog::CatalogRepository;
use crate::domain::ordering::OrderingRepository;
use crate::domain::statistics::StatisticsRepository;

/// Every repository the marketplace needs, implemented by one store.
pub trait Repositories:
    AccountRepository
    + CatalogRepository
    + OrderingRepository
    + StatisticsRepository
    + BackOfficeRepository
    + 'static
{
}

impl<T> Repositories for T where
    T: AccountRepository
        + CatalogRepository
        + OrderingRepository
        + StatisticsRepository
        + BackOfficeRepository
        + 'static
{
}
