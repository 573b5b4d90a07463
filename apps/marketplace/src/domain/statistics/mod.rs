//! Statistics Bounded Context
//!
//! Per-shop sales grouped by item over a date range.

pub mod report;
pub mod repository;

pub use report::{DateRange, SalesReport, SalesRow, SoldLine};
pub use repository::StatisticsRepository;
