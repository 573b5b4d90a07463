//! Sales report aggregation.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::domain::shared::{DomainError, ItemId, ShopId, Timestamp};

/// Accepted date format for both bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar days (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// First day.
    pub date_from: NaiveDate,
    /// Last day.
    pub date_to: NaiveDate,
}

impl DateRange {
    /// Parse `YYYY-MM-DD` bounds.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidValue`] for a malformed date or when
    /// `date_to` is earlier than `date_from`.
    pub fn parse(date_from: &str, date_to: &str) -> Result<Self, DomainError> {
        let from = parse_date("date_from", date_from)?;
        let to = parse_date("date_to", date_to)?;
        Self::new(from, to)
    }

    /// Build from already parsed days.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidValue`] when `date_to < date_from`.
    pub fn new(date_from: NaiveDate, date_to: NaiveDate) -> Result<Self, DomainError> {
        if date_to < date_from {
            return Err(DomainError::invalid(
                "date_to",
                "the last date must not be earlier than the first",
            ));
        }
        Ok(Self { date_from, date_to })
    }

    /// Half-open timestamp bounds: midnight of `date_from` up to midnight after `date_to`.
    #[must_use]
    pub fn bounds(&self) -> (Timestamp, Timestamp) {
        let start = Timestamp::start_of_day(self.date_from);
        let end = self
            .date_to
            .checked_add_days(Days::new(1))
            .map_or_else(
                || Timestamp::start_of_day(NaiveDate::MAX),
                Timestamp::start_of_day,
            );
        (start, end)
    }
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::invalid(field, "enter a valid date as YYYY-MM-DD"))
}

/// One ordered-item row of a shop inside the range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoldLine {
    /// Sold item.
    pub item_id: ItemId,
    /// Article code.
    pub code: i64,
    /// Item name.
    pub name: String,
    /// Ordered quantity.
    pub quantity: u32,
}

/// Quantity sold of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesRow {
    /// Sold item.
    pub item_id: ItemId,
    /// Article code.
    pub code: i64,
    /// Item name.
    pub name: String,
    /// Summed quantity.
    pub quantity: u64,
}

/// Sales of one shop over a range, one row per item, by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesReport {
    /// Reported shop.
    pub shop_id: ShopId,
    /// Reported days.
    #[serde(flatten)]
    pub range: DateRange,
    /// Per-item rows.
    pub rows: Vec<SalesRow>,
    /// Sum over all rows.
    pub total_quantity: u64,
}

impl SalesReport {
    /// Group lines by item and sum their quantities.
    #[must_use]
    pub fn build(shop_id: ShopId, range: DateRange, lines: Vec<SoldLine>) -> Self {
        let mut by_item: BTreeMap<ItemId, SalesRow> = BTreeMap::new();
        for line in lines {
            by_item
                .entry(line.item_id)
                .and_modify(|row| row.quantity += u64::from(line.quantity))
                .or_insert_with(|| SalesRow {
                    item_id: line.item_id,
                    code: line.code,
                    name: line.name.clone(),
                    quantity: u64::from(line.quantity),
                });
        }
        let mut rows: Vec<SalesRow> = by_item.into_values().collect();
        rows.sort_by_key(|row| row.code);
        let total_quantity = rows.iter().map(|row| row.quantity).sum();
        Self {
            shop_id,
            range,
            rows,
            total_quantity,
        }
    }
}
