//! Money value object for prices, costs and account funds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use crate::domain::shared::DomainError;

/// Largest amount a decimal(10,2) column can hold.
const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2); // 99_999_999.99

/// Decimal places kept for every stored amount.
const SCALE: u32 = 2;

/// A monetary amount in the marketplace currency.
///
/// Stored with two decimal places, matching a decimal(10,2) column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest representable amount.
    pub const MAX: Self = Self(MAX_AMOUNT);

    /// Create a new Money value from a Decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money value from cents (integer).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, SCALE))
    }

    /// Get the inner Decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if this amount is positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns true if this amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns true if this amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Round to 2 decimal places.
    #[must_use]
    pub fn round(&self) -> Self {
        Self(self.0.round_dp(SCALE))
    }

    /// Validate a catalog price: non-negative, at most two decimals, fits decimal(10,2).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidValue`] naming `field`.
    pub fn validate_price(&self, field: &str) -> Result<(), DomainError> {
        if self.is_negative() {
            return Err(DomainError::invalid(field, "must not be negative"));
        }
        self.validate_precision(field)
    }

    /// Validate a funds top-up: strictly positive, at most two decimals.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidValue`] naming `field`.
    pub fn validate_top_up(&self, field: &str) -> Result<(), DomainError> {
        if !self.is_positive() {
            return Err(DomainError::invalid(field, "must be greater than zero"));
        }
        self.validate_precision(field)
    }

    fn validate_precision(&self, field: &str) -> Result<(), DomainError> {
        if self.0.normalize().scale() > SCALE {
            return Err(DomainError::invalid(
                field,
                "must have at most 2 decimal places",
            ));
        }
        if self.0 > MAX_AMOUNT {
            return Err(DomainError::invalid(
                field,
                format!("must not exceed {MAX_AMOUNT}"),
            ));
        }
        Ok(())
    }

    /// Add, failing when the sum no longer fits decimal(10,2).
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let sum = self.0.checked_add(rhs.0)?;
        (sum <= MAX_AMOUNT).then_some(Self(sum))
    }

    /// Canonical text form used for storage (`"12.50"`).
    #[must_use]
    pub fn to_storage(&self) -> String {
        let mut value = self.0;
        value.rescale(SCALE);
        value.to_string()
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_from_cents_and_display() {
        let m = Money::from_cents(15050);
        assert_eq!(m.amount(), dec!(150.50));
        assert_eq!(format!("{m}"), "150.50");
    }

    #[test]
    fn money_max_is_decimal_10_2_limit() {
        assert_eq!(Money::MAX.amount(), dec!(99999999.99));
    }

    #[test]
    fn money_multiply_by_quantity() {
        let price = Money::new(dec!(19.99));
        assert_eq!((price * 3).amount(), dec!(59.97));
    }

    #[test]
    fn money_sum() {
        let total: Money = [dec!(1.10), dec!(2.20), dec!(3.30)]
            .into_iter()
            .map(Money::new)
            .sum();
        assert_eq!(total.amount(), dec!(6.60));
    }

    #[test]
    fn money_validate_price() {
        assert!(Money::new(dec!(0)).validate_price("price").is_ok());
        assert!(Money::new(dec!(10.5)).validate_price("price").is_ok());
        assert!(Money::new(dec!(-1)).validate_price("price").is_err());
        assert!(Money::new(dec!(1.005)).validate_price("price").is_err());
        assert!(Money::new(dec!(100000000)).validate_price("price").is_err());
    }

    #[test]
    fn money_validate_top_up_rejects_zero() {
        let err = Money::ZERO.validate_top_up("amount").unwrap_err();
        assert!(err.to_string().contains("amount"));
        assert!(Money::new(dec!(0.01)).validate_top_up("amount").is_ok());
    }

    #[test]
    fn money_trailing_zeros_are_not_extra_precision() {
        assert!(Money::new(dec!(5.000)).validate_price("price").is_ok());
    }

    #[test]
    fn money_checked_add_respects_limit() {
        assert_eq!(
            Money::new(dec!(1)).checked_add(Money::new(dec!(2))),
            Some(Money::new(dec!(3)))
        );
        assert!(Money::MAX.checked_add(Money::from_cents(1)).is_none());
    }

    #[test]
    fn money_storage_form() {
        assert_eq!(Money::new(dec!(7)).to_storage(), "7.00");
        assert_eq!(Money::new(dec!(7.5)).to_storage(), "7.50");
        let parsed: Money = "7.50".parse().unwrap();
        assert_eq!(parsed, Money::new(dec!(7.5)));
    }

    #[test]
    fn money_ordering() {
        assert!(Money::from_cents(200) > Money::from_cents(199));
        assert_eq!(Money::default(), Money::ZERO);
    }
}
