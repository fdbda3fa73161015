//! Type-safe price representation using decimal arithmetic.
//!
//! The marketplace trades in a single currency, so a price is just a
//! non-negative [`Decimal`] amount in the currency's standard unit.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative monetary amount.
///
/// Serialized as a decimal string (e.g. `"89.99"`) so no precision is lost
/// on the wire.
///
/// ## Examples
///
/// ```
/// use agritech_core::Price;
///
/// let tools = Price::from_cents(8999);
/// let seeds = Price::from_cents(499);
///
/// assert_eq!((tools + seeds.times(2)).display(), "$99.97");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

/// Saturates at zero.
impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self((self.0 - rhs.0).max(Decimal::ZERO))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        let result = Price::new(Decimal::new(-1, 2));
        assert!(matches!(result, Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_zero_price_allowed() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_decimal_arithmetic_is_exact() {
        let total = Price::from_cents(8999) + Price::from_cents(499).times(2);
        assert_eq!(total.amount(), Decimal::new(9997, 2));
    }

    #[test]
    fn test_sum() {
        let prices = [Price::from_cents(100), Price::from_cents(250)];
        let total: Price = prices.into_iter().sum();
        assert_eq!(total, Price::from_cents(350));
    }

    #[test]
    fn test_sub_saturates_at_zero() {
        assert_eq!(Price::from_cents(100) - Price::from_cents(500), Price::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(499).display(), "$4.99");
        assert_eq!(Price::from_cents(500).to_string(), "$5.00");
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let parsed: Result<Price, _> = serde_json::from_str("\"-3.00\"");
        assert!(parsed.is_err());

        let parsed: Price = serde_json::from_str("\"3.50\"").unwrap();
        assert_eq!(parsed, Price::from_cents(350));
    }
}
