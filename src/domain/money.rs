//! Decimal amount types: `Money` (MRU) and `Kilograms` (gas mass).
//!
//! Both wrap rust_decimal so totals stay lossless end to end; nothing in the
//! data path ever goes through floating point.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Monetary amount in ouguiya (MRU).
///
/// Serializes to a JSON number. For storage and DTOs use
/// [`Money::to_canonical_string`], which never emits exponent notation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    /// Create a Money from a raw decimal value.
    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Parse from a canonical decimal string.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        Decimal::from_str(s).map(Money)
    }

    /// Format without exponent notation or trailing zeros.
    pub fn to_canonical_string(&self) -> String {
        format!("{}", self.0.normalize())
    }

    /// The zero amount.
    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns true if the amount is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiply a unit price by a bottle count.
    pub fn times(&self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Get the underlying decimal.
    pub fn inner(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

/// Gas mass in kilograms.
///
/// The ledger's one canonical mass unit. Bottle weights (12 / 6 / 2.7 kg)
/// and all derived totals are expressed in it directly; there is no scaled
/// integer representation anywhere.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Kilograms(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Kilograms {
    /// Create a Kilograms from a raw decimal value.
    pub fn new(value: Decimal) -> Self {
        Kilograms(value)
    }

    /// Parse from a canonical decimal string.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        Decimal::from_str(s).map(Kilograms)
    }

    /// Format without exponent notation or trailing zeros.
    pub fn to_canonical_string(&self) -> String {
        format!("{}", self.0.normalize())
    }

    /// Zero mass.
    pub fn zero() -> Self {
        Kilograms(Decimal::ZERO)
    }

    /// Returns true if the mass is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiply a unit weight by a bottle count.
    pub fn times(&self, qty: u32) -> Self {
        Kilograms(self.0 * Decimal::from(qty))
    }

    /// Get the underlying decimal.
    pub fn inner(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Kilograms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Kilograms {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl Add for Kilograms {
    type Output = Kilograms;

    fn add(self, rhs: Kilograms) -> Kilograms {
        Kilograms(self.0 + rhs.0)
    }
}

impl AddAssign for Kilograms {
    fn add_assign(&mut self, rhs: Kilograms) {
        self.0 += rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_canonical_roundtrip() {
        for s in ["3330", "1505", "68.5", "0", "7765"] {
            let money = Money::from_str_canonical(s).expect("parse failed");
            let formatted = money.to_canonical_string();
            let reparsed = Money::from_str_canonical(&formatted).expect("reparse failed");
            assert_eq!(money, reparsed, "roundtrip failed for {}", s);
            assert_eq!(formatted, s);
        }
    }

    #[test]
    fn test_money_canonical_strips_trailing_zeros() {
        let money = Money::from_str_canonical("150.50").unwrap();
        assert_eq!(money.to_canonical_string(), "150.5");
    }

    #[test]
    fn test_money_times_and_sum() {
        let unit = Money::from_str_canonical("3130").unwrap();
        let mut total = unit.times(2);
        total += Money::from_str_canonical("1505").unwrap();
        assert_eq!(total.to_canonical_string(), "7765");
    }

    #[test]
    fn test_money_times_zero_qty() {
        let unit = Money::from_str_canonical("730").unwrap();
        assert!(unit.times(0).is_zero());
    }

    #[test]
    fn test_kilograms_fractional_weight() {
        let small = Kilograms::from_str_canonical("2.7").unwrap();
        let total = small.times(3);
        assert_eq!(total.to_canonical_string(), "8.1");
    }

    #[test]
    fn test_kilograms_exact_decimal_no_float_drift() {
        // 0.1 + 0.2 style sums must stay exact under decimal arithmetic.
        let mut total = Kilograms::zero();
        for _ in 0..10 {
            total += Kilograms::from_str_canonical("2.7").unwrap();
        }
        assert_eq!(total.to_canonical_string(), "27");
    }

    #[test]
    fn test_money_json_serializes_as_number() {
        let money = Money::from_str_canonical("68.5").unwrap();
        let json = serde_json::to_value(money).unwrap();
        assert!(json.is_number());
        assert_eq!(json.to_string(), "68.5");
    }

    #[test]
    fn test_money_display_matches_canonical() {
        let money = Money::from_str_canonical("1600").unwrap();
        assert_eq!(money.to_string(), "1600");
    }
}
