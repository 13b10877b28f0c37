//! Domain primitives: SaleId, SaleDate, CustomerTier, BottleSize, BottleCounts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique sale identifier (UUID v4 string), the sole key for deletion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SaleId(pub String);

impl SaleId {
    /// Wrap an existing identifier string.
    pub fn new(id: String) -> Self {
        SaleId(id)
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        SaleId(Uuid::new_v4().to_string())
    }

    /// Get the identifier as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SaleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Calendar date keying one day of sales (`YYYY-MM-DD` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SaleDate(pub NaiveDate);

impl SaleDate {
    /// Wrap a calendar date.
    pub fn new(date: NaiveDate) -> Self {
        SaleDate(date)
    }

    /// Parse a `YYYY-MM-DD` string.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid calendar date.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(SaleDate)
    }

    /// Get the underlying calendar date.
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl std::fmt::Display for SaleDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Customer classification selecting the price table. Wire encoding: 0-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum CustomerTier {
    /// Walk-in retail (tier 0).
    Retail,
    /// Wholesale buyers (tier 1).
    Wholesale,
    /// Resellers (tier 2).
    Reseller,
}

/// Rejected customer-type input outside {0, 1, 2}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid customer tier {0}: expected 0, 1 or 2")]
pub struct InvalidTier(pub i64);

impl CustomerTier {
    /// The wire/storage encoding of this tier.
    pub fn as_i64(self) -> i64 {
        match self {
            CustomerTier::Retail => 0,
            CustomerTier::Wholesale => 1,
            CustomerTier::Reseller => 2,
        }
    }

    pub(crate) fn index(self) -> usize {
        self.as_i64() as usize
    }
}

impl TryFrom<i64> for CustomerTier {
    type Error = InvalidTier;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CustomerTier::Retail),
            1 => Ok(CustomerTier::Wholesale),
            2 => Ok(CustomerTier::Reseller),
            other => Err(InvalidTier(other)),
        }
    }
}

impl From<CustomerTier> for i64 {
    fn from(tier: CustomerTier) -> i64 {
        tier.as_i64()
    }
}

/// Bottle size category, each with a fixed per-tier price and fixed mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BottleSize {
    Large,
    Medium,
    Small,
}

impl BottleSize {
    /// All sizes, in tariff-table order.
    pub const ALL: [BottleSize; 3] = [BottleSize::Large, BottleSize::Medium, BottleSize::Small];

    pub(crate) fn index(self) -> usize {
        match self {
            BottleSize::Large => 0,
            BottleSize::Medium => 1,
            BottleSize::Small => 2,
        }
    }
}

/// Bottle quantities for one sale. `u32` makes negative counts
/// unrepresentable; serde rejects negative JSON integers at the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BottleCounts {
    pub large: u32,
    pub medium: u32,
    pub small: u32,
}

impl BottleCounts {
    /// Build a quantity triple.
    pub fn new(large: u32, medium: u32, small: u32) -> Self {
        BottleCounts {
            large,
            medium,
            small,
        }
    }

    /// Quantity for one size.
    pub fn get(&self, size: BottleSize) -> u32 {
        match size {
            BottleSize::Large => self.large,
            BottleSize::Medium => self.medium,
            BottleSize::Small => self.small,
        }
    }
}
