//! Transaction type representing a single completed sale.

use crate::domain::{BottleCounts, CustomerTier, Kilograms, Money, SaleDate, SaleId};
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Wire/storage format for sale timestamps, second precision.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable unique identifier for this sale.
    pub id: SaleId,
    /// Time of sale, UTC, second precision.
    #[serde(with = "datetime_format")]
    pub timestamp: NaiveDateTime,
    /// Customer tier that selected the price table.
    pub customer_tier: CustomerTier,
    /// Bottle quantities sold.
    pub counts: BottleCounts,
    /// Total amount charged.
    pub total_price: Money,
    /// Total gas mass sold, in kilograms.
    pub total_gas: Kilograms,
}

impl Transaction {
    /// Create a new Transaction. Sub-second precision is dropped so the
    /// in-memory value always round-trips through the wire format.
    pub fn new(
        id: SaleId,
        timestamp: NaiveDateTime,
        customer_tier: CustomerTier,
        counts: BottleCounts,
        total_price: Money,
        total_gas: Kilograms,
    ) -> Self {
        let timestamp = timestamp.with_nanosecond(0).unwrap_or(timestamp);
        Transaction {
            id,
            timestamp,
            customer_tier,
            counts,
            total_price,
            total_gas,
        }
    }

    /// Calendar date this sale belongs to.
    pub fn sale_date(&self) -> SaleDate {
        SaleDate::new(self.timestamp.date())
    }

    /// Timestamp in the wire format (`YYYY-MM-DD HH:MM:SS`).
    pub fn datetime_str(&self) -> String {
        self.timestamp.format(DATETIME_FORMAT).to_string()
    }

    /// Parse a wire-format timestamp.
    ///
    /// # Errors
    /// Returns an error if the string does not match the wire format.
    pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
    }
}

mod datetime_format {
    use super::DATETIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.format(DATETIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).map_err(serde::de::Error::custom)
    }
}
