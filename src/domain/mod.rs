//! Domain types for the bottled-gas sales ledger.
//!
//! This module provides:
//! - Lossless money and mass handling via Decimal newtypes
//! - Domain primitives: SaleId, SaleDate, CustomerTier, BottleSize, BottleCounts
//! - The Transaction record with its wire timestamp format
//! - The fixed Tariff tables (per-tier prices, per-size masses)

pub mod money;
pub mod primitives;
pub mod tariff;
pub mod transaction;

pub use money::{Kilograms, Money};
pub use primitives::{BottleCounts, BottleSize, CustomerTier, InvalidTier, SaleDate, SaleId};
pub use tariff::Tariff;
pub use transaction::{Transaction, DATETIME_FORMAT};
