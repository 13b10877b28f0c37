pub mod api;
pub mod archive;
pub mod clock;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod store;

pub use archive::{Archive, RotationOutcome};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use domain::{
    BottleCounts, BottleSize, CustomerTier, Kilograms, Money, SaleDate, SaleId, Tariff, Transaction,
};
pub use error::AppError;
pub use ledger::Ledger;
pub use store::{CsvStore, SqliteStore, TransactionStore};
