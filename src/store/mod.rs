//! Durable sale storage: the store trait, its error type, and the two
//! interchangeable backends (SQLite table, legacy flat CSV file).

pub mod codec;
pub mod csv;
pub mod sqlite;

pub use self::codec::CodecError;
pub use self::csv::CsvStore;
pub use self::sqlite::SqliteStore;

use crate::domain::{SaleDate, SaleId, Transaction};
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Failures from the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record carries the given id.
    #[error("no transaction with id {0}")]
    NotFound(SaleId),
    /// A persisted record that cannot be decoded, hit on a path that
    /// must not silently drop it.
    #[error("corrupt record at {location}: {reason}")]
    Corrupt { location: String, reason: String },
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Durable store of sale records.
///
/// Both backends persist the same record schema; the service holds an
/// `Arc<dyn TransactionStore>` and never knows which one it has.
/// Records are immutable once appended; the only mutations are
/// whole-record deletes and the archive handoff. Queries skip records
/// they cannot decode (with a warning); mutating ops refuse to proceed
/// past them.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persist a new record.
    async fn append(&self, tx: &Transaction) -> Result<(), StoreError>;

    /// Point lookup by id.
    async fn find_by_id(&self, id: &SaleId) -> Result<Option<Transaction>, StoreError>;

    /// All records whose timestamp falls on `date`, insertion order.
    /// Empty vec when none match.
    async fn find_by_date(&self, date: SaleDate) -> Result<Vec<Transaction>, StoreError>;

    /// Every record, insertion order.
    async fn find_all(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Remove exactly one record.
    ///
    /// # Errors
    /// `StoreError::NotFound` when no record carries `id`.
    async fn delete_by_id(&self, id: &SaleId) -> Result<(), StoreError>;

    /// Remove all records for `date`, returning how many were removed.
    async fn delete_by_date(&self, date: SaleDate) -> Result<u64, StoreError>;

    /// Date of the earliest-inserted record, `None` on an empty store.
    async fn oldest_date(&self) -> Result<Option<SaleDate>, StoreError>;

    /// Distinct dates present, ascending.
    async fn dates_present(&self) -> Result<Vec<SaleDate>, StoreError>;

    /// Move the entire store contents into the record file at `dest`
    /// and leave the store empty. Callers pick a `dest` that does not
    /// exist yet; an interrupted call is repaired by the caller's
    /// merge path, never by this op.
    async fn rename_to_archive(&self, dest: &Path) -> Result<(), StoreError>;
}
