//! Legacy flat-file store: one CSV file, a header plus one row per sale.
//!
//! Every mutation is a whole-file rewrite through a temp file, which is
//! the shape the format forces. An internal mutex serializes access so
//! two rewrites can never interleave.

use crate::domain::{SaleDate, SaleId, Transaction};
use crate::store::{codec, StoreError, TransactionStore};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::info;

/// Store backend over a single flat CSV file.
pub struct CsvStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvStore {
    /// Open a store at `path`, creating the file (header only) and its
    /// parent directory when missing.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        if !path.exists() {
            codec::write_file_atomic(&path, &[])?;
        }
        info!("csv store ready at {}", path.display());
        Ok(CsvStore {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Path of the active file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TransactionStore for CsvStore {
    async fn append(&self, tx: &Transaction) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        codec::append_record(&self.path, tx)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &SaleId) -> Result<Option<Transaction>, StoreError> {
        let _guard = self.lock.lock().await;
        let records = codec::read_file(&self.path)?;
        Ok(records.into_iter().find(|tx| tx.id == *id))
    }

    async fn find_by_date(&self, date: SaleDate) -> Result<Vec<Transaction>, StoreError> {
        let _guard = self.lock.lock().await;
        let records = codec::read_file(&self.path)?;
        Ok(records
            .into_iter()
            .filter(|tx| tx.sale_date() == date)
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Transaction>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(codec::read_file(&self.path)?)
    }

    async fn delete_by_id(&self, id: &SaleId) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        // Strict read: rewriting around an unreadable record would drop it.
        let records = codec::read_file_strict(&self.path)?;
        if !records.iter().any(|tx| tx.id == *id) {
            return Err(StoreError::NotFound(id.clone()));
        }
        let retained: Vec<Transaction> =
            records.into_iter().filter(|tx| tx.id != *id).collect();
        codec::write_file_atomic(&self.path, &retained)?;
        Ok(())
    }

    async fn delete_by_date(&self, date: SaleDate) -> Result<u64, StoreError> {
        let _guard = self.lock.lock().await;
        let records = codec::read_file_strict(&self.path)?;
        let before = records.len();
        let retained: Vec<Transaction> = records
            .into_iter()
            .filter(|tx| tx.sale_date() != date)
            .collect();
        let removed = (before - retained.len()) as u64;
        if removed > 0 {
            codec::write_file_atomic(&self.path, &retained)?;
        }
        Ok(removed)
    }

    async fn oldest_date(&self) -> Result<Option<SaleDate>, StoreError> {
        let _guard = self.lock.lock().await;
        let records = codec::read_file_strict(&self.path)?;
        Ok(records.first().map(Transaction::sale_date))
    }

    async fn dates_present(&self) -> Result<Vec<SaleDate>, StoreError> {
        let _guard = self.lock.lock().await;
        let records = codec::read_file_strict(&self.path)?;
        let dates: BTreeSet<SaleDate> = records.iter().map(Transaction::sale_date).collect();
        Ok(dates.into_iter().collect())
    }

    async fn rename_to_archive(&self, dest: &Path) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        // A literal rename keeps even rows we cannot parse, so nothing
        // is lost in the handoff.
        if self.path.exists() {
            std::fs::rename(&self.path, dest)?;
        } else {
            codec::write_file_atomic(dest, &[])?;
        }
        codec::write_file_atomic(&self.path, &[])?;
        Ok(())
    }
}
