//! Day archives: one read-only CSV file per rotated-out date.

pub mod rotation;

pub use rotation::{maybe_rotate, RotationError, RotationOutcome};

use crate::domain::{SaleDate, SaleId, Transaction};
use crate::store::codec::{self, CodecError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Catalog of per-date archive files in a single directory, named
/// `transactions_<YYYY-MM-DD>.csv`. Files are created only at rotation
/// time and never modified afterwards except to merge a re-run.
#[derive(Debug, Clone)]
pub struct Archive {
    dir: PathBuf,
}

impl Archive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Archive { dir: dir.into() }
    }

    /// Directory holding the day files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Archive file path for a date.
    pub fn path_for(&self, date: SaleDate) -> PathBuf {
        self.dir.join(format!("transactions_{}.csv", date))
    }

    /// Whether an archive file exists for `date`.
    pub fn has_day(&self, date: SaleDate) -> bool {
        self.path_for(date).exists()
    }

    /// Create the archive directory if it is not there yet.
    pub fn ensure_dir(&self) -> Result<(), ArchiveError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Read one day's archive; a missing file reads as empty. Async so
    /// the grouped summary can read many days concurrently.
    pub async fn read_day(&self, date: SaleDate) -> Result<Vec<Transaction>, ArchiveError> {
        let path = self.path_for(date);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(codec::read_records(
                bytes.as_slice(),
                &path.display().to_string(),
            )?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a day's records into its archive, merging with anything
    /// already there and de-duplicating by id, through an atomic
    /// replace. This is what makes re-running an interrupted rotation
    /// lose nothing and duplicate nothing.
    pub fn write_day(&self, date: SaleDate, records: &[Transaction]) -> Result<(), ArchiveError> {
        self.ensure_dir()?;
        let path = self.path_for(date);
        // Strict read: merging over records we cannot decode would
        // rewrite them away.
        let existing = codec::read_file_strict(&path)?;
        let mut seen: HashSet<SaleId> = existing.iter().map(|tx| tx.id.clone()).collect();
        let mut merged = existing;
        for tx in records {
            if seen.insert(tx.id.clone()) {
                merged.push(tx.clone());
            }
        }
        codec::write_file_atomic(&path, &merged)?;
        Ok(())
    }

    /// Dates that have an archive file, ascending. Files not matching
    /// the naming pattern are ignored.
    pub fn list_days(&self) -> Result<Vec<SaleDate>, ArchiveError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut days = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(date_part) = name
                .strip_prefix("transactions_")
                .and_then(|rest| rest.strip_suffix(".csv"))
            else {
                continue;
            };
            if let Ok(date) = SaleDate::parse(date_part) {
                days.push(date);
            }
        }
        days.sort();
        Ok(days)
    }
}
