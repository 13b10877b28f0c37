//! Lazy day-rollover: move non-today dates out of the active store.

use super::{Archive, ArchiveError};
use crate::domain::SaleDate;
use crate::store::{StoreError, TransactionStore};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RotationError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// What a rotation check did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The active store already held nothing but `today`, or nothing.
    Unchanged,
    /// These dates moved into their day archives, ascending.
    Rotated(Vec<SaleDate>),
}

/// Rotate every date other than `today` out of the active store into
/// its own day archive. Runs under the service write lock before each
/// append, so in steady state it fires once per day boundary.
///
/// Each date moves in archive-then-delete order: the day is written
/// (merged, de-duplicated) into its archive before the store forgets
/// it, so an interruption between the two steps is repaired by simply
/// running rotation again.
///
/// # Errors
/// Fails on store or archive I/O, and on undecodable records in a day
/// being moved; the store keeps the day in that case.
pub async fn maybe_rotate(
    store: &dyn TransactionStore,
    archive: &Archive,
    today: SaleDate,
) -> Result<RotationOutcome, RotationError> {
    let oldest = match store.oldest_date().await? {
        None => return Ok(RotationOutcome::Unchanged),
        Some(date) => date,
    };
    if oldest == today {
        return Ok(RotationOutcome::Unchanged);
    }

    let dates = store.dates_present().await?;
    let stale: Vec<SaleDate> = dates.iter().copied().filter(|d| *d != today).collect();

    // Steady state: the whole store is one stale day and its archive
    // does not exist yet, so the cheap whole-store move applies.
    if dates.len() == 1 && !archive.has_day(stale[0]) {
        archive.ensure_dir()?;
        store.rename_to_archive(&archive.path_for(stale[0])).await?;
        info!(date = %stale[0], "rotated day via whole-store rename");
        return Ok(RotationOutcome::Rotated(stale));
    }

    let mut rotated = Vec::with_capacity(stale.len());
    for date in stale {
        let day = store.find_by_date(date).await?;
        archive.write_day(date, &day)?;
        let removed = store.delete_by_date(date).await?;
        info!(date = %date, records = removed, "rotated day into archive");
        rotated.push(date);
    }
    Ok(RotationOutcome::Rotated(rotated))
}
