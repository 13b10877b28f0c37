//! The Ledger service: the single coordination point over pricing,
//! rotation, the active store and the day archives.

use crate::archive::{maybe_rotate, Archive, ArchiveError, RotationError};
use crate::domain::{BottleCounts, CustomerTier, SaleDate, SaleId, Tariff, Transaction};
use crate::engine::{self, DailySummary};
use crate::store::{StoreError, TransactionStore};
use chrono::NaiveDateTime;
use futures::future::try_join_all;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(transparent)]
    Rotation(#[from] RotationError),
}

/// Sales ledger over one active store and a day-archive catalog.
///
/// Reads go straight to the backends; appends and deletes serialize on
/// an internal write lock so rotation and mutation never interleave.
pub struct Ledger {
    store: Arc<dyn TransactionStore>,
    archive: Archive,
    tariff: Tariff,
    write: Mutex<()>,
}

impl Ledger {
    pub fn new(store: Arc<dyn TransactionStore>, archive: Archive, tariff: Tariff) -> Self {
        Ledger {
            store,
            archive,
            tariff,
            write: Mutex::new(()),
        }
    }

    /// Price and persist a sale happening at `now`. Stale days rotate
    /// out first, so after this call the active store holds only
    /// `now`'s date (absent interruptions).
    ///
    /// # Errors
    /// Fails when rotation or the append fails; the sale is not
    /// recorded in that case.
    pub async fn record_sale(
        &self,
        tier: CustomerTier,
        counts: BottleCounts,
        now: NaiveDateTime,
    ) -> Result<Transaction, LedgerError> {
        let quote = engine::quote(&self.tariff, tier, counts);

        let _guard = self.write.lock().await;
        maybe_rotate(self.store.as_ref(), &self.archive, SaleDate::new(now.date())).await?;

        let tx = Transaction::new(
            SaleId::generate(),
            now,
            tier,
            counts,
            quote.total_price,
            quote.total_gas,
        );
        self.store.append(&tx).await?;
        info!(id = %tx.id, total_price = %tx.total_price, total_gas = %tx.total_gas, "sale recorded");
        Ok(tx)
    }

    /// Point lookup in the active store.
    pub async fn sale(&self, id: &SaleId) -> Result<Option<Transaction>, LedgerError> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// All sales on `date`: the day archive (if the date has rotated
    /// out) followed by the active store. Archive records come first
    /// because they were inserted earlier; ids are de-duplicated in
    /// case an interrupted rotation left a record in both places.
    pub async fn sales_on(&self, date: SaleDate) -> Result<Vec<Transaction>, LedgerError> {
        let archived = self.archive.read_day(date).await?;
        let active = self.store.find_by_date(date).await?;

        let mut seen: HashSet<SaleId> = HashSet::with_capacity(archived.len() + active.len());
        let mut merged = Vec::with_capacity(archived.len() + active.len());
        for tx in archived.into_iter().chain(active) {
            if seen.insert(tx.id.clone()) {
                merged.push(tx);
            }
        }
        Ok(merged)
    }

    /// Totals for one date, across active store and archive.
    pub async fn summary_on(&self, date: SaleDate) -> Result<DailySummary, LedgerError> {
        Ok(engine::summarize(&self.sales_on(date).await?))
    }

    /// Totals grouped by date across every archived day and the active
    /// store, ascending. Archived days are read concurrently.
    pub async fn summary_by_date(&self) -> Result<BTreeMap<SaleDate, DailySummary>, LedgerError> {
        let days = self.archive.list_days()?;
        let archived = try_join_all(days.into_iter().map(|day| self.archive.read_day(day))).await?;
        let active = self.store.find_all().await?;

        let mut seen: HashSet<SaleId> = HashSet::new();
        let mut all = Vec::new();
        for tx in archived.into_iter().flatten().chain(active) {
            if seen.insert(tx.id.clone()) {
                all.push(tx);
            }
        }
        Ok(engine::summarize_by_date(&all))
    }

    /// Delete one sale from the active store. Archived days are
    /// immutable; in steady state only today is deletable.
    ///
    /// # Errors
    /// `StoreError::NotFound` (wrapped) when the active store has no
    /// record with `id`.
    pub async fn delete_sale(&self, id: &SaleId) -> Result<(), LedgerError> {
        let _guard = self.write.lock().await;
        self.store.delete_by_id(id).await?;
        info!(id = %id, "sale deleted");
        Ok(())
    }

    /// Delete every active-store record for `date`, returning the
    /// count removed. Archives are never touched.
    pub async fn delete_day(&self, date: SaleDate) -> Result<u64, LedgerError> {
        let _guard = self.write.lock().await;
        let removed = self.store.delete_by_date(date).await?;
        info!(date = %date, removed, "day deleted from active store");
        Ok(removed)
    }
}
