//! BatchWriter: groups inserts into transactions of at most `batch_size`
//! entries, committing at the cap and on `finish`.

use den_core::errors::StorageError;
use den_core::types::CatalogEntry;

use crate::connection::{CatalogStore, WriteTxn};
use crate::queries::files::{self, InsertOutcome};

/// Counters for one batched run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub inserted: usize,
    pub already_present: usize,
    pub batches_committed: usize,
}

impl BatchStats {
    pub fn total(&self) -> usize {
        self.inserted + self.already_present
    }
}

/// Writes entries in bounded transactions.
///
/// Only committed batches survive: dropping the writer (or a process crash)
/// loses the in-flight batch and nothing else. A failed insert rolls back the
/// current batch and leaves earlier batches in place.
pub struct BatchWriter<'a> {
    store: &'a CatalogStore,
    txn: Option<WriteTxn<'a>>,
    batch_size: usize,
    // Counters of the open batch, credited to `stats` on commit.
    pending: BatchStats,
    stats: BatchStats,
}

impl<'a> BatchWriter<'a> {
    pub fn new(store: &'a CatalogStore, batch_size: usize) -> Self {
        Self {
            store,
            txn: None,
            batch_size: batch_size.max(1),
            pending: BatchStats::default(),
            stats: BatchStats::default(),
        }
    }

    /// Insert-if-absent one entry, opening a transaction when none is open.
    pub fn insert(&mut self, entry: &CatalogEntry) -> Result<InsertOutcome, StorageError> {
        if self.txn.is_none() {
            self.txn = Some(self.store.begin()?);
        }
        let Some(txn) = self.txn.as_ref() else {
            return Err(StorageError::SqliteError {
                message: "batch transaction missing".to_string(),
            });
        };

        let outcome = match files::insert_entry(txn, entry) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.abort();
                return Err(e);
            }
        };

        match outcome {
            InsertOutcome::Inserted(_) => self.pending.inserted += 1,
            InsertOutcome::AlreadyExists => self.pending.already_present += 1,
        }
        if self.pending.total() >= self.batch_size {
            self.flush()?;
        }
        Ok(outcome)
    }

    /// Commit the open batch, if any.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        let Some(txn) = self.txn.take() else {
            return Ok(());
        };
        let batch = std::mem::take(&mut self.pending);
        txn.commit()?;
        self.stats.inserted += batch.inserted;
        self.stats.already_present += batch.already_present;
        self.stats.batches_committed += 1;
        let entries = batch.total();
        tracing::debug!(entries, batch = self.stats.batches_committed, "committed batch");
        Ok(())
    }

    /// Commit the final partial batch and return the run's counters.
    pub fn finish(mut self) -> Result<BatchStats, StorageError> {
        self.flush()?;
        Ok(self.stats)
    }

    /// Roll back the in-flight batch.
    pub fn abort(&mut self) {
        self.pending = BatchStats::default();
        if let Some(txn) = self.txn.take() {
            if let Err(e) = txn.rollback() {
                tracing::warn!(error = %e, "batch rollback failed");
            }
        }
    }

    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    /// Entries written to the open, uncommitted batch.
    pub fn pending(&self) -> usize {
        self.pending.total()
    }
}
