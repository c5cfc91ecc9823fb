//! Rescan: bring the catalog back in line with every tracked root.
//!
//! Phase one walks each root and diffs it against the stored states,
//! deleting removed and changed entries inside a single write transaction;
//! any traversal error rolls the whole phase back. Phase two reindexes the
//! new and changed files in bounded batches. Each phase reports through its
//! own progress stream.

use std::path::PathBuf;
use std::time::Instant;

use den_core::errors::IndexResult;
use den_core::types::collections::FxHashMap;
use den_core::types::StoredFileState;
use den_storage::queries::{files, tracked};
use den_storage::{BatchStats, CatalogStore};
use tracing::{debug, info};

use crate::classify::Classifier;
use crate::indexer::{index_files, IndexSettings};
use crate::progress::ProgressReporter;
use crate::reconcile::reconcile;
use crate::walker::{DirectoryWalker, WalkedFile};

/// Outcome of [`rescan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RescanSummary {
    pub roots: Vec<PathBuf>,
    pub walked: usize,
    /// Stored entries removed because their file vanished or changed.
    pub deleted: usize,
    /// Keys scheduled for (re)indexing, sorted.
    pub reindexed: Vec<String>,
    pub stats: BatchStats,
}

impl RescanSummary {
    pub fn is_unchanged(&self) -> bool {
        self.deleted == 0 && self.reindexed.is_empty()
    }
}

/// Rescan all tracked roots.
///
/// `check` counts walked files against the number of entries stored when
/// the rescan began; `index` counts reindexed files.
pub fn rescan(
    store: &CatalogStore,
    classifier: &Classifier,
    settings: &IndexSettings,
    mut check: ProgressReporter,
    mut index: ProgressReporter,
) -> IndexResult<RescanSummary> {
    let started = Instant::now();
    check.start();

    let mut summary = RescanSummary::default();
    let mut pending: Vec<WalkedFile> = Vec::new();

    let txn = store.begin()?;
    summary.roots = tracked::list_tracked(&txn)?;
    let stored_total = files::count_files(&txn)?;
    check.set_total(u64::try_from(stored_total).unwrap_or(0));

    for root in &summary.roots {
        let stored = files::file_states_under(&txn, root)?;

        let mut walked: FxHashMap<String, WalkedFile> = FxHashMap::default();
        for file in DirectoryWalker::new(root).walk() {
            let file = file?;
            check.inc(1);
            walked.insert(file.key.clone(), file);
        }
        let states: FxHashMap<String, StoredFileState> = walked
            .iter()
            .map(|(key, file)| (key.clone(), file.state()))
            .collect();

        let diff = reconcile(&stored, &states);
        debug!(
            root = %root.display(),
            stored = stored.len(),
            walked = walked.len(),
            delete = diff.delete.len(),
            reindex = diff.reindex.len(),
            "reconciled root"
        );
        summary.walked += walked.len();
        summary.deleted += files::delete_paths(&txn, &diff.delete, settings.delete_chunk_size)?;
        for key in diff.reindex {
            if let Some(file) = walked.remove(&key) {
                pending.push(file);
            }
            summary.reindexed.push(key);
        }
    }
    txn.commit()?;
    check.finish();

    index.start();
    index.set_total(pending.len() as u64);
    summary.stats = index_files(store, classifier, &pending, settings.batch_size, &mut index)?;
    index.finish();

    summary.reindexed.sort_unstable();
    info!(
        roots = summary.roots.len(),
        walked = summary.walked,
        deleted = summary.deleted,
        reindexed = summary.reindexed.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "rescan complete"
    );
    Ok(summary)
}
