//! Top-level catalog operations: track-and-index a new root, untrack a
//! root, list tracked roots.
//!
//! Precondition failures (missing path, overlapping root, unknown root) are
//! reported before anything is written. Indexing commits in bounded
//! batches; a failure keeps the batches already committed.

use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use den_core::config::{DenConfig, IndexConfig};
use den_core::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_DELETE_CHUNK_SIZE, DEFAULT_PROGRESS_INTERVAL_MS,
    DEFAULT_SNIFF_LEN,
};
use den_core::errors::{ConfigError, IndexError, IndexResult, TrackError};
use den_storage::queries::tracked;
use den_storage::{BatchStats, BatchWriter, CatalogStore};
use tracing::info;

use crate::classify::{Classifier, MediaSource};
use crate::progress::ProgressReporter;
use crate::walker::{DirectoryWalker, WalkedFile};

/// Tunables shared by indexing and rescanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSettings {
    pub batch_size: usize,
    pub delete_chunk_size: usize,
    pub progress_interval: Duration,
    pub sniff_len: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            delete_chunk_size: DEFAULT_DELETE_CHUNK_SIZE,
            progress_interval: Duration::from_millis(DEFAULT_PROGRESS_INTERVAL_MS),
            sniff_len: DEFAULT_SNIFF_LEN,
        }
    }
}

impl From<&IndexConfig> for IndexSettings {
    fn from(config: &IndexConfig) -> Self {
        Self {
            batch_size: config.effective_batch_size(),
            delete_chunk_size: config.effective_delete_chunk_size(),
            progress_interval: config.effective_progress_interval(),
            sniff_len: config.effective_sniff_len(),
        }
    }
}

impl IndexSettings {
    /// A classifier sniffing `sniff_len` bytes and probing through `media`.
    pub fn classifier(&self, media: impl MediaSource + 'static) -> Classifier {
        Classifier::new(media).with_sniff_len(self.sniff_len)
    }
}

/// Outcome of [`track_and_index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSummary {
    pub root: PathBuf,
    pub walked: usize,
    pub stats: BatchStats,
}

/// Open (creating if needed) the catalog the configuration points at.
pub fn open_catalog(config: &DenConfig) -> IndexResult<CatalogStore> {
    let path = config
        .storage
        .effective_database_path()
        .ok_or_else(|| ConfigError::ValidationFailed {
            field: "storage.database_path".to_string(),
            message: "no home directory to derive a default from".to_string(),
        })?;
    Ok(CatalogStore::open_with_pool_size(
        &path,
        config.storage.effective_read_pool_size(),
    )?)
}

/// Lexically absolute form of `path`: joined onto the working directory,
/// `.` dropped and `..` folded. Symlinks are left alone.
pub fn absolute_root(path: &Path) -> Result<PathBuf, TrackError> {
    let joined = std::path::absolute(path).map_err(|source| TrackError::PathNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let mut clean = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                clean.pop();
            }
            other => clean.push(other),
        }
    }
    Ok(clean)
}

fn existing_directory(path: &Path) -> Result<PathBuf, TrackError> {
    let root = absolute_root(path)?;
    let metadata = std::fs::metadata(&root).map_err(|source| TrackError::PathNotFound {
        path: root.clone(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(TrackError::NotADirectory { path: root });
    }
    Ok(root)
}

/// Track `path` and catalog every visible regular file beneath it.
///
/// The root is recorded first, in its own transaction. The walk then fixes
/// the progress total, and entries are written in batches of
/// `settings.batch_size`.
pub fn track_and_index(
    store: &CatalogStore,
    classifier: &Classifier,
    path: &Path,
    settings: &IndexSettings,
    mut progress: ProgressReporter,
) -> IndexResult<IndexSummary> {
    let started = Instant::now();
    progress.start();

    let root = existing_directory(path)?;
    store.with_transaction(|conn| tracked::track_root(conn, &root))?;
    info!(root = %root.display(), "tracking new root");

    let mut files = Vec::new();
    for file in DirectoryWalker::new(&root).walk() {
        files.push(file?);
        progress.add_total(1);
    }

    let stats = index_files(store, classifier, &files, settings.batch_size, &mut progress)?;
    progress.finish();
    info!(
        root = %root.display(),
        files = files.len(),
        inserted = stats.inserted,
        already_present = stats.already_present,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "indexing complete"
    );

    Ok(IndexSummary {
        root,
        walked: files.len(),
        stats,
    })
}

/// Classify and insert-if-absent each file in batches, advancing
/// `progress.done` per file.
pub(crate) fn index_files(
    store: &CatalogStore,
    classifier: &Classifier,
    files: &[WalkedFile],
    batch_size: usize,
    progress: &mut ProgressReporter,
) -> IndexResult<BatchStats> {
    let mut writer = BatchWriter::new(store, batch_size);
    for file in files {
        let entry = classifier.entry_for(file);
        writer
            .insert(&entry)
            .map_err(|source| IndexError::Persist {
                path: file.path.clone(),
                source,
            })?;
        progress.inc(1);
    }
    Ok(writer.finish()?)
}

/// Stop tracking `path` and drop every entry no remaining root covers.
/// Returns the number of entries deleted.
pub fn untrack(store: &CatalogStore, path: &Path, settings: &IndexSettings) -> IndexResult<usize> {
    let root = absolute_root(path)?;
    let deleted = store.with_transaction(|conn| {
        tracked::untrack_root(conn, &root, settings.delete_chunk_size)
    })?;
    info!(root = %root.display(), deleted, "untracked root");
    Ok(deleted)
}

/// Tracked roots, sorted.
pub fn list_tracked(store: &CatalogStore) -> IndexResult<Vec<PathBuf>> {
    Ok(store.with_reader(tracked::list_tracked)?)
}
