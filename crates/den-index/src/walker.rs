//! DirectoryWalker: lazy, depth-first enumeration of the regular,
//! non-hidden files under a root.
//!
//! Hidden entries are pruned with `filter_entry`, so a hidden directory's
//! subtree is never read. Symlinks are not followed and, like devices,
//! sockets, and other non-regular entries, are skipped. The first traversal
//! error ends the walk.

use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

use den_core::errors::ScanError;
use den_core::types::{path_key, StoredFileState};
use walkdir::{DirEntry, WalkDir};

use crate::hidden::is_hidden;
use crate::times;

/// A regular file found by the walk.
#[derive(Debug, Clone)]
pub struct WalkedFile {
    pub path: PathBuf,
    /// Catalog key for `path`.
    pub key: String,
    pub metadata: Metadata,
}

impl WalkedFile {
    fn new(path: PathBuf, metadata: Metadata) -> Self {
        let key = path_key(&path);
        Self {
            path,
            key,
            metadata,
        }
    }

    pub fn size(&self) -> i64 {
        i64::try_from(self.metadata.len()).unwrap_or(i64::MAX)
    }

    /// Modification time in whole unix seconds.
    pub fn modified_secs(&self) -> i64 {
        times::modified_secs(&self.metadata)
    }

    /// The state a rescan compares against the stored entry.
    pub fn state(&self) -> StoredFileState {
        StoredFileState {
            size: self.size(),
            modified: self.modified_secs(),
        }
    }
}

type EntryFilter = fn(&DirEntry) -> bool;

// The root itself is never subject to the hidden check.
fn visible(entry: &DirEntry) -> bool {
    entry.depth() == 0 || !is_hidden(entry)
}

pub struct DirectoryWalker {
    root: PathBuf,
}

impl DirectoryWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Start a fresh walk. Each call re-reads the filesystem.
    pub fn walk(&self) -> Walk {
        let inner = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(visible as EntryFilter);
        Walk {
            inner,
            root: self.root.clone(),
            failed: false,
        }
    }

    /// Walk to completion, stopping at the first error.
    pub fn collect(&self) -> Result<Vec<WalkedFile>, ScanError> {
        self.walk().collect()
    }
}

/// Iterator over one walk. Yields at most one error, after which it is exhausted.
pub struct Walk {
    inner: walkdir::FilterEntry<walkdir::IntoIter, EntryFilter>,
    root: PathBuf,
    failed: bool,
}

impl Walk {
    fn fail(&mut self, e: walkdir::Error) -> ScanError {
        self.failed = true;
        let path = e
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        if e.io_error().map(io::Error::kind) == Some(io::ErrorKind::PermissionDenied) {
            return ScanError::PermissionDenied { path };
        }
        let message = e.to_string();
        let source = e
            .into_io_error()
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
        ScanError::IoError { path, source }
    }
}

impl Iterator for Walk {
    type Item = Result<WalkedFile, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(self.fail(e))),
            };
            if !entry.file_type().is_file() {
                continue;
            }
            return match entry.metadata() {
                Ok(metadata) => Some(Ok(WalkedFile::new(entry.into_path(), metadata))),
                Err(e) => Some(Err(self.fail(e))),
            };
        }
    }
}
