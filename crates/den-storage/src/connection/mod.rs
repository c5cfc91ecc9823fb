//! Connection management: write-serialized + read-pooled.

pub mod pragmas;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use den_core::constants::{DEFAULT_READ_POOL_SIZE, MAX_READ_POOL_SIZE};
use den_core::errors::StorageError;
use rusqlite::{Connection, OpenFlags};

pub use self::writer::WriteTxn;

use self::pragmas::{apply_pragmas, apply_read_pragmas};
use crate::migrations;

/// The catalog persistence handle.
///
/// Owns the single writer connection behind an explicit write lock and,
/// for file-backed databases, a pool of read-only connections. Each instance
/// is independent; nothing is process-global.
pub struct CatalogStore {
    writer: Mutex<Connection>,
    // Empty for in-memory databases, which cannot be shared across connections.
    readers: Vec<Mutex<Connection>>,
    next_reader: AtomicUsize,
    path: Option<PathBuf>,
}

impl CatalogStore {
    /// Open (creating if needed) the database at `path`, apply pragmas,
    /// run migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Self::open_with_pool_size(path, DEFAULT_READ_POOL_SIZE)
    }

    /// Like [`CatalogStore::open`] with `pool_size` read-only connections,
    /// clamped to `1..=MAX_READ_POOL_SIZE`.
    pub fn open_with_pool_size(path: &Path, pool_size: usize) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::SqliteError {
                message: format!("could not create {}: {e}", parent.display()),
            })?;
        }

        let writer = Connection::open(path).map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        apply_pragmas(&writer)?;
        migrations::run_migrations(&writer)?;

        let readers = (0..pool_size.clamp(1, MAX_READ_POOL_SIZE))
            .map(|_| open_reader(path).map(Mutex::new))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            next_reader: AtomicUsize::new(0),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database (for testing). Reads go through the writer.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let writer = Connection::open_in_memory().map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        apply_pragmas(&writer)?;
        migrations::run_migrations(&writer)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Vec::new(),
            next_reader: AtomicUsize::new(0),
            path: None,
        })
    }

    /// Start an explicit write transaction, blocking while another is open.
    pub fn begin(&self) -> Result<WriteTxn<'_>, StorageError> {
        let guard = self.writer.lock().map_err(|_| StorageError::LockPoisoned)?;
        WriteTxn::begin(guard)
    }

    /// Run `f` inside one write transaction; commit on `Ok`, roll back on `Err`.
    pub fn with_transaction<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<StorageError>,
    {
        let txn = self.begin()?;
        match f(txn.conn()) {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback() {
                    tracing::warn!(error = %rollback_err, "rollback failed");
                }
                Err(e)
            }
        }
    }

    /// Execute a statement on the writer outside an explicit transaction.
    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.writer.lock().map_err(|_| StorageError::LockPoisoned)?;
        f(&guard)
    }

    /// Execute a read on the next read-only connection in round-robin order.
    ///
    /// In-memory stores read through the writer, so this must not be called
    /// while the same thread holds a [`WriteTxn`] on one; read through the
    /// transaction instead.
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        if self.readers.is_empty() {
            return self.with_writer(f);
        }
        let idx = self.next_reader.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let guard = self.readers[idx]
            .lock()
            .map_err(|_| StorageError::LockPoisoned)?;
        f(&guard)
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of read-only connections; zero for in-memory stores.
    pub fn read_pool_size(&self) -> usize {
        self.readers.len()
    }
}

fn open_reader(path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    apply_read_pragmas(&conn)?;
    Ok(conn)
}
