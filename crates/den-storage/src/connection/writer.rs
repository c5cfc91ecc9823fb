//! Explicit write transactions on the serialized writer connection.

use std::ops::Deref;
use std::sync::MutexGuard;

use den_core::errors::StorageError;
use rusqlite::{Connection, ErrorCode};

/// An open `BEGIN IMMEDIATE` transaction.
///
/// Holds the store's write lock for its whole lifetime, so a second
/// [`CatalogStore::begin`](super::CatalogStore::begin) blocks until this one
/// is committed, rolled back, or dropped. Dropping without `commit` rolls back.
pub struct WriteTxn<'a> {
    conn: MutexGuard<'a, Connection>,
    finished: bool,
}

impl<'a> WriteTxn<'a> {
    pub(crate) fn begin(conn: MutexGuard<'a, Connection>) -> Result<Self, StorageError> {
        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| classify_error("failed to begin immediate transaction", e))?;
        Ok(Self {
            conn,
            finished: false,
        })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn commit(mut self) -> Result<(), StorageError> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| classify_error("failed to commit", e))?;
        self.finished = true;
        Ok(())
    }

    pub fn rollback(mut self) -> Result<(), StorageError> {
        self.finished = true;
        if self.conn.is_autocommit() {
            // SQLite already rolled back on its own.
            return Ok(());
        }
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| StorageError::SqliteError {
                message: format!("failed to roll back: {e}"),
            })
    }
}

impl Deref for WriteTxn<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for WriteTxn<'_> {
    fn drop(&mut self) {
        if self.finished || self.conn.is_autocommit() {
            return;
        }
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            tracing::warn!(error = %e, "rollback of abandoned transaction failed");
        }
    }
}

/// Map a rusqlite error, separating lock contention from other failures.
pub(crate) fn classify_error(context: &str, e: rusqlite::Error) -> StorageError {
    match e.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => StorageError::Busy {
            message: format!("{context}: {e}"),
        },
        _ => StorageError::SqliteError {
            message: format!("{context}: {e}"),
        },
    }
}
