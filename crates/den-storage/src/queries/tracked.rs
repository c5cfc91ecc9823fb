//! tracked_path queries and the non-overlap invariant.

use std::path::{Path, PathBuf};

use den_core::errors::{StorageError, TrackError};
use den_core::types::path_key;
use rusqlite::{params, Connection};

use super::files;

/// All tracked roots, sorted.
pub fn list_tracked(conn: &Connection) -> Result<Vec<PathBuf>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT path FROM tracked_path ORDER BY path")
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;

    let mut result = Vec::new();
    for row in rows {
        result.push(PathBuf::from(row.map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?));
    }
    Ok(result)
}

/// Check `root` against the existing roots. Comparison is per path component,
/// so `/data2` does not overlap `/data`.
pub fn check_overlap(existing: &[PathBuf], root: &Path) -> Result<(), TrackError> {
    for tracked in existing {
        if tracked == root {
            return Err(TrackError::AlreadyTracked {
                path: root.to_path_buf(),
            });
        }
        if root.starts_with(tracked) {
            return Err(TrackError::InsideTracked {
                path: root.to_path_buf(),
                root: tracked.clone(),
            });
        }
        if tracked.starts_with(root) {
            return Err(TrackError::ContainsTracked {
                path: root.to_path_buf(),
                root: tracked.clone(),
            });
        }
    }
    Ok(())
}

/// Record `root` as tracked. `root` must already be absolute and normalized.
pub fn track_root(conn: &Connection, root: &Path) -> Result<(), TrackError> {
    let existing = list_tracked(conn)?;
    check_overlap(&existing, root)?;

    conn.execute(
        "INSERT INTO tracked_path (path) VALUES (?1)",
        params![path_key(root)],
    )
    .map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    Ok(())
}

/// Stop tracking `root` and delete every catalog entry that no remaining root
/// covers. Returns the number of deleted entries.
///
/// Run inside a write transaction: on [`TrackError::NotTracked`] the caller's
/// rollback leaves the catalog untouched.
pub fn untrack_root(
    conn: &Connection,
    root: &Path,
    delete_chunk_size: usize,
) -> Result<usize, TrackError> {
    let removed = conn
        .execute(
            "DELETE FROM tracked_path WHERE path = ?1",
            params![path_key(root)],
        )
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
    if removed != 1 {
        return Err(TrackError::NotTracked {
            path: root.to_path_buf(),
        });
    }

    let remaining = list_tracked(conn)?;
    if remaining.is_empty() {
        let deleted = conn
            .execute("DELETE FROM file", [])
            .map_err(|e| StorageError::SqliteError {
                message: e.to_string(),
            })?;
        return Ok(deleted);
    }

    let orphans: Vec<String> = files::all_paths(conn)?
        .into_iter()
        .filter(|p| !remaining.iter().any(|r| Path::new(p).starts_with(r)))
        .collect();
    Ok(files::delete_paths(conn, &orphans, delete_chunk_size)?)
}
