//! file + extension table queries.

use std::path::{Path, MAIN_SEPARATOR};

use den_core::errors::StorageError;
use den_core::types::collections::FxHashMap;
use den_core::types::{path_key, CatalogEntry, Category, Extension, StoredFileState};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

/// Result of an insert-if-absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// New row with this `file.id`.
    Inserted(i64),
    /// A row for the path was already present; nothing was written.
    AlreadyExists,
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

/// Insert `entry` and its extension unless the path is already cataloged.
///
/// Uniqueness is enforced by the `UNIQUE(path)` constraint. When the base row
/// already exists the extension insert is skipped.
pub fn insert_entry(conn: &Connection, entry: &CatalogEntry) -> Result<InsertOutcome, StorageError> {
    let changed = conn
        .prepare_cached(
            "INSERT INTO file (path, size, created_guess, modified, mime)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (path) DO NOTHING",
        )
        .and_then(|mut stmt| {
            stmt.execute(params![
                entry.path,
                entry.size,
                entry.created_guess,
                entry.modified,
                entry.mime,
            ])
        })
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;

    if changed == 0 {
        return Ok(InsertOutcome::AlreadyExists);
    }
    let id = conn.last_insert_rowid();
    insert_extension(conn, id, &entry.extension)?;
    Ok(InsertOutcome::Inserted(id))
}

fn insert_extension(conn: &Connection, file_id: i64, extension: &Extension) -> Result<(), StorageError> {
    let result = match extension {
        Extension::None => return Ok(()),
        Extension::Picture { camera } => conn.execute(
            "INSERT INTO picture (file, camera) VALUES (?1, ?2)",
            params![file_id, non_empty(camera)],
        ),
        Extension::Video {
            seconds,
            camera,
            year,
        } => conn.execute(
            "INSERT INTO video (file, seconds, camera, year) VALUES (?1, ?2, ?3, ?4)",
            params![file_id, seconds, non_empty(camera), year],
        ),
        Extension::Audio {
            seconds,
            author,
            year,
        } => conn.execute(
            "INSERT INTO audio (file, seconds, author, year) VALUES (?1, ?2, ?3, ?4)",
            params![file_id, seconds, non_empty(author), year],
        ),
        Extension::Document => conn.execute(
            "INSERT INTO document (file) VALUES (?1)",
            params![file_id],
        ),
    };
    result.map(|_| ()).map_err(|e| StorageError::SqliteError {
        message: format!("insert {} extension: {e}", extension.category()),
    })
}

// Empty strings are stored as NULL so statistics skip them.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Delete entries by exact path; extensions cascade. Paths are bound in
/// chunks of `chunk_size` per statement. Returns the number of deleted rows.
pub fn delete_paths(conn: &Connection, paths: &[String], chunk_size: usize) -> Result<usize, StorageError> {
    let mut deleted = 0;
    for chunk in paths.chunks(chunk_size.max(1)) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!("DELETE FROM file WHERE path IN ({placeholders})");
        deleted += conn
            .execute(&sql, params_from_iter(chunk.iter()))
            .map_err(|e| StorageError::SqliteError {
                message: e.to_string(),
            })?;
    }
    Ok(deleted)
}

/// Key prefix shared by every path strictly below `root`.
pub fn subtree_prefix(root: &Path) -> String {
    let mut prefix = path_key(root);
    if !prefix.ends_with(MAIN_SEPARATOR) {
        prefix.push(MAIN_SEPARATOR);
    }
    prefix
}

/// Stored (size, modified) of every entry below `root`, keyed by path.
pub fn file_states_under(
    conn: &Connection,
    root: &Path,
) -> Result<FxHashMap<String, StoredFileState>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT path, size, modified FROM file
             WHERE substr(path, 1, length(?1)) = ?1",
        )
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;

    let rows = stmt
        .query_map(params![subtree_prefix(root)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                StoredFileState {
                    size: row.get(1)?,
                    modified: row.get(2)?,
                },
            ))
        })
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;

    let mut result = FxHashMap::default();
    for row in rows {
        let (path, state) = row.map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        result.insert(path, state);
    }
    Ok(result)
}

/// Every cataloged path, sorted.
pub fn all_paths(conn: &Connection) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT path FROM file ORDER BY path")
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
        result.push(row.map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?);
    }
    Ok(result)
}

const ENTRY_SELECT: &str = "
    SELECT f.path, f.size, f.created_guess, f.modified, f.mime,
           p.file IS NOT NULL, p.camera,
           v.file IS NOT NULL, v.seconds, v.camera, v.year,
           a.file IS NOT NULL, a.seconds, a.author, a.year,
           d.file IS NOT NULL
    FROM file f
    LEFT JOIN picture p ON p.file = f.id
    LEFT JOIN video v ON v.file = f.id
    LEFT JOIN audio a ON a.file = f.id
    LEFT JOIN document d ON d.file = f.id";

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<CatalogEntry> {
    let extension = if row.get::<_, bool>(5)? {
        Extension::Picture { camera: row.get(6)? }
    } else if row.get::<_, bool>(7)? {
        Extension::Video {
            seconds: row.get(8)?,
            camera: row.get(9)?,
            year: row.get(10)?,
        }
    } else if row.get::<_, bool>(11)? {
        Extension::Audio {
            seconds: row.get(12)?,
            author: row.get(13)?,
            year: row.get(14)?,
        }
    } else if row.get::<_, bool>(15)? {
        Extension::Document
    } else {
        Extension::None
    };

    Ok(CatalogEntry {
        path: row.get(0)?,
        size: row.get(1)?,
        created_guess: row.get(2)?,
        modified: row.get(3)?,
        mime: row.get(4)?,
        extension,
    })
}

/// Load one entry with its extension.
pub fn get_entry(conn: &Connection, path: &str) -> Result<Option<CatalogEntry>, StorageError> {
    let sql = format!("{ENTRY_SELECT} WHERE f.path = ?1");
    conn.prepare_cached(&sql)
        .and_then(|mut stmt| stmt.query_row(params![path], row_to_entry).optional())
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}

/// Every entry below `root` with its extension, sorted by path.
pub fn entries_under(conn: &Connection, root: &Path) -> Result<Vec<CatalogEntry>, StorageError> {
    let sql = format!(
        "{ENTRY_SELECT} WHERE substr(f.path, 1, length(?1)) = ?1 ORDER BY f.path"
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    let rows = stmt
        .query_map(params![subtree_prefix(root)], row_to_entry)
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?);
    }
    Ok(result)
}

/// Total number of cataloged files.
pub fn count_files(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM file", [], |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}

/// Number of extension rows for `category`; for `Other`, files without any.
pub fn count_category(conn: &Connection, category: Category) -> Result<i64, StorageError> {
    let sql = match category.table() {
        Some(table) => format!("SELECT COUNT(*) FROM {table}"),
        None => format!("SELECT COUNT(*) FROM file f WHERE {}", super::stats::NO_EXTENSION),
    };
    conn.query_row(&sql, [], |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}
