//! Schema migrations using PRAGMA user_version.
//!
//! Forward-only. A database stamped with a version newer than the newest
//! known migration is refused rather than guessed at.

pub mod v001_initial;

use den_core::constants::SCHEMA_VERSION;
use den_core::errors::StorageError;
use rusqlite::Connection;

const MIGRATIONS: &[(&str, u32)] = &[(v001_initial::MIGRATION_SQL, 1)];

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current = conn
        .pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))
        .map_err(|e| StorageError::MigrationFailed {
            version: 0,
            message: e.to_string(),
        })?;

    if current > SCHEMA_VERSION {
        return Err(StorageError::UnknownSchemaVersion {
            found: current,
            supported: SCHEMA_VERSION,
        });
    }

    for &(sql, version) in MIGRATIONS {
        if current >= version {
            continue;
        }
        // Schema change and version bump land together or not at all.
        let batch = format!("BEGIN IMMEDIATE;\n{sql}\nPRAGMA user_version = {version};\nCOMMIT;");
        if let Err(e) = conn.execute_batch(&batch) {
            if !conn.is_autocommit() {
                let _ = conn.execute_batch("ROLLBACK");
            }
            return Err(StorageError::MigrationFailed {
                version,
                message: e.to_string(),
            });
        }
        tracing::info!(version, "applied migration");
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}
