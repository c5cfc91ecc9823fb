//! Storage-layer errors for SQLite operations.

use super::error_code::{self, DenErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Database busy: {message}")]
    Busy { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("unknown schema version {found} (newest supported is {supported})")]
    UnknownSchemaVersion { found: u32, supported: u32 },

    #[error("write lock poisoned")]
    LockPoisoned,
}

impl DenErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Busy { .. } => error_code::DB_BUSY,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::UnknownSchemaVersion { .. } => error_code::UNKNOWN_SCHEMA,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
