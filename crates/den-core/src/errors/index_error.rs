//! Top-level errors surfaced by indexing, rescanning, and untracking.

use std::path::PathBuf;

use super::error_code::{self, DenErrorCode};
use super::{ConfigError, ScanError, StorageError, TrackError};

/// The first unrecoverable failure of a long-running operation.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Track(#[from] TrackError),

    #[error("could not walk tracked path: {0}")]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("could not catalog {path}: {source}")]
    Persist {
        path: PathBuf,
        source: StorageError,
    },
}

pub type IndexResult<T> = Result<T, IndexError>;

impl DenErrorCode for IndexError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Track(e) => e.error_code(),
            Self::Scan(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Persist { .. } => error_code::INDEX_ERROR,
        }
    }
}
