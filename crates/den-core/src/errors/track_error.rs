//! Tracked-root precondition errors.
//! All of these are raised before anything is written.

use std::path::PathBuf;

use super::error_code::{self, DenErrorCode};
use super::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("Cannot access {path}: {source}")]
    PathNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Path is already tracked: {path}")]
    AlreadyTracked { path: PathBuf },

    #[error("{path} is inside the tracked path {root}")]
    InsideTracked { path: PathBuf, root: PathBuf },

    #[error("{path} contains the tracked path {root}")]
    ContainsTracked { path: PathBuf, root: PathBuf },

    #[error("Path is not tracked: {path}")]
    NotTracked { path: PathBuf },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DenErrorCode for TrackError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::PathNotFound { .. } | Self::NotADirectory { .. } => error_code::PATH_NOT_FOUND,
            Self::AlreadyTracked { .. }
            | Self::InsideTracked { .. }
            | Self::ContainsTracked { .. } => error_code::ROOT_OVERLAP,
            Self::NotTracked { .. } => error_code::NOT_TRACKED,
            Self::Storage(e) => e.error_code(),
        }
    }
}
