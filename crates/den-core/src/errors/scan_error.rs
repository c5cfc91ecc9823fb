//! Directory walk errors.

use std::path::PathBuf;

use super::error_code::{self, DenErrorCode};

/// Errors that abort a directory walk.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("IO error walking {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },
}

impl ScanError {
    /// The path the walk failed on.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::IoError { path, .. } | Self::PermissionDenied { path } => path,
        }
    }
}

impl DenErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        error_code::SCAN_ERROR
    }
}
