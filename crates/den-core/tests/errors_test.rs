//! Error code mapping and message formatting.

use std::path::PathBuf;

use den_core::errors::error_code;
use den_core::errors::{DenErrorCode, IndexError, ScanError, StorageError, TrackError};

#[test]
fn storage_codes() {
    let busy = StorageError::Busy {
        message: "locked".into(),
    };
    assert_eq!(busy.error_code(), error_code::DB_BUSY);

    let unknown = StorageError::UnknownSchemaVersion {
        found: 7,
        supported: 1,
    };
    assert_eq!(unknown.error_code(), error_code::UNKNOWN_SCHEMA);
    assert!(unknown.to_string().contains('7'));
}

#[test]
fn track_errors_map_to_precondition_codes() {
    let overlap = TrackError::InsideTracked {
        path: PathBuf::from("/data/photos"),
        root: PathBuf::from("/data"),
    };
    assert_eq!(overlap.error_code(), error_code::ROOT_OVERLAP);

    let missing = TrackError::NotTracked {
        path: PathBuf::from("/nowhere"),
    };
    assert_eq!(
        missing.coded_string(),
        "[NOT_TRACKED] Path is not tracked: /nowhere"
    );
}

#[test]
fn index_error_delegates_codes() {
    let scan: IndexError = ScanError::PermissionDenied {
        path: PathBuf::from("/root/secret"),
    }
    .into();
    assert_eq!(scan.error_code(), error_code::SCAN_ERROR);

    let track: IndexError = TrackError::from(StorageError::LockPoisoned).into();
    assert_eq!(track.error_code(), error_code::STORAGE_ERROR);
}

#[test]
fn scan_error_exposes_offending_path() {
    let err = ScanError::IoError {
        path: PathBuf::from("/data/broken"),
        source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
    };
    assert_eq!(err.path(), std::path::Path::new("/data/broken"));
    assert!(err.to_string().contains("/data/broken"));
}
