//! Error handling for den.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod index_error;
pub mod scan_error;
pub mod storage_error;
pub mod track_error;

pub use config_error::ConfigError;
pub use error_code::DenErrorCode;
pub use index_error::{IndexError, IndexResult};
pub use scan_error::ScanError;
pub use storage_error::StorageError;
pub use track_error::TrackError;
