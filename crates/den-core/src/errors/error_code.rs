//! DenErrorCode trait for machine-readable error codes.

/// Every error enum implements this to expose a stable code string
/// for front ends that need to branch on the failure kind.
pub trait DenErrorCode {
    /// Returns the error code string (e.g., "SCAN_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const UNKNOWN_SCHEMA: &str = "UNKNOWN_SCHEMA";
pub const PATH_NOT_FOUND: &str = "PATH_NOT_FOUND";
pub const ROOT_OVERLAP: &str = "ROOT_OVERLAP";
pub const NOT_TRACKED: &str = "NOT_TRACKED";
pub const INDEX_ERROR: &str = "INDEX_ERROR";
