//! Shared domain types.

pub mod catalog;
pub mod collections;
pub mod progress;

pub use catalog::{path_key, CatalogEntry, Category, Extension, StoredFileState};
pub use progress::Progress;
