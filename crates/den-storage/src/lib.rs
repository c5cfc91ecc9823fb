//! SQLite persistence for the den catalog.
//!
//! One serialized writer connection guarded by an explicit write lock,
//! a pool of read-only connections, `user_version` migrations, a
//! batching writer for large runs, and per-table query modules.

pub mod batch;
pub mod connection;
pub mod migrations;
pub mod queries;

pub use batch::{BatchStats, BatchWriter};
pub use connection::{CatalogStore, WriteTxn};
pub use queries::files::InsertOutcome;
