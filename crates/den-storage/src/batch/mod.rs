//! Batched inserts: bounded write transactions for large runs.

pub mod writer;

pub use writer::{BatchStats, BatchWriter};
