//! Core types, errors, configuration, tracing, and constants for the den catalog.
//! Shared by `den-storage` and `den-index`.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;
