//! Query modules for each concern of the catalog schema.
//!
//! Free functions over `&Connection`; pass a [`WriteTxn`](crate::WriteTxn)
//! (derefs to `Connection`) to run them inside a write transaction.

pub mod files;
pub mod filters;
pub mod stats;
pub mod tracked;
