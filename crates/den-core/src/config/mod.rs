//! Configuration system for den.
//! TOML-based, layered resolution: CLI > env > explicit file > user > defaults.

pub mod den_config;
pub mod index_config;
pub mod storage_config;

pub use den_config::{CliOverrides, DenConfig};
pub use index_config::IndexConfig;
pub use storage_config::StorageConfig;
