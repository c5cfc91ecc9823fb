//! Storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_READ_POOL_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Catalog database file. Default: `~/.local/share/den/db.sqlite3`.
    pub database_path: Option<PathBuf>,
    /// Read-only connections kept open next to the writer. Default: 4.
    pub read_pool_size: Option<usize>,
}

impl StorageConfig {
    /// Returns the effective database path, or `None` when neither the
    /// config nor the environment provides a home directory.
    pub fn effective_database_path(&self) -> Option<PathBuf> {
        self.database_path
            .clone()
            .or_else(|| super::den_config::home_dir().map(|h| default_database_path(&h)))
    }

    pub fn effective_read_pool_size(&self) -> usize {
        self.read_pool_size.unwrap_or(DEFAULT_READ_POOL_SIZE)
    }
}

fn default_database_path(home: &std::path::Path) -> PathBuf {
    home.join(".local").join("share").join("den").join("db.sqlite3")
}
