//! Indexing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_DELETE_CHUNK_SIZE, DEFAULT_PROGRESS_INTERVAL_MS,
    DEFAULT_SNIFF_LEN,
};

/// Settings for indexing, rescanning, and progress reporting.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IndexConfig {
    /// Entries per write transaction. Default: 1000.
    pub batch_size: Option<usize>,
    /// Paths per bulk delete statement. Default: 1000.
    pub delete_chunk_size: Option<usize>,
    /// Minimum milliseconds between progress snapshots. Default: 1000.
    pub progress_interval_ms: Option<u64>,
    /// Bytes sniffed for content type detection. Default: 512.
    pub sniff_len: Option<usize>,
}

impl IndexConfig {
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }

    pub fn effective_delete_chunk_size(&self) -> usize {
        self.delete_chunk_size.unwrap_or(DEFAULT_DELETE_CHUNK_SIZE)
    }

    pub fn effective_progress_interval(&self) -> Duration {
        Duration::from_millis(
            self.progress_interval_ms
                .unwrap_or(DEFAULT_PROGRESS_INTERVAL_MS),
        )
    }

    pub fn effective_sniff_len(&self) -> usize {
        self.sniff_len.unwrap_or(DEFAULT_SNIFF_LEN)
    }
}
