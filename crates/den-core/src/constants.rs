//! Shared constants.

/// Entries written per transaction during large indexing runs.
pub const DEFAULT_BATCH_SIZE: usize = 1_000;

/// Paths bound per `DELETE ... IN (...)` statement.
pub const DEFAULT_DELETE_CHUNK_SIZE: usize = 1_000;

/// Minimum wall-clock gap between two progress snapshots.
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 1_000;

/// Bytes read from the start of a file for content sniffing.
pub const DEFAULT_SNIFF_LEN: usize = 512;

/// Default number of read-only connections.
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// Upper bound on read-only connections per store.
pub const MAX_READ_POOL_SIZE: usize = 8;

/// Schema version written by the newest migration.
pub const SCHEMA_VERSION: u32 = 1;

/// Media at or above this many seconds counts as "long" in statistics.
pub const LONG_MEDIA_SECONDS: i64 = 600;

/// Maximum authors listed by the author statistics query.
pub const AUTHOR_STATS_LIMIT: usize = 9;

/// Capacity of the bounded progress channel.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 16;
