//! Indexing and reconciliation engine for the den file catalog.
//!
//! - [`walker`]: lazy, depth-first enumeration of regular, non-hidden files.
//! - [`classify`]: content sniffing, MIME refinement, category mapping, media metadata.
//! - [`reconcile`]: stored-vs-walked diff producing delete and reindex sets.
//! - [`progress`]: throttled `{done, total}` snapshots over a bounded channel.
//! - [`indexer`] / [`rescanner`]: the top-level operations composing the above
//!   with `den-storage`.

pub mod classify;
pub mod hidden;
pub mod indexer;
pub mod progress;
pub mod reconcile;
pub mod rescanner;
pub mod times;
pub mod walker;

pub use classify::{Classifier, ExifSource, MediaSource, NoMediaSource, StreamReport};
pub use indexer::{list_tracked, open_catalog, track_and_index, untrack, IndexSettings, IndexSummary};
pub use progress::{progress_channel, ProgressReporter};
pub use reconcile::{reconcile, Reconciliation};
pub use rescanner::{rescan, RescanSummary};
pub use walker::{DirectoryWalker, WalkedFile};
