//! File timestamps as unix seconds, and the creation-time guess.

use std::fs::Metadata;
use std::time::{SystemTime, UNIX_EPOCH};

/// Whole unix seconds, rounded toward negative infinity.
pub fn unix_secs(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        Err(e) => {
            let before = e.duration();
            let secs = i64::try_from(before.as_secs()).unwrap_or(i64::MAX);
            if before.subsec_nanos() > 0 {
                -secs - 1
            } else {
                -secs
            }
        }
    }
}

/// Earliest of the available birth, change, and modification times.
/// Modification time is always a candidate.
pub fn guess_created(birth: Option<i64>, changed: Option<i64>, modified: i64) -> i64 {
    [birth, changed].into_iter().flatten().fold(modified, i64::min)
}

pub fn modified_secs(metadata: &Metadata) -> i64 {
    metadata.modified().map(unix_secs).unwrap_or(0)
}

#[cfg(unix)]
fn change_secs(metadata: &Metadata) -> Option<i64> {
    use std::os::unix::fs::MetadataExt;
    Some(metadata.ctime())
}

#[cfg(not(unix))]
fn change_secs(_metadata: &Metadata) -> Option<i64> {
    None
}

/// Creation-time guess for a file from whatever the platform exposes.
pub fn created_guess(metadata: &Metadata) -> i64 {
    let birth = metadata.created().ok().map(unix_secs);
    guess_created(birth, change_secs(metadata), modified_secs(metadata))
}
