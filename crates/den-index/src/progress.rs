//! ProgressReporter: throttled `{done, total}` snapshots over a bounded
//! channel.
//!
//! Snapshots are never dropped: a full channel blocks the producer until
//! the consumer catches up. The channel closes when the reporter is
//! dropped, so the consumer sees closure on success and on failure alike.
//! Only [`ProgressReporter::finish`] sends the final `done == total`
//! snapshot.

use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};
use den_core::constants::PROGRESS_CHANNEL_CAPACITY;
use den_core::types::Progress;

/// Create a reporter and the receiving end of its stream.
pub fn progress_channel(interval: Duration) -> (ProgressReporter, Receiver<Progress>) {
    let (sender, receiver) = bounded(PROGRESS_CHANNEL_CAPACITY);
    (ProgressReporter::new(sender, interval), receiver)
}

pub struct ProgressReporter {
    sender: Sender<Progress>,
    interval: Duration,
    last_sent: Option<Instant>,
    current: Progress,
}

impl ProgressReporter {
    pub fn new(sender: Sender<Progress>, interval: Duration) -> Self {
        Self {
            sender,
            interval,
            last_sent: None,
            current: Progress::default(),
        }
    }

    /// A reporter nobody listens to.
    pub fn silent() -> Self {
        let (reporter, _receiver) = progress_channel(Duration::MAX);
        reporter
    }

    pub fn current(&self) -> Progress {
        self.current
    }

    /// Send the opening snapshot unconditionally.
    pub fn start(&mut self) {
        self.emit();
    }

    pub fn set_total(&mut self, total: u64) {
        self.current.total = total;
        self.tick();
    }

    pub fn add_total(&mut self, n: u64) {
        self.current.total += n;
        self.tick();
    }

    pub fn inc(&mut self, n: u64) {
        self.current.done += n;
        self.tick();
    }

    /// Send the closing `done == total` snapshot and close the stream.
    /// A total that was only an estimate is clamped to what was done, and
    /// vice versa.
    pub fn finish(mut self) {
        let end = self.current.done.max(self.current.total);
        self.current = Progress::new(end, end);
        self.emit();
    }

    fn tick(&mut self) {
        let due = self
            .last_sent
            .map_or(true, |at| at.elapsed() >= self.interval);
        if due {
            self.emit();
        }
    }

    fn emit(&mut self) {
        let snapshot = Progress::new(
            self.current.done,
            self.current.total.max(self.current.done),
        );
        // A vanished consumer is not an error for the producer.
        let _ = self.sender.send(snapshot);
        self.last_sent = Some(Instant::now());
    }
}
