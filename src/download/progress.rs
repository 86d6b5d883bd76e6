//! Progress reporting seam for downloads.
//!
//! The library reports byte progress through [`ProgressSink`] and stays
//! renderer-agnostic; the CLI plugs in an indicatif bar, tests plug in
//! counters.

/// Receiver for byte-level download progress.
///
/// `begin` is called once before the first chunk with the declared total,
/// `advance` once per non-empty chunk, and `finish` once after the final
/// chunk is flushed. A download skipped because the file is already on disk
/// emits no events at all.
pub trait ProgressSink: Send + Sync {
    /// Called once with the declared total size in bytes (0 when the server
    /// sent no content length).
    fn begin(&self, total_bytes: u64);

    /// Called after each non-empty chunk with that chunk's byte count.
    fn advance(&self, delta_bytes: u64);

    /// Called once when the file is fully written and flushed.
    fn finish(&self);
}

/// [`ProgressSink`] that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn begin(&self, _total_bytes: u64) {}
    fn advance(&self, _delta_bytes: u64) {}
    fn finish(&self) {}
}
