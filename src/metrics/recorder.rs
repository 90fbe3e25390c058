//! Metrics recorder for diff operations

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::sync::delta::DeltaStats;

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    describe_counter!("chunkdiff_diffs_total", "Total number of diffs computed");
    describe_counter!(
        "chunkdiff_diffs_failed_total",
        "Total number of diffs aborted by a read failure"
    );
    describe_counter!(
        "chunkdiff_chunks_reused_total",
        "Chunks of updated files found in the original"
    );
    describe_counter!(
        "chunkdiff_chunks_changed_total",
        "Chunks of updated files not present in the original"
    );
    describe_counter!("chunkdiff_bytes_reused_total", "Bytes covered by reused chunks");
    describe_counter!("chunkdiff_bytes_changed_total", "Bytes covered by changed chunks");
    describe_counter!("chunkdiff_bytes_chunked_total", "Bytes scanned by the chunker");

    describe_histogram!(
        "chunkdiff_chunks_per_pass",
        "Number of chunks emitted by one chunking pass"
    );
    describe_histogram!(
        "chunkdiff_diff_duration_seconds",
        "Time to chunk and classify an updated file"
    );
}

/// Record one chunking pass
pub fn record_chunking_pass(bytes: usize, chunks: usize) {
    counter!("chunkdiff_bytes_chunked_total").increment(bytes as u64);
    histogram!("chunkdiff_chunks_per_pass").record(chunks as f64);
}

/// Record a completed diff
pub fn record_diff(stats: &DeltaStats, duration: Duration) {
    counter!("chunkdiff_diffs_total").increment(1);
    counter!("chunkdiff_chunks_reused_total").increment(stats.reused_chunks as u64);
    counter!("chunkdiff_chunks_changed_total").increment(stats.changed_chunks as u64);
    counter!("chunkdiff_bytes_reused_total").increment(stats.reused_bytes);
    counter!("chunkdiff_bytes_changed_total").increment(stats.changed_bytes);
    histogram!("chunkdiff_diff_duration_seconds").record(duration.as_secs_f64());
}

/// Record a diff aborted while reading one of its sources
pub fn record_diff_failed(side: &str) {
    counter!("chunkdiff_diffs_failed_total", "side" => side.to_string()).increment(1);
}

/// Times a diff and records it on completion
pub struct DiffTimer {
    start_time: Instant,
}

impl DiffTimer {
    pub fn start() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Stop timing and record the diff; returns the elapsed time
    pub fn finish(self, stats: &DeltaStats) -> Duration {
        let elapsed = self.start_time.elapsed();
        record_diff(stats, elapsed);
        elapsed
    }
}
