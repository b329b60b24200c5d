use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Counters shared by every indexing task of a run
#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    files_indexed: Arc<AtomicU64>,
    files_unreadable: Arc<AtomicU64>,
    lines_scanned: Arc<AtomicU64>,
    bytes_scanned: Arc<AtomicU64>,
    occurrences_found: Arc<AtomicU64>,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            files_indexed: Arc::new(AtomicU64::new(0)),
            files_unreadable: Arc::new(AtomicU64::new(0)),
            lines_scanned: Arc::new(AtomicU64::new(0)),
            bytes_scanned: Arc::new(AtomicU64::new(0)),
            occurrences_found: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a file that was indexed to completion. Lines and bytes of a
    /// file that failed part way are never counted.
    pub fn record_file_indexed(&self, occurrences: u64, lines: u64, bytes: u64) {
        self.files_indexed.fetch_add(1, Ordering::Relaxed);
        self.occurrences_found
            .fetch_add(occurrences, Ordering::Relaxed);
        self.lines_scanned.fetch_add(lines, Ordering::Relaxed);
        self.bytes_scanned.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_file_unreadable(&self) {
        self.files_unreadable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            files_indexed: self.files_indexed.load(Ordering::Relaxed),
            files_unreadable: self.files_unreadable.load(Ordering::Relaxed),
            lines_scanned: self.lines_scanned.load(Ordering::Relaxed),
            bytes_scanned: self.bytes_scanned.load(Ordering::Relaxed),
            occurrences_found: self.occurrences_found.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Indexing stats:\n\
             Files indexed/unreadable: {}/{}\n\
             Lines scanned: {}\n\
             Bytes scanned: {}\n\
             Occurrences found: {}",
            stats.files_indexed,
            stats.files_unreadable,
            stats.lines_scanned,
            stats.bytes_scanned,
            stats.occurrences_found
        );
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`PipelineMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub files_indexed: u64,
    pub files_unreadable: u64,
    pub lines_scanned: u64,
    pub bytes_scanned: u64,
    pub occurrences_found: u64,
}
