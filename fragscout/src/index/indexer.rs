use std::path::Path;
use std::sync::Arc;
use tracing::{trace, warn};

use super::{FileIndex, OccurrenceIndex};
use crate::errors::{SearchError, SearchResult};
use crate::metrics::PipelineMetrics;
use crate::scanner::LineScanner;
use crate::search::matcher::overlapping_matches;

/// Index of one file plus the volume read to build it
struct ScannedFile {
    index: OccurrenceIndex,
    lines: u64,
    bytes: u64,
}

/// Builds the occurrence index of one fragment for one file at a time
#[derive(Clone)]
pub struct FileIndexer {
    scanner: Arc<dyn LineScanner>,
    fragment: String,
    metrics: PipelineMetrics,
}

impl FileIndexer {
    pub fn new(scanner: Arc<dyn LineScanner>, fragment: impl Into<String>) -> Self {
        Self {
            scanner,
            fragment: fragment.into(),
            metrics: PipelineMetrics::new(),
        }
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    /// Indexes `path`. A file that cannot be opened or read is logged and
    /// comes back as an empty, unreadable entry; any partial index is dropped.
    pub fn index_file(&self, path: &Path) -> FileIndex {
        match self.build_index(path) {
            Ok(scanned) => {
                self.metrics.record_file_indexed(
                    scanned.index.count() as u64,
                    scanned.lines,
                    scanned.bytes,
                );
                FileIndex::indexed(scanned.index)
            }
            Err(e) => {
                warn!("Failed to index {}: {}", path.display(), e);
                self.metrics.record_file_unreadable();
                FileIndex::unreadable(self.fragment.as_str(), e.to_string())
            }
        }
    }

    fn build_index(&self, path: &Path) -> SearchResult<ScannedFile> {
        let mut scanned = ScannedFile {
            index: OccurrenceIndex::empty(self.fragment.as_str()),
            lines: 0,
            bytes: 0,
        };
        let fragment = self.fragment.as_bytes();

        for (i, line) in self.scanner.scan(path)?.enumerate() {
            let bytes = line.map_err(|e| SearchError::from_io(path, e))?;
            scanned.lines += 1;
            scanned.bytes += bytes.len() as u64;

            for column in overlapping_matches(&bytes, fragment) {
                scanned.index.record(i + 1, column);
            }
        }

        trace!(
            "Indexed {}: {} occurrence(s) of {:?} over {} line(s)",
            path.display(),
            scanned.index.count(),
            self.fragment,
            scanned.lines
        );
        Ok(scanned)
    }
}

impl std::fmt::Debug for FileIndexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileIndexer")
            .field("fragment", &self.fragment)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexStatus, Occurrence};
    use crate::scanner::{FsLineScanner, Lines, MemoryLineScanner};
    use std::io;
    use tempfile::tempdir;

    fn memory_indexer(fragment: &str, files: &[(&str, &str)]) -> FileIndexer {
        let scanner = files
            .iter()
            .fold(MemoryLineScanner::new(), |s, (name, contents)| {
                s.with_file(*name, *contents)
            });
        FileIndexer::new(Arc::new(scanner), fragment)
    }

    /// Yields its lines, then fails the read
    struct FailingScanner {
        lines: Vec<&'static str>,
    }

    impl LineScanner for FailingScanner {
        fn scan(&self, _path: &Path) -> SearchResult<Lines<'_>> {
            let lines = self
                .lines
                .iter()
                .map(|l| Ok::<_, io::Error>(l.as_bytes().to_vec()));
            let failure = std::iter::once(Err(io::Error::new(
                io::ErrorKind::Other,
                "device went away",
            )));
            Ok(Box::new(lines.chain(failure)))
        }
    }

    #[test]
    fn test_counts_overlapping_occurrences() {
        let indexer = memory_indexer("aa", &[("a.txt", "aaa")]);
        let entry = indexer.index_file(Path::new("a.txt"));
        assert_eq!(entry.status, IndexStatus::Indexed);
        assert_eq!(entry.index.count(), 2);
    }

    #[test]
    fn test_records_positions_per_line() {
        let indexer = memory_indexer("abc", &[("a.txt", "abcabc\nxyz\n  abc")]);
        let entry = indexer.index_file(Path::new("a.txt"));
        assert_eq!(
            entry.index.get("abc").unwrap(),
            &[
                Occurrence { line: 1, column: 0 },
                Occurrence { line: 1, column: 3 },
                Occurrence { line: 3, column: 2 },
            ]
        );
    }

    #[test]
    fn test_no_match_across_lines() {
        let indexer = memory_indexer("ab", &[("a.txt", "xa\nbx")]);
        assert_eq!(indexer.index_file(Path::new("a.txt")).index.count(), 0);
    }

    #[test]
    fn test_fragment_longer_than_every_line() {
        let indexer = memory_indexer("abcdefgh", &[("a.txt", "abc\nabcdefg\n")]);
        let entry = indexer.index_file(Path::new("a.txt"));
        assert_eq!(entry.status, IndexStatus::Indexed);
        assert_eq!(entry.index.count(), 0);
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let indexer = memory_indexer("abc", &[]);
        let entry = indexer.index_file(Path::new("missing.txt"));
        assert!(entry.is_unreadable());
        assert_eq!(entry.index.count(), 0);
        assert_eq!(indexer.metrics().get_stats().files_unreadable, 1);
    }

    #[test]
    fn test_indexing_is_deterministic() {
        let indexer = memory_indexer("ab", &[("a.txt", "abab ab\nbaba\nab")]);
        let first = indexer.index_file(Path::new("a.txt"));
        let second = indexer.index_file(Path::new("a.txt"));
        assert_eq!(first, second);
        assert_eq!(first.index.count(), 5);
    }

    #[test]
    fn test_non_utf8_file_is_indexed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cp1251.txt");
        // "привет abc abc" in cp1251, then a line of invalid UTF-8
        std::fs::write(&path, b"\xef\xf0\xe8\xe2\xe5\xf2 abc abc\n\xff\xfeabc\n").unwrap();

        let indexer = FileIndexer::new(Arc::new(FsLineScanner), "abc");
        let entry = indexer.index_file(&path);
        assert_eq!(entry.status, IndexStatus::Indexed);
        assert_eq!(
            entry.index.get("abc").unwrap(),
            &[
                Occurrence { line: 1, column: 7 },
                Occurrence { line: 1, column: 11 },
                Occurrence { line: 2, column: 2 },
            ]
        );
    }

    #[test]
    fn test_metrics_count_completed_files_only() {
        let indexer = memory_indexer("ab", &[("ok.txt", "ab\nxab")]);
        indexer.index_file(Path::new("ok.txt"));

        let failing = FileIndexer {
            scanner: Arc::new(FailingScanner {
                lines: vec!["ab ab", "abab"],
            }),
            ..indexer.clone()
        };
        let entry = failing.index_file(Path::new("broken.txt"));
        assert!(entry.is_unreadable());
        assert_eq!(entry.index.count(), 0);

        let stats = indexer.metrics().get_stats();
        assert_eq!(stats.files_indexed, 1);
        assert_eq!(stats.files_unreadable, 1);
        assert_eq!(stats.lines_scanned, 2);
        assert_eq!(stats.bytes_scanned, 5);
        assert_eq!(stats.occurrences_found, 2);
    }
}
