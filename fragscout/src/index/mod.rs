//! Per-file occurrence indexes and the store they are published into.
//!
//! Phase one of a run turns every corpus file into a [`FileIndex`] (built by
//! [`FileIndexer`]) and hands it to the single [`IndexStore`] writer over a
//! channel. Phase two only ever reads the finished store.
pub mod indexer;
pub mod store;

pub use indexer::FileIndexer;
pub use store::{IndexCollector, IndexPublisher, IndexStore};

use serde::Serialize;

/// Where one occurrence starts: 1-based line number, 0-based byte column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub line: usize,
    pub column: usize,
}

/// Occurrences of one fragment within one file.
///
/// Only a single fragment is indexed per run, so the index holds one key: the
/// fragment it was built for. A lookup with any other text, or on an index with
/// no occurrences, finds nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceIndex {
    fragment: String,
    positions: Vec<Occurrence>,
}

impl OccurrenceIndex {
    /// An index for `fragment` with no occurrences
    pub fn empty(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            positions: Vec::new(),
        }
    }

    pub fn record(&mut self, line: usize, column: usize) {
        self.positions.push(Occurrence { line, column });
    }

    /// Occurrences recorded under `fragment`, if it is present as a key
    pub fn get(&self, fragment: &str) -> Option<&[Occurrence]> {
        if self.positions.is_empty() || self.fragment != fragment {
            None
        } else {
            Some(&self.positions)
        }
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Whether the indexer could read the file at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexStatus {
    Indexed,
    Unreadable(String),
}

/// What phase one publishes for a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIndex {
    pub index: OccurrenceIndex,
    pub status: IndexStatus,
}

impl FileIndex {
    pub fn indexed(index: OccurrenceIndex) -> Self {
        Self {
            index,
            status: IndexStatus::Indexed,
        }
    }

    /// Degraded entry for a file that could not be read: an empty index
    pub fn unreadable(fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            index: OccurrenceIndex::empty(fragment),
            status: IndexStatus::Unreadable(reason.into()),
        }
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self.status, IndexStatus::Unreadable(_))
    }
}
