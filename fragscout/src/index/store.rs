use crossbeam_channel::{Receiver, Sender};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::FileIndex;

/// A finished index on its way to the store
#[derive(Debug)]
struct Publication {
    file: PathBuf,
    entry: FileIndex,
}

/// File identifier → occurrence index for every file of the corpus.
///
/// The store has exactly one writer. Indexing tasks never touch it; they send
/// their results through an [`IndexPublisher`] and the [`IndexCollector`] applies
/// them in arrival order. Once [`IndexCollector::collect`] returns, every
/// publisher is gone and the store is only read.
#[derive(Debug, Default)]
pub struct IndexStore {
    entries: HashMap<PathBuf, FileIndex>,
}

impl IndexStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Inserts the entry for `file`, returning the one it replaced
    pub fn publish(&mut self, file: PathBuf, entry: FileIndex) -> Option<FileIndex> {
        self.entries.insert(file, entry)
    }

    pub fn lookup(&self, file: &Path) -> Option<&FileIndex> {
        self.entries.get(file)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Creates the publisher/collector pair for filling a new store
    pub fn channel(capacity: usize) -> (IndexPublisher, IndexCollector) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (
            IndexPublisher { tx },
            IndexCollector {
                rx,
                store: IndexStore::with_capacity(capacity),
            },
        )
    }
}

/// Sending half handed to indexing tasks; clone one per task
#[derive(Debug, Clone)]
pub struct IndexPublisher {
    tx: Sender<Publication>,
}

impl IndexPublisher {
    pub fn publish(&self, file: PathBuf, entry: FileIndex) {
        if let Err(e) = self.tx.send(Publication { file, entry }) {
            // Only possible once the collector is gone, i.e. the run is over.
            warn!("Dropped index for {}: collector closed", e.0.file.display());
        }
    }
}

/// Single writer of an [`IndexStore`]
#[derive(Debug)]
pub struct IndexCollector {
    rx: Receiver<Publication>,
    store: IndexStore,
}

impl IndexCollector {
    /// Applies publications until every [`IndexPublisher`] has been dropped,
    /// then hands back the finished store.
    pub fn collect(mut self) -> IndexStore {
        for Publication { file, entry } in self.rx.iter() {
            debug!("Published index for {}", file.display());
            if self.store.publish(file, entry).is_some() {
                debug!("Corpus lists a file more than once; kept the latest index");
            }
        }
        self.store
    }
}
