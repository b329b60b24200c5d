use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::query::QueryEngine;
use crate::config::{IndexSearchConfig, MAX_WORKERS, MIN_WORKERS};
use crate::errors::{SearchError, SearchResult};
use crate::index::{FileIndex, FileIndexer, IndexStore};
use crate::results::{QueryResult, ResultAggregator, SearchReport};
use crate::scanner::{FsLineScanner, LineScanner};

/// Runs a search from a configuration: validates it, builds a [`Scheduler`]
/// over the filesystem and runs both phases over the resolved corpus.
pub fn search(config: &IndexSearchConfig) -> SearchResult<SearchReport> {
    config.validate()?;
    let scheduler = Scheduler::new(config.worker_count)?;
    scheduler.run(&config.fragment, &config.resolved_files())
}

/// Drives a fixed-size worker pool through the index phase and the query
/// phase of a run.
///
/// The same pool serves both phases. The query phase never starts before
/// every indexing task has published its entry.
pub struct Scheduler {
    pool: ThreadPool,
    worker_count: usize,
    scanner: Arc<dyn LineScanner>,
}

impl Scheduler {
    /// A scheduler reading the corpus from the filesystem
    pub fn new(worker_count: usize) -> SearchResult<Self> {
        Self::with_scanner(worker_count, Arc::new(FsLineScanner))
    }

    /// A scheduler reading the corpus through `scanner`
    pub fn with_scanner(worker_count: usize, scanner: Arc<dyn LineScanner>) -> SearchResult<Self> {
        if !(MIN_WORKERS..=MAX_WORKERS).contains(&worker_count) {
            return Err(SearchError::invalid_worker_count(
                worker_count,
                MIN_WORKERS,
                MAX_WORKERS,
            ));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|i| format!("fragscout-worker-{}", i))
            .build()
            .map_err(|e| SearchError::thread_pool(e.to_string()))?;

        Ok(Self {
            pool,
            worker_count,
            scanner,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Indexes every file in `files`, then looks `fragment` up in each index.
    /// Results come back in the order of `files`.
    pub fn run(&self, fragment: &str, files: &[PathBuf]) -> SearchResult<SearchReport> {
        if fragment.is_empty() {
            return Err(SearchError::EmptyFragment);
        }
        info!(
            "Searching {} file(s) for {:?} with {} workers",
            files.len(),
            fragment,
            self.worker_count
        );

        let indexer = FileIndexer::new(Arc::clone(&self.scanner), fragment);
        let store = self.index_phase(&indexer, files);
        indexer.metrics().log_stats();

        let engine = QueryEngine::new(fragment);
        let results = self.query_phase(&engine, &store, files)?;

        let report = SearchReport::new(
            fragment,
            self.worker_count,
            results,
            indexer.metrics().get_stats(),
        );
        info!(
            "Search complete. Found {} occurrence(s) in {} of {} file(s)",
            report.summary.total_occurrences,
            report.summary.files_with_matches,
            report.summary.files_searched
        );
        Ok(report)
    }

    /// Phase one: one indexing task per file. Each task builds its index
    /// locally and sends it to the store's single writer. Returns once every
    /// task has published.
    pub fn index_phase(&self, indexer: &FileIndexer, files: &[PathBuf]) -> IndexStore {
        let (publisher, collector) = IndexStore::channel(files.len());

        self.pool.scope(|s| {
            for file in files {
                let publisher = publisher.clone();
                s.spawn(move |_| {
                    let entry = indexer.index_file(file);
                    debug!(
                        "Worker {} built the index for {}",
                        rayon::current_thread_index().unwrap_or_default(),
                        file.display()
                    );
                    publisher.publish(file.clone(), entry);
                });
            }
        });
        drop(publisher);

        let store = collector.collect();
        info!("Index phase complete: {} file(s) published", store.len());
        store
    }

    /// Phase two: one lookup task per file, each writing the slot at its
    /// file's input position.
    pub fn query_phase(
        &self,
        engine: &QueryEngine,
        store: &IndexStore,
        files: &[PathBuf],
    ) -> SearchResult<Vec<QueryResult>> {
        let mut aggregator = ResultAggregator::new(files.len());

        self.pool.install(|| {
            aggregator.par_fill(|position| {
                let file = &files[position];
                match store.lookup(file) {
                    Some(entry) => engine.query(file, entry),
                    None => unpublished(engine, file),
                }
            })
        });

        aggregator.into_results()
    }
}

/// Only reachable if a file skipped the index phase
fn unpublished(engine: &QueryEngine, file: &Path) -> QueryResult {
    error!("No index was published for {}", file.display());
    let entry = FileIndex::unreadable("", "no index was published for this file");
    engine.query(file, &entry)
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("worker_count", &self.worker_count)
            .finish_non_exhaustive()
    }
}
