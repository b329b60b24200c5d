/// Error types for fragscout.
///
/// Two kinds of failure exist and they travel differently:
///
/// 1. **Run-level failures** (bad configuration, an out-of-range worker count,
///    a thread pool that cannot be built) are returned as `Err` before any
///    file is touched.
/// 2. **Per-file failures** (a corpus file that is missing or unreadable) never
///    leave the task that hit them. The indexer logs them and degrades that
///    file to an empty index; the message is kept on the file's result so the
///    report can tell "unreadable" apart from "fragment absent".
///
/// ```rust,ignore
/// match scheduler.run("abc", &files) {
///     Ok(report) => // every file has a result, unreadable ones included,
///     Err(SearchError::ThreadPool(msg)) => // the pool could not start,
///     Err(e) => // other run-level failure
/// }
/// ```
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while indexing or searching the corpus
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Fragment must not be empty")]
    EmptyFragment,
    #[error("Invalid worker count: {count} (expected {min}..={max})")]
    InvalidWorkerCount { count: usize, min: usize, max: usize },
    #[error("No result was produced for corpus position {0}")]
    UnfilledSlot(usize),
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SearchError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn invalid_worker_count(count: usize, min: usize, max: usize) -> Self {
        Self::InvalidWorkerCount { count, min, max }
    }

    pub fn thread_pool(msg: impl Into<String>) -> Self {
        Self::ThreadPool(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Classifies an I/O error raised while opening or reading `path`
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::file_not_found(path),
            io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}

impl From<config::ConfigError> for SearchError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
