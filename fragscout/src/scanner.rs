use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::errors::{SearchError, SearchResult};

const BUFFER_CAPACITY: usize = 65536;

/// Lines of one file, terminators stripped. Read errors surface per item.
pub type Lines<'a> = Box<dyn Iterator<Item = io::Result<Vec<u8>>> + Send + 'a>;

/// Source of file lines for the indexer.
///
/// Every call to [`LineScanner::scan`] starts again from the first line, so a
/// file can be scanned as many times as needed. Failing to open a file is an
/// `Err`, never a panic.
pub trait LineScanner: Send + Sync {
    fn scan(&self, path: &Path) -> SearchResult<Lines<'_>>;
}

/// Reads lines from the filesystem through a buffered reader
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLineScanner;

impl LineScanner for FsLineScanner {
    fn scan(&self, path: &Path) -> SearchResult<Lines<'_>> {
        trace!("Opening {} for scanning", path.display());
        let file = File::open(path).map_err(|e| SearchError::from_io(path, e))?;
        let reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        Ok(Box::new(reader.split(b'\n').map(|line| {
            line.map(|mut bytes| {
                if bytes.last() == Some(&b'\r') {
                    bytes.pop();
                }
                bytes
            })
        })))
    }
}

/// In-memory corpus, keyed by file identifier. Unknown identifiers behave
/// like missing files.
#[derive(Debug, Default, Clone)]
pub struct MemoryLineScanner {
    files: HashMap<PathBuf, String>,
}

impl MemoryLineScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl LineScanner for MemoryLineScanner {
    fn scan(&self, path: &Path) -> SearchResult<Lines<'_>> {
        let contents = self
            .files
            .get(path)
            .ok_or_else(|| SearchError::file_not_found(path))?;
        Ok(Box::new(
            contents
                .lines()
                .map(|line| Ok::<_, io::Error>(line.as_bytes().to_vec())),
        ))
    }
}
