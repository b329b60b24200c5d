use std::path::Path;
use std::time::Instant;
use tracing::debug;

use crate::index::{FileIndex, IndexStatus};
use crate::results::{Outcome, QueryResult};

/// Answers "does the fragment occur in this file, and how often" from a
/// published index
#[derive(Debug, Clone)]
pub struct QueryEngine {
    fragment: String,
}

impl QueryEngine {
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
        }
    }

    /// Looks the fragment up in `entry`. Only the index access is timed. The
    /// worker id is the current rayon pool index, or 0 off-pool.
    pub fn query(&self, file: &Path, entry: &FileIndex) -> QueryResult {
        let worker_id = rayon::current_thread_index().unwrap_or_default();

        let start = Instant::now();
        let hits = entry.index.get(&self.fragment);
        let duration = start.elapsed();

        let (found, count) = match hits {
            Some(positions) => (true, positions.len()),
            None => (false, 0),
        };
        let outcome = match (&entry.status, found) {
            (IndexStatus::Unreadable(reason), _) => Outcome::Unreadable {
                reason: reason.clone(),
            },
            (IndexStatus::Indexed, true) => Outcome::Found,
            (IndexStatus::Indexed, false) => Outcome::Absent,
        };

        debug!(
            "Worker {} looked up {}: found={} count={}",
            worker_id,
            file.display(),
            found,
            count
        );

        QueryResult {
            file: file.to_path_buf(),
            found,
            count,
            duration,
            worker_id,
            outcome,
            occurrences: hits.map(<[_]>::to_vec).unwrap_or_default(),
        }
    }
}
