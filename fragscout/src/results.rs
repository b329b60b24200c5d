/// Result types for a fragment search run.
///
/// A run produces one [`QueryResult`] per corpus file. Results are gathered by
/// a [`ResultAggregator`] that is sized to the corpus before the query phase
/// starts; each query task owns exactly one slot (its file's input position),
/// so the final order is the input order no matter which task finishes first.
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{SearchError, SearchResult};
use crate::index::Occurrence;
use crate::metrics::PipelineStats;

/// How a file's lookup ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Found,
    /// The file was read and the fragment does not occur in it
    Absent,
    /// The file could not be read; reported as not found with a zero count
    Unreadable { reason: String },
}

/// The lookup result for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub file: PathBuf,
    pub found: bool,
    pub count: usize,
    /// Time spent on the index lookup alone
    pub duration: Duration,
    /// Pool index of the worker that ran the lookup
    pub worker_id: usize,
    pub outcome: Outcome,
    pub occurrences: Vec<Occurrence>,
}

impl QueryResult {
    pub fn is_unreadable(&self) -> bool {
        matches!(self.outcome, Outcome::Unreadable { .. })
    }
}

/// Positional collector for the query phase
#[derive(Debug)]
pub struct ResultAggregator {
    slots: Vec<Option<QueryResult>>,
}

impl ResultAggregator {
    /// One empty slot per corpus file
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Fills every slot in parallel on the current rayon pool. Slot `i` is
    /// written once, by the task that computed `fill(i)`.
    pub fn par_fill<F>(&mut self, fill: F)
    where
        F: Fn(usize) -> QueryResult + Sync + Send,
    {
        self.slots
            .par_iter_mut()
            .enumerate()
            .for_each(|(position, slot)| *slot = Some(fill(position)));
    }

    /// The results in input order
    pub fn into_results(self) -> SearchResult<Vec<QueryResult>> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(position, slot)| slot.ok_or(SearchError::UnfilledSlot(position)))
            .collect()
    }
}

/// Totals over a run's results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub files_searched: usize,
    pub files_with_matches: usize,
    pub files_unreadable: usize,
    pub total_occurrences: usize,
}

impl ReportSummary {
    pub fn from_results(results: &[QueryResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            summary.files_searched += 1;
            if result.found {
                summary.files_with_matches += 1;
                summary.total_occurrences += result.count;
            }
            if result.is_unreadable() {
                summary.files_unreadable += 1;
            }
            summary
        })
    }
}

/// Everything a run hands to the report printer
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub fragment: String,
    pub worker_count: usize,
    pub results: Vec<QueryResult>,
    pub summary: ReportSummary,
    pub stats: PipelineStats,
}

impl SearchReport {
    pub fn new(
        fragment: impl Into<String>,
        worker_count: usize,
        results: Vec<QueryResult>,
        stats: PipelineStats,
    ) -> Self {
        let summary = ReportSummary::from_results(&results);
        Self {
            fragment: fragment.into(),
            worker_count,
            results,
            summary,
            stats,
        }
    }

    pub fn to_json(&self) -> SearchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(file: &str, count: usize, outcome: Outcome) -> QueryResult {
        QueryResult {
            file: PathBuf::from(file),
            found: count > 0,
            count,
            duration: Duration::from_nanos(100),
            worker_id: 0,
            outcome,
            occurrences: vec![],
        }
    }

    #[test]
    fn test_aggregator_keeps_input_order() {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap();
        let mut aggregator = ResultAggregator::new(50);

        pool.install(|| {
            aggregator.par_fill(|i| {
                // Later positions finish first
                std::thread::sleep(Duration::from_micros((50 - i as u64) * 20));
                result(&format!("f{}.txt", i), i, Outcome::Found)
            })
        });

        let results = aggregator.into_results().unwrap();
        assert_eq!(results.len(), 50);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.file, PathBuf::from(format!("f{}.txt", i)));
            assert_eq!(r.count, i);
        }
    }

    #[test]
    fn test_unfilled_aggregator_is_an_error() {
        let aggregator = ResultAggregator::new(2);
        assert!(matches!(
            aggregator.into_results(),
            Err(SearchError::UnfilledSlot(0))
        ));
    }

    #[test]
    fn test_empty_aggregator() {
        let aggregator = ResultAggregator::new(0);
        assert!(aggregator.is_empty());
        assert!(aggregator.into_results().unwrap().is_empty());
    }

    #[test]
    fn test_summary_totals() {
        let results = vec![
            result("a.txt", 2, Outcome::Found),
            result("b.txt", 0, Outcome::Absent),
            result(
                "c.txt",
                0,
                Outcome::Unreadable {
                    reason: "File not found: c.txt".to_string(),
                },
            ),
            result("d.txt", 5, Outcome::Found),
        ];

        let summary = ReportSummary::from_results(&results);
        assert_eq!(summary.files_searched, 4);
        assert_eq!(summary.files_with_matches, 2);
        assert_eq!(summary.files_unreadable, 1);
        assert_eq!(summary.total_occurrences, 7);
    }

    #[test]
    fn test_report_json() {
        let report = SearchReport::new(
            "abc",
            2,
            vec![result("a.txt", 1, Outcome::Found)],
            PipelineStats::default(),
        );
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["fragment"], "abc");
        assert_eq!(value["results"][0]["count"], 1);
        assert_eq!(value["results"][0]["outcome"]["kind"], "found");
        assert_eq!(value["summary"]["files_with_matches"], 1);
    }
}
