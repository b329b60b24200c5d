//! The two-phase search pipeline.
//!
//! A run over a corpus of `n` files goes through:
//!
//! 1. **Index phase**: `n` tasks on the worker pool, each scanning one file
//!    with [`FileIndexer`](crate::index::FileIndexer) and sending the finished
//!    index to the [`IndexStore`](crate::index::IndexStore) collector.
//! 2. **Barrier**: the scheduler waits until every task has published.
//! 3. **Query phase**: `n` tasks on the same pool, each running a
//!    [`QueryEngine`] lookup and writing the result into its own slot of a
//!    [`ResultAggregator`](crate::results::ResultAggregator).
//!
//! ```rust,ignore
//! let scheduler = Scheduler::new(4)?;
//! let report = scheduler.run("abc", &files)?;
//! for result in &report.results {
//!     // same order as `files`
//! }
//! ```
pub mod engine;
pub mod matcher;
pub mod query;

pub use engine::{search, Scheduler};
pub use matcher::{count_overlapping, overlapping_matches};
pub use query::QueryEngine;
