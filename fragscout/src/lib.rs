pub mod config;
pub mod errors;
pub mod index;
pub mod metrics;
pub mod results;
pub mod scanner;
pub mod search;

pub use config::{CliOverrides, IndexSearchConfig, MAX_WORKERS, MIN_WORKERS};
pub use errors::{SearchError, SearchResult};
pub use results::{Outcome, QueryResult, SearchReport};
pub use search::{search, Scheduler};
