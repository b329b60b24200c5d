use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{SearchError, SearchResult};

/// Smallest worker pool the scheduler accepts
pub const MIN_WORKERS: usize = 2;
/// Largest worker pool the scheduler accepts
pub const MAX_WORKERS: usize = 10;

/// Number of files in the default corpus (`source1.txt` .. `source10.txt`)
const DEFAULT_CORPUS_SIZE: usize = 10;

/// Configuration for an indexing + lookup run.
///
/// # Configuration Locations
///
/// Loaded from, in increasing order of precedence:
/// 1. Global `$CONFIG_DIR/fragscout/config.yaml`
/// 2. Local `.fragscout.yaml` in the current directory
/// 3. A file given explicitly (the CLI's `--config` flag)
///
/// Command-line values are merged on top with [`IndexSearchConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// # Fragment to count (may contain any characters)
/// fragment: "abc"
///
/// # Corpus, resolved against root_path, in report order
/// files:
///   - "source1.txt"
///   - "source2.txt"
///
/// root_path: "."
///
/// # Worker pool size, 2..=10
/// worker_count: 4
///
/// log_level: "info"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSearchConfig {
    /// The fragment to index and look up
    #[serde(default)]
    pub fragment: String,

    /// Corpus file identifiers, in the order results are reported
    #[serde(default = "default_files")]
    pub files: Vec<PathBuf>,

    /// Directory the corpus identifiers are resolved against
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Size of the worker pool shared by both phases
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Values supplied on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub fragment: Option<String>,
    pub files: Vec<PathBuf>,
    pub root_path: Option<PathBuf>,
    pub worker_count: Option<usize>,
    pub log_level: Option<String>,
}

fn default_files() -> Vec<PathBuf> {
    (1..=DEFAULT_CORPUS_SIZE)
        .map(|i| PathBuf::from(format!("source{}.txt", i)))
        .collect()
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_worker_count() -> usize {
    num_cpus::get().clamp(MIN_WORKERS, MAX_WORKERS)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for IndexSearchConfig {
    fn default() -> Self {
        Self {
            fragment: String::new(),
            files: default_files(),
            root_path: default_root_path(),
            worker_count: default_worker_count(),
            log_level: default_log_level(),
        }
    }
}

impl IndexSearchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> SearchResult<Self> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus an explicit file
    pub fn load_from(config_path: Option<&Path>) -> SearchResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let defaults = [
            dirs::config_dir().map(|p| p.join("fragscout/config.yaml")),
            Some(PathBuf::from(".fragscout.yaml")),
        ];
        for path in defaults.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(SearchError::config_error(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(fragment) = cli.fragment {
            self.fragment = fragment;
        }
        if !cli.files.is_empty() {
            self.files = cli.files;
        }
        if let Some(root) = cli.root_path {
            self.root_path = root;
        }
        if let Some(count) = cli.worker_count {
            self.worker_count = count;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }

    /// Checks the values the core relies on. The scheduler is only ever
    /// built from a config that passed this.
    pub fn validate(&self) -> SearchResult<()> {
        if self.fragment.is_empty() {
            return Err(SearchError::EmptyFragment);
        }
        if !(MIN_WORKERS..=MAX_WORKERS).contains(&self.worker_count) {
            return Err(SearchError::invalid_worker_count(
                self.worker_count,
                MIN_WORKERS,
                MAX_WORKERS,
            ));
        }
        Ok(())
    }

    /// Corpus paths resolved against `root_path`, in input order
    pub fn resolved_files(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| self.root_path.join(f)).collect()
    }
}
