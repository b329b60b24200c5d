use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use fragscout::{search, CliOverrides, IndexSearchConfig, Outcome, QueryResult, SearchReport};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Fragment to search for; read from stdin when omitted
    fragment: Option<String>,

    /// Number of workers (2-10)
    #[arg(short = 'j', long = "workers")]
    workers: Option<usize>,

    /// Corpus file, in report order (repeatable; replaces the default corpus)
    #[arg(short = 'f', long = "file")]
    files: Vec<PathBuf>,

    /// Directory the corpus files are resolved against
    #[arg(short = 'd', long)]
    root: Option<PathBuf>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config = IndexSearchConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    let mut config = file_config.merge_with_cli(CliOverrides {
        fragment: cli.fragment,
        files: cli.files,
        root_path: cli.root,
        worker_count: cli.workers,
        log_level: cli.log_level,
    });

    init_tracing(&config.log_level);
    debug!("Effective configuration: {:?}", config);

    if config.fragment.is_empty() {
        config.fragment = prompt_fragment()?;
    }

    let report = search(&config)?;
    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Reads the fragment as one line from stdin
fn prompt_fragment() -> Result<String> {
    eprint!("Enter the fragment to search for: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read fragment from stdin")?;
    let fragment = line.strip_suffix('\n').unwrap_or(&line);
    let fragment = fragment.strip_suffix('\r').unwrap_or(fragment);
    Ok(fragment.to_string())
}

fn print_report(report: &SearchReport) {
    println!("Search results:");
    for result in &report.results {
        println!("{}", format_result(result));
    }

    let summary = &report.summary;
    println!(
        "\nFound {} occurrences in {} of {} files ({} unreadable)",
        summary.total_occurrences,
        summary.files_with_matches,
        summary.files_searched,
        summary.files_unreadable
    );
}

fn format_result(result: &QueryResult) -> String {
    let worker = format!("Worker {}:", result.worker_id).cyan();
    let file = result.file.display().to_string().blue();
    let elapsed = humantime::format_duration(result.duration);

    match &result.outcome {
        Outcome::Found => format!(
            "{} {} in {}. Occurrences: {}. Lookup time: {}",
            worker,
            "fragment found".green(),
            file,
            result.count,
            elapsed
        ),
        Outcome::Absent => format!(
            "{} {} in {}. Lookup time: {}",
            worker,
            "fragment not found".yellow(),
            file,
            elapsed
        ),
        Outcome::Unreadable { reason } => format!(
            "{} {} in {} (could not be read: {}). Lookup time: {}",
            worker,
            "fragment not found".red(),
            file,
            reason,
            elapsed
        ),
    }
}
