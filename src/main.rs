//! Proposal-Audit main entry point
//!
//! This is the command-line interface for the proposal status reconciler.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use proposal_audit::cache::{ttl_from_hours, CachedFetcher, SqliteCache};
use proposal_audit::config::{load_or_default, Config};
use proposal_audit::crawler::{audit, load_index, HttpFetcher, PageFetcher};
use proposal_audit::output::{emit_report, OutputMode, StatusReport};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Proposal-Audit: cross-checks proposal statuses against their index
///
/// Reads the proposal index, visits every proposal's page, counts the
/// declared statuses and reports proposals whose status does not match
/// the category they are listed under.
#[derive(Parser, Debug)]
#[command(name = "proposal-audit")]
#[command(version)]
#[command(about = "Reconcile proposal statuses with their index", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// How to deliver the report
    #[arg(short, long, value_enum, default_value_t = OutputArg::Plain)]
    output: OutputArg,

    /// Empty the response cache before running
    #[arg(long)]
    clear_cache: bool,

    /// Bypass the response cache for this run
    #[arg(long, conflicts_with = "clear_cache")]
    no_cache: bool,

    /// Read the index only and show how many proposals each category holds
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputArg {
    /// `status count` lines
    Plain,
    /// Markdown table
    Pretty,
    /// CSV file in the results directory
    File,
}

impl From<OutputArg> for OutputMode {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Plain => OutputMode::Plain,
            OutputArg::Pretty => OutputMode::Pretty,
            OutputArg::File => OutputMode::File,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);
    tracing::info!("Proposal audit started");
    tracing::debug!("Command line arguments: {:?}", cli);

    // Load and validate configuration
    let config = load_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Invalid built-in configuration".to_string(),
    })?;

    // Build the HTTP client
    let http = HttpFetcher::from_config(&config.fetcher).context("Failed to build HTTP client")?;

    // Put the response cache in front of the client unless disabled
    if config.cache.enabled && !cli.no_cache {
        let cache = SqliteCache::new(Path::new(&config.cache.path))
            .with_context(|| format!("Failed to open cache {}", config.cache.path))?;
        let fetcher = CachedFetcher::new(http, cache, ttl_from_hours(config.cache.ttl_hours));

        if cli.clear_cache {
            let removed = fetcher.clear().context("Failed to clear cache")?;
            tracing::info!("Cleared {} cached pages", removed);
        }

        let purged = fetcher.purge_stale().context("Failed to purge stale cache entries")?;
        if purged > 0 {
            tracing::info!("Purged {} expired cached pages", purged);
        }
        match fetcher.cached_pages() {
            Ok(count) => tracing::debug!("Response cache holds {} pages", count),
            Err(e) => tracing::warn!("Could not count cached pages: {}", e),
        }

        run(&cli, &config, &fetcher).await?;
    } else {
        run(&cli, &config, &http).await?;
    }

    tracing::info!("Proposal audit finished");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("proposal_audit=info,warn"),
            1 => EnvFilter::new("proposal_audit=debug,info"),
            2 => EnvFilter::new("proposal_audit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run<F: PageFetcher>(cli: &Cli, config: &Config, fetcher: &F) -> anyhow::Result<()> {
    // Handle different modes
    if cli.dry_run {
        return handle_dry_run(config, fetcher).await;
    }

    let outcome = match audit(config, fetcher).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Audit failed: {}", e);
            return Err(e.into());
        }
    };

    // Render the report in the requested output mode
    let report = StatusReport::from_outcome(&outcome);
    emit_report(
        &report,
        cli.output.into(),
        Path::new(&config.output.results_dir),
    )
    .context("Failed to write report")?;

    Ok(())
}

/// Handles --dry-run: reads the index and prints proposals per category key
async fn handle_dry_run<F: PageFetcher>(config: &Config, fetcher: &F) -> anyhow::Result<()> {
    let records = load_index(config, fetcher).await?;

    let mut per_key: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &records {
        *per_key.entry(record.category_key.as_str()).or_insert(0) += 1;
    }

    println!("=== Proposal-Audit Dry Run ===\n");
    println!("Index: {}", config.site.index_url);
    println!("Proposals found: {}\n", records.len());

    println!("Proposals by category key:");
    for (key, count) in &per_key {
        let known = if config.expected_status.contains_key(key) {
            ""
        } else {
            "  (unknown key)"
        };
        let label = if key.is_empty() { "(none)" } else { *key };
        println!("  {:<6} {}{}", label, count, known);
    }

    Ok(())
}
