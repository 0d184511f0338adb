//! Yelp-Sweep main entry point
//!
//! This is the command-line interface for the Yelp-Sweep listing harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use yelp_sweep::config::{load_config_with_hash, validate_targets, Config};
use yelp_sweep::output::print_statistics;
use yelp_sweep::search::run_sweep;
use yelp_sweep::SweepError;

/// Yelp-Sweep: a paginated business-listing harvester
///
/// Yelp-Sweep pages through the business search API for every configured
/// category and location, drops listings it has already seen, and writes one
/// CSV file per pair.
#[derive(Parser, Debug)]
#[command(name = "yelp-sweep")]
#[command(version)]
#[command(about = "A paginated business-listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Category alias to search; replaces the configured list (repeatable)
    #[arg(long = "category", value_name = "ALIAS")]
    categories: Vec<String>,

    /// Location to search; replaces the configured list (repeatable)
    #[arg(long = "location", value_name = "LOCATION")]
    locations: Vec<String>,

    /// Root directory for output folders
    #[arg(long, value_name = "DIR")]
    data_dir: Option<String>,

    /// Validate config and show what would be searched without calling the API
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => (cfg, hash),
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli);
    validate_targets(&config.search)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let api_key = std::env::var(&config.api.key_env).with_context(|| {
        format!(
            "No API key found in environment variable {}, stopping",
            config.api.key_env
        )
    })?;

    handle_sweep(&config, &api_key).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("yelp_sweep=info,warn"),
            1 => EnvFilter::new("yelp_sweep=debug,info"),
            2 => EnvFilter::new("yelp_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Command-line lists replace the configured ones rather than extending them
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if !cli.categories.is_empty() {
        config.search.categories = cli.categories.clone();
    }
    if !cli.locations.is_empty() {
        config.search.locations = cli.locations.clone();
    }
    if let Some(data_dir) = &cli.data_dir {
        config.output.data_dir = data_dir.clone();
    }
}

/// Handles the --dry-run mode: shows what would be searched
fn handle_dry_run(config: &Config) {
    println!("=== Yelp-Sweep Dry Run ===\n");

    println!("API:");
    println!("  Endpoint: {}", config.api.endpoint);
    println!("  Key variable: {}", config.api.key_env);
    println!("  Page size: {}", config.api.page_size);
    println!("  Max offset: {}", config.api.max_offset);

    println!("\nOutput:");
    println!("  Data directory: {}", config.output.data_dir);

    println!("\nCategories ({}):", config.search.categories.len());
    for category in &config.search.categories {
        println!("  - {}", category);
    }

    println!("\nLocations ({}):", config.search.locations.len());
    for location in &config.search.locations {
        println!("  - {}", location);
    }

    let max_pages = config.api.max_offset / config.api.page_size + 1;
    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would search {} pairs, at most {} requests each",
        config.pairs().len(),
        max_pages
    );
}

/// Handles the main sweep operation
async fn handle_sweep(config: &Config, api_key: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Categories: {}, Locations: {}",
        config.search.categories.len(),
        config.search.locations.len()
    );

    match run_sweep(config, api_key).await {
        Ok(stats) => {
            print_statistics(&stats);
            Ok(())
        }
        Err(e @ SweepError::RateLimitExceeded { .. }) => {
            tracing::error!("Caught rate limit, exiting: {}", e);
            Err(e.into())
        }
        Err(e) => {
            tracing::error!("Sweep failed: {}", e);
            Err(e.into())
        }
    }
}
