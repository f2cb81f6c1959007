//! Chew main entry point
//!
//! This is the command-line interface for the Chew content fetcher.

use anyhow::Context;
use chew::config::{load_config, validate, Config};
use chew::crawler::fetch_all;
use chew::{CancellationToken, Chunk};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Chew: polite, concurrent content fetching
///
/// Chew fetches each locator (a URL or a file:// path) while respecting
/// robots.txt, crawl delays and rate limits, and prints the extracted text.
#[derive(Parser, Debug)]
#[command(name = "chew")]
#[command(version)]
#[command(about = "Fetch URLs and files into text chunks", long_about = None)]
struct Cli {
    /// URLs or file:// paths to fetch
    #[arg(value_name = "LOCATOR", required_unless_present = "dry_run")]
    locators: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Give up on the whole batch after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Skip robots.txt and crawl-delay enforcement
    #[arg(long)]
    ignore_robots: bool,

    /// Print chunks as a JSON array
    #[arg(long)]
    json: bool,

    /// Validate config and show the effective settings without fetching
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if cli.ignore_robots {
        config.politeness.ignore_robots_txt = true;
    }
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        print_settings(&config);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    spawn_cancel_triggers(&cancel, cli.timeout.map(Duration::from_secs));

    let chunks = fetch_all(config, &cancel, &cli.locators)
        .await
        .context("Fetch failed")?;

    tracing::info!("Fetched {} chunks from {} locators", chunks.len(), cli.locators.len());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
    } else {
        print_chunks(&chunks);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("chew=info,warn"),
            1 => EnvFilter::new("chew=debug,info"),
            2 => EnvFilter::new("chew=trace,debug"),
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

/// Cancels the batch on Ctrl-C or once the timeout elapses
fn spawn_cancel_triggers(cancel: &CancellationToken, timeout: Option<Duration>) {
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            on_signal.cancel();
        }
    });

    if let Some(timeout) = timeout {
        let on_timeout = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            tracing::warn!("Timed out after {:?}, cancelling", timeout);
            on_timeout.cancel();
        });
    }
}

fn print_chunks(chunks: &[Chunk]) {
    for chunk in chunks {
        println!("Source: {}\nContent: {}\n", chunk.source, chunk.content);
    }
}

/// Handles the --dry-run mode
fn print_settings(config: &Config) {
    println!("=== Chew Dry Run ===\n");

    println!("User Agent: {}", config.user_agent);

    println!("\nRetry:");
    println!("  Limit: {}", config.retry.limit);
    println!("  Delay: {}ms", config.retry.delay_ms);

    println!("\nPoliteness:");
    println!("  Crawl delay: {}ms", config.politeness.crawl_delay_ms);
    println!("  Ignore robots.txt: {}", config.politeness.ignore_robots_txt);

    println!("\nRate Limit:");
    if config.rate_limit.interval_ms == 0 {
        println!("  Disabled");
    } else {
        println!("  Interval: {}ms", config.rate_limit.interval_ms);
        println!("  Burst: {}", config.rate_limit.burst);
    }

    println!("\nTransport:");
    println!("  Timeout: {}s", config.transport.timeout_secs);
    println!("  Proxies ({}):", config.transport.proxies.len());
    for proxy in &config.transport.proxies {
        println!("    - {}", proxy);
    }

    println!("\n✓ Configuration is valid");
}
