//! holiday-countdown - how many days until the next public holiday.
//!
//! A terminal host for the countdown widget: runs one background refresh,
//! waits through any scheduled retries, and prints the widget line.

mod terminal;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use holiday_countdown_core::{
    ApiClient, CacheManager, ChannelReporter, Config, HolidayService, RefreshEvent, Refresher,
    RetryPolicy, WidgetPresenter,
};

use terminal::TerminalDisplay;

// ============================================================================
// Constants
// ============================================================================

/// Environment variable overriding the cache directory
const CACHE_DIR_ENV: &str = "HOLIDAY_COUNTDOWN_CACHE_DIR";

/// Buffer size for the refresh event channel.
const CHANNEL_BUFFER_SIZE: usize = 8;

#[derive(Parser, Debug)]
#[command(name = "holiday-countdown", version, about = "Days left until the next public holiday")]
struct Cli {
    /// Directory holding the per-year holiday cache
    #[arg(long, value_name = "PATH")]
    cache_dir: Option<PathBuf>,

    /// Retry a failed refresh up to N times
    #[arg(long, value_name = "N")]
    retries: Option<u32>,

    /// Seconds to wait before the first retry
    #[arg(long, value_name = "SECS")]
    retry_delay: Option<u64>,

    /// Print the nearest holiday as JSON instead of the widget line
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Flag, then environment, then config file, then the per-user default.
fn resolve_cache_dir(cli: &Cli, env_dir: Option<String>, config: &Config) -> Result<PathBuf> {
    if let Some(ref dir) = cli.cache_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = env_dir.filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    config.cache_dir()
}

fn resolve_retry(cli: &Cli, config: &Config) -> RetryPolicy {
    let mut retry = config.retry.clone();
    if let Some(attempts) = cli.retries {
        retry.max_attempts = attempts;
    }
    if let Some(secs) = cli.retry_delay {
        retry.initial_delay_secs = secs;
    }
    retry
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };

    let cache_dir = resolve_cache_dir(&cli, std::env::var(CACHE_DIR_ENV).ok(), &config)?;
    let retry = resolve_retry(&cli, &config);
    info!(cache_dir = %cache_dir.display(), retries = retry.max_attempts, "holiday-countdown starting");

    let cache = CacheManager::new(cache_dir).context("Failed to prepare holiday cache")?;
    let api = ApiClient::new().context("Failed to create HTTP client")?;
    let refresher = Refresher::new(Arc::new(api), cache);

    let (tx, mut rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
    let service = HolidayService::new(refresher, Arc::new(ChannelReporter::new(tx)), retry);

    let mut presenter = WidgetPresenter::new(TerminalDisplay::new());
    presenter.show(None);
    service.refresh();

    while let Some(event) = rx.recv().await {
        presenter.apply(&event);
        match event {
            RefreshEvent::Updated(nearest) => {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&nearest)?);
                } else {
                    println!("{}", presenter.display().render());
                }
                return Ok(ExitCode::SUCCESS);
            }
            RefreshEvent::Failed { error, retry_in: Some(delay) } => {
                eprintln!("Refresh failed: {}; retrying in {}s", error, delay.as_secs());
            }
            RefreshEvent::Failed { error, retry_in: None } => {
                eprintln!("Refresh failed: {}", error);
                if !cli.json {
                    println!("{}", presenter.display().render());
                }
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::FAILURE)
}
