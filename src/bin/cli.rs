//! coinpoll CLI
//!
//! Local execution entry point. For AWS Lambda, use `coinpoll-lambda`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use coinpoll::{
    config::{self, Credentials},
    error::Result,
    models::Config,
    pipeline::{self, PollLoop},
    storage::SnapshotStore,
};

/// coinpoll - CoinMarketCap listings poller
#[derive(Parser, Debug)]
#[command(
    name = "coinpoll",
    version,
    about = "Polls CoinMarketCap listings into a snapshot file and DynamoDB"
)]
struct Cli {
    /// Path to the TOML tunables file
    #[arg(short, long, default_value = "coinpoll.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll forever on a fixed interval
    Run {
        /// Seconds between cycles (overrides config and environment)
        #[arg(long)]
        interval: Option<u64>,

        /// Do not upsert records into the table store
        #[arg(long)]
        no_store: bool,
    },

    /// Run a single cycle and exit
    Once {
        /// Do not upsert records into the table store
        #[arg(long)]
        no_store: bool,
    },

    /// Report which credentials are present in the environment
    CheckEnv,

    /// Validate the tunables file
    Validate,

    /// Show the current snapshot
    Show {
        /// Number of listings to print
        #[arg(short = 'n', long, default_value_t = 10)]
        top: usize,
    },
}

/// Initialize logging based on flags.
fn init_logging(verbose: bool, json: bool, level: &str) {
    let level = if verbose { "debug" } else { level };

    if json {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
            .format_timestamp_secs()
            .init();
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is not up yet, so a load failure is reported after init.
    let loaded = Config::load(&cli.config);
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };
    config::apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    init_logging(cli.verbose, cli.json_logs, &config.logging.level);

    match &loaded {
        Ok(_) => log::info!("Loaded configuration from {}", cli.config.display()),
        Err(e) => log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        ),
    }

    let creds = Credentials::from_env();

    match cli.command {
        Command::Run { interval, no_store } => {
            if let Some(secs) = interval {
                config.poll.interval_secs = secs;
            }
            creds.report().log();

            let pipeline = pipeline::build_pipeline(&config, &creds, !no_store).await?;
            let poller = PollLoop::new(pipeline, Duration::from_secs(config.poll.interval_secs));
            poller.run_forever().await;
        }

        Command::Once { no_store } => {
            creds.report().log();

            let pipeline = pipeline::build_pipeline(&config, &creds, !no_store).await?;
            let poller = PollLoop::new(pipeline, config.poll.interval());
            let reports = poller.run_cycles(1).await;

            for report in &reports {
                log::info!("{}", serde_json::to_string(report)?);
            }
        }

        Command::CheckEnv => {
            let report = creds.report();
            report.log();
            if report.is_complete() {
                log::info!("All credentials loaded");
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = loaded {
                log::error!("Config load failed: {}", e);
                return Err(e);
            }
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }

        Command::Show { top } => {
            let store = SnapshotStore::new(&config.snapshot.path);
            log::info!("Snapshot: {}", store.path().display());

            match store.read_snapshot().await? {
                Some(listings) => {
                    log::info!("Listings: {}", listings.len());
                    match listings.fetched_at {
                        Some(at) => log::info!("Fetched at: {}", at.to_rfc3339()),
                        None => log::info!("Fetched at: unknown"),
                    }
                    for entry in listings.iter().take(top) {
                        println!("{}", entry.display_line());
                    }
                }
                None => log::info!("No snapshot found yet."),
            }
        }
    }

    Ok(())
}
