//! AWS Lambda entry point for coinpoll
//!
//! Runs exactly one cycle per invocation; schedule it with a cron trigger in
//! place of the CLI poll loop. The pipeline is built once per execution
//! environment and reused by warm invocations.
//!
//! Deploy with `cargo lambda build --release --features lambda`.

use coinpoll::{
    config::{self, Credentials},
    models::Config,
    pipeline::{self, Pipeline},
};
use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};

use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Only `/tmp` is writable inside the Lambda execution environment.
const WRITABLE_DIR: &str = "/tmp";

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("coinpoll Lambda starting...");

    let config_path = std::env::var("COINPOLL_CONFIG").unwrap_or_else(|_| "coinpoll.toml".into());
    let mut config = Config::load_or_default(&config_path);
    config::apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config.snapshot.root_under(WRITABLE_DIR);
    info!("Snapshot path: {}", config.snapshot.path);

    let creds = Credentials::from_env();
    creds.report().log();

    let pipeline = pipeline::build_pipeline(&config, &creds, true).await?;
    let pipeline = &pipeline;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(pipeline, event).await
    }))
    .await
}

/// Handler for AWS Lambda events.
async fn handler(pipeline: &Pipeline, event: LambdaEvent<Value>) -> Result<Value, LambdaError> {
    info!("Received event: {:?}", event.payload);

    let report = pipeline.run_cycle(&mut std::io::stdout()).await;
    match &report.skipped {
        Some(reason) => error!("Cycle skipped: {}", reason),
        None => info!(
            "Cycle complete: {} fetched, {} upserted",
            report.fetched, report.upserted
        ),
    }

    Ok(serde_json::to_value(&report)?)
}
