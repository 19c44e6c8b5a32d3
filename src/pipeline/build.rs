// src/pipeline/build.rs

//! Wiring of clients and components from configuration.

use crate::config::Credentials;
use crate::error::Result;
use crate::models::Config;
use crate::services::{ListingsFetcher, log_sink};
use crate::storage::SnapshotStore;
use crate::utils::http;

use super::cycle::Pipeline;

/// Build the pipeline once for the life of the process.
///
/// The store is attached only when `with_store` is set, the config enables
/// it, and the crate was built with DynamoDB support.
pub async fn build_pipeline(config: &Config, creds: &Credentials, with_store: bool) -> Result<Pipeline> {
    let api_client = http::create_api_client(&config.api)?;
    let fetcher = ListingsFetcher::new(api_client, &config.api, creds.api_key.clone());

    let sink_client = http::create_sink_client(&config.sink, &config.api.user_agent)?;
    let sink = log_sink::from_config(sink_client, &config.sink, creds.sink_token.as_deref())?;

    let snapshot = SnapshotStore::new(&config.snapshot.path);
    let pipeline = Pipeline::new(fetcher, snapshot, sink);

    if !(with_store && config.store.enabled) {
        log::info!("Record store disabled; skipping upserts");
        return Ok(pipeline);
    }

    attach_store(pipeline, config).await
}

#[cfg(feature = "dynamodb")]
async fn attach_store(pipeline: Pipeline, config: &Config) -> Result<Pipeline> {
    let store = crate::storage::DynamoStore::from_config(&config.store).await?;
    Ok(pipeline.with_store(Box::new(store)))
}

#[cfg(not(feature = "dynamodb"))]
async fn attach_store(pipeline: Pipeline, _config: &Config) -> Result<Pipeline> {
    log::warn!("Built without the `dynamodb` feature; skipping upserts");
    Ok(pipeline)
}
