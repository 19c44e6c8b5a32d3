// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::models::{ApiConfig, SinkConfig};

/// Create the client used for listings requests.
pub fn create_api_client(config: &ApiConfig) -> Result<Client> {
    create_client(&config.user_agent, config.timeout())
}

/// Create the client used for log sink submissions.
pub fn create_sink_client(config: &SinkConfig, user_agent: &str) -> Result<Client> {
    create_client(user_agent, config.timeout())
}

fn create_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?;
    Ok(client)
}
