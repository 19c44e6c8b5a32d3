// src/services/listings.rs

//! Listings fetcher.
//!
//! Issues one GET against the listings endpoint and decodes the body into a
//! [`ListingCollection`].

use chrono::Utc;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, ListingCollection};
use crate::utils::snippet;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// Service for fetching the latest listings.
pub struct ListingsFetcher {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    limit: Option<u32>,
}

impl ListingsFetcher {
    /// Create a fetcher. The client carries the request timeout.
    pub fn new(client: Client, config: &ApiConfig, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            limit: config.limit,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch and decode the current listings.
    pub async fn fetch(&self) -> Result<ListingCollection> {
        let mut request = self
            .client
            .get(&self.endpoint)
            .header(ACCEPT, "application/json");

        match &self.api_key {
            Some(key) => request = request.header(API_KEY_HEADER, key),
            None => log::debug!("Fetching without an API key"),
        }
        if let Some(limit) = self.limit {
            request = request.query(&[("limit", limit)]);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = api_error_message(&body)
                .unwrap_or_else(|| snippet(&String::from_utf8_lossy(&body), 200));
            return Err(AppError::Status {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                message,
            });
        }

        let mut listings = decode_listings(&body)?;
        listings.fetched_at = Some(Utc::now());

        log::debug!(
            "Fetched {} listings ({} bytes) from {}",
            listings.len(),
            body.len(),
            self.endpoint
        );
        Ok(listings)
    }
}

/// Decode a listings response body.
pub fn decode_listings(body: &[u8]) -> Result<ListingCollection> {
    Ok(serde_json::from_slice(body)?)
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    status: ApiStatus,
}

#[derive(Deserialize)]
struct ApiStatus {
    error_code: Option<i64>,
    error_message: Option<String>,
}

/// Pull `status.error_message` out of an API error body.
fn api_error_message(body: &[u8]) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_slice(body).ok()?;
    let message = envelope.status.error_message?;
    Some(match envelope.status.error_code {
        Some(code) => format!("{message} (code {code})"),
        None => message,
    })
}
