// src/services/log_sink.rs

//! Remote log sink.
//!
//! Messages are fire-and-forget: a failed submission is logged locally and
//! never interrupts the caller.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::SinkConfig;
use crate::utils::snippet;

/// Severity attached to a sink message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkLevel {
    Info,
    Warn,
    Error,
}

/// Destination for status messages.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn send(&self, level: SinkLevel, message: &str) -> Result<()>;
}

/// Send a message, downgrading any failure to a local warning.
pub async fn submit(sink: &dyn LogSink, level: SinkLevel, message: &str) {
    if let Err(e) = sink.send(level, message).await {
        log::warn!("Log sink submission failed: {}", e);
    }
}

/// Sink used when no token is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl LogSink for NullSink {
    async fn send(&self, _level: SinkLevel, _message: &str) -> Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct SinkPayload<'a> {
    level: SinkLevel,
    message: &'a str,
    tag: &'a str,
    timestamp: String,
}

/// Loggly-style HTTP input: `POST {endpoint}/inputs/{token}/tag/{tag}/`.
pub struct HttpLogSink {
    client: Client,
    url: Url,
    tag: String,
}

impl HttpLogSink {
    pub fn new(client: Client, config: &SinkConfig, token: &str) -> Result<Self> {
        Ok(Self {
            client,
            url: input_url(&config.endpoint, token, &config.tag)?,
            tag: config.tag.clone(),
        })
    }
}

#[async_trait]
impl LogSink for HttpLogSink {
    async fn send(&self, level: SinkLevel, message: &str) -> Result<()> {
        let payload = SinkPayload {
            level,
            message,
            tag: &self.tag,
            timestamp: Utc::now().to_rfc3339(),
        };

        let response = self
            .client
            .post(self.url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(AppError::sink)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::sink(format!(
                "status {}: {}",
                status.as_u16(),
                snippet(&body, 200)
            )));
        }
        Ok(())
    }
}

/// Choose the sink for the given token.
pub fn from_config(client: Client, config: &SinkConfig, token: Option<&str>) -> Result<Box<dyn LogSink>> {
    match token {
        Some(token) => Ok(Box::new(HttpLogSink::new(client, config, token)?)),
        None => {
            log::info!("No log sink token; remote log submission disabled");
            Ok(Box::new(NullSink))
        }
    }
}

fn input_url(endpoint: &str, token: &str, tag: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint)?;
    url.path_segments_mut()
        .map_err(|_| AppError::config(format!("sink endpoint cannot take a path: {endpoint}")))?
        .pop_if_empty()
        .extend(["inputs", token, "tag", tag, ""]);
    Ok(url)
}
