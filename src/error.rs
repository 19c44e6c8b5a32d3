// src/error.rs

//! Unified error handling for the poller.

use std::fmt;

use thiserror::Error;

/// Result type alias for poller operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote endpoint answered with a non-success status
    #[error("HTTP status {status} from {endpoint}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Table store rejected a record
    #[error("Store error for {context}: {message}")]
    Store { context: String, message: String },

    /// Log sink submission failed
    #[error("Log sink error: {0}")]
    Sink(String),
}

/// Failure class used by the poll loop to decide what to skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid input; blocks only the affected sub-operation
    Config,
    /// Transport failure, timeout or non-2xx; skip this fetch
    Network,
    /// Malformed or unexpected JSON; skip this fetch
    Decode,
    /// Local file failure; skip the snapshot
    Io,
    /// Single upsert failure; skip that record
    Store,
    /// Log sink failure; ignored after local logging
    Sink,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Network => "network",
            ErrorKind::Decode => "decode",
            ErrorKind::Io => "io",
            ErrorKind::Store => "store",
            ErrorKind::Sink => "sink",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a store error with context.
    pub fn store(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Store {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a log sink error.
    pub fn sink(message: impl fmt::Display) -> Self {
        Self::Sink(message.to_string())
    }

    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Config(_) | AppError::Toml(_) | AppError::Url(_) => ErrorKind::Config,
            AppError::Http(e) if e.is_decode() => ErrorKind::Decode,
            AppError::Http(_) | AppError::Status { .. } => ErrorKind::Network,
            AppError::Json(_) => ErrorKind::Decode,
            AppError::Io(_) => ErrorKind::Io,
            AppError::Store { .. } => ErrorKind::Store,
            AppError::Sink(_) => ErrorKind::Sink,
        }
    }

    /// Whether the next cycle may succeed where this one failed.
    pub fn is_retryable(&self) -> bool {
        self.kind() != ErrorKind::Config
    }
}
