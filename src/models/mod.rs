// src/models/mod.rs

//! Domain models for the poller.

mod config;
mod listing;
mod record;

pub use config::{
    ApiConfig, Config, LoggingConfig, PollConfig, SinkConfig, SnapshotConfig, StoreConfig,
};
pub use listing::{ListingCollection, ListingEntry, Quote, SCHEMA_VERSION, UsdQuote};
pub use record::StoreRecord;
