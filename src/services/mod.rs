//! Service layer for the poller.
//!
//! - Listings fetching (`ListingsFetcher`)
//! - Console/log presentation (`Presenter`)
//! - Remote log submission (`LogSink`)

pub mod listings;
pub mod log_sink;
mod presenter;

pub use listings::ListingsFetcher;
pub use log_sink::{HttpLogSink, LogSink, NullSink, SinkLevel};
pub use presenter::Presenter;
