// src/pipeline/cycle.rs

//! One fetch → present → snapshot → upsert cycle.
//!
//! Every failure inside a cycle is logged locally and to the log sink, then
//! the cycle carries on with whatever it can still do:
//!
//! - fetch failure: nothing else runs this cycle
//! - snapshot failure: upserts still run
//! - upsert failure: the remaining records are still attempted

use std::io::Write;

use serde::Serialize;

use crate::error::AppError;
use crate::models::{ListingCollection, StoreRecord};
use crate::services::log_sink::submit;
use crate::services::{ListingsFetcher, LogSink, Presenter, SinkLevel};
use crate::storage::{RecordStore, SnapshotStore};

/// Outcome of one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Entries returned by the fetch
    pub fetched: usize,
    /// Lines written to the console
    pub presented: usize,
    pub snapshot_written: bool,
    pub upserted: usize,
    pub upsert_failures: usize,
    /// Why the cycle was skipped, if the fetch failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

impl CycleReport {
    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }
}

/// The components a cycle drives. Built once and reused for every cycle.
pub struct Pipeline {
    fetcher: ListingsFetcher,
    snapshot: SnapshotStore,
    store: Option<Box<dyn RecordStore>>,
    sink: Box<dyn LogSink>,
}

impl Pipeline {
    pub fn new(fetcher: ListingsFetcher, snapshot: SnapshotStore, sink: Box<dyn LogSink>) -> Self {
        Self {
            fetcher,
            snapshot,
            store: None,
            sink,
        }
    }

    /// Enable upserts into the given store.
    pub fn with_store(mut self, store: Box<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn snapshot(&self) -> &SnapshotStore {
        &self.snapshot
    }

    pub fn fetcher(&self) -> &ListingsFetcher {
        &self.fetcher
    }

    /// Run one cycle, writing listing lines to `out`.
    pub async fn run_cycle<W: Write + Send>(&self, out: &mut W) -> CycleReport {
        let mut report = CycleReport::default();

        let listings = match self.fetcher.fetch().await {
            Ok(listings) => listings,
            Err(e) => {
                self.report_failure("Fetch", &e).await;
                report.skipped = Some(format!("{}: {}", e.kind(), e));
                return report;
            }
        };
        report.fetched = listings.len();
        log::info!("Fetched {} listings", report.fetched);

        report.presented = Presenter::new(self.sink.as_ref())
            .present(&listings, out)
            .await;

        match self.snapshot.write_snapshot(&listings).await {
            Ok(()) => {
                report.snapshot_written = true;
                log::info!("Snapshot written to {}", self.snapshot.path().display());
            }
            Err(e) => self.report_failure("Snapshot", &e).await,
        }

        if let Some(store) = &self.store {
            let (upserted, failures) = self.upsert_all(store.as_ref(), &listings).await;
            report.upserted = upserted;
            report.upsert_failures = failures;
            log::info!(
                "Upserted {}/{} records into {}",
                upserted,
                listings.len(),
                store.describe()
            );
        }

        report
    }

    /// Upsert every entry, one call each. Returns `(succeeded, failed)`.
    async fn upsert_all(&self, store: &dyn RecordStore, listings: &ListingCollection) -> (usize, usize) {
        let mut upserted = 0;
        let mut failures = 0;

        for entry in listings {
            let record = StoreRecord::from(entry);
            match store.upsert(&record).await {
                Ok(()) => {
                    upserted += 1;
                    let json = serde_json::to_string(&record).unwrap_or_else(|_| record.label());
                    submit(self.sink.as_ref(), SinkLevel::Info, &format!("Added item to DB: {json}")).await;
                }
                Err(e) => {
                    failures += 1;
                    self.report_failure(&format!("Upsert {}", record.label()), &e).await;
                }
            }
        }

        (upserted, failures)
    }

    async fn report_failure(&self, stage: &str, error: &AppError) {
        let message = format!("{stage} failed ({}): {error}", error.kind());
        if error.is_retryable() {
            log::warn!("{message}");
        } else {
            log::error!("{message}");
        }
        submit(self.sink.as_ref(), SinkLevel::Error, &message).await;
    }
}
