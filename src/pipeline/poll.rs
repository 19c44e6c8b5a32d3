// src/pipeline/poll.rs

//! Fixed-interval poll loop.

use std::time::Duration;

use super::cycle::{CycleReport, Pipeline};

/// Runs cycles back to back with a fixed sleep in between.
///
/// The first cycle starts immediately. A cycle always completes before the
/// sleep begins, so cycles never overlap.
pub struct PollLoop {
    pipeline: Pipeline,
    interval: Duration,
}

impl PollLoop {
    pub fn new(pipeline: Pipeline, interval: Duration) -> Self {
        Self { pipeline, interval }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Poll until the process is killed.
    pub async fn run_forever(&self) {
        log::info!(
            "Polling {} every {}s",
            self.pipeline.fetcher().endpoint(),
            self.interval.as_secs()
        );

        let mut cycle: u64 = 0;
        loop {
            cycle += 1;
            self.run_one(cycle).await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Run `count` cycles, sleeping between them but not after the last.
    pub async fn run_cycles(&self, count: usize) -> Vec<CycleReport> {
        let mut reports = Vec::with_capacity(count);
        for cycle in 1..=count {
            reports.push(self.run_one(cycle as u64).await);
            if cycle < count {
                tokio::time::sleep(self.interval).await;
            }
        }
        reports
    }

    async fn run_one(&self, cycle: u64) -> CycleReport {
        log::info!("Cycle {}: polling now", cycle);
        let report = self.pipeline.run_cycle(&mut std::io::stdout()).await;

        match &report.skipped {
            Some(reason) => log::warn!("Cycle {} skipped: {}", cycle, reason),
            None => log::info!(
                "Cycle {} complete: {} fetched, snapshot {}, {} upserted, {} failed",
                cycle,
                report.fetched,
                if report.snapshot_written { "written" } else { "not written" },
                report.upserted,
                report.upsert_failures
            ),
        }
        report
    }
}
