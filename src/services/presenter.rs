// src/services/presenter.rs

//! Console and log sink output for a listing collection.

use std::io::Write;

use crate::models::ListingCollection;

use super::log_sink::{LogSink, SinkLevel, submit};

/// Writes one line per listing to a writer and the log sink.
pub struct Presenter<'a> {
    sink: &'a dyn LogSink,
}

impl<'a> Presenter<'a> {
    pub fn new(sink: &'a dyn LogSink) -> Self {
        Self { sink }
    }

    /// Present every entry. Returns the number of lines written to `out`.
    pub async fn present<W: Write + Send>(&self, listings: &ListingCollection, out: &mut W) -> usize {
        let mut written = 0;
        for entry in listings {
            let line = entry.display_line();
            match writeln!(out, "{line}") {
                Ok(()) => written += 1,
                Err(e) => log::warn!("Failed to write listing line: {}", e),
            }
            submit(self.sink, SinkLevel::Info, &line).await;
        }
        if let Err(e) = out.flush() {
            log::warn!("Failed to flush listing output: {}", e);
        }
        written
    }
}
