//! Pipeline entry points.
//!
//! - `build_pipeline`: construct clients and components from configuration
//! - `Pipeline::run_cycle`: fetch, present, snapshot and upsert once
//! - `PollLoop`: drive cycles on a fixed interval

mod build;
pub mod cycle;
pub mod poll;

pub use build::build_pipeline;
pub use cycle::{CycleReport, Pipeline};
pub use poll::PollLoop;
