//! Pipeline entry points.
//!
//! - `run_cycle`: crawl, then summarize and publish when there is a new diploma
//! - `run_pipeline`: build the real clients and run one cycle
//! - `show_status`: read the processed marker

pub mod cycle;
pub mod run;

pub use cycle::{CycleOutcome, run_cycle};
pub use run::{run_pipeline, show_status};
