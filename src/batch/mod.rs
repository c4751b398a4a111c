//! Batch execution: job discovery and the sequential session runner.

mod discover;
mod session;

pub use session::{BatchOutcome, BatchPlan, BatchSession, BatchSummary};
