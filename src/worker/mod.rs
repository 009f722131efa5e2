//! Worker pool for concurrent credential attempts.
//!
//! This module provides:
//! - The shared work queue workers drain
//! - The coordinator owning attempt counts, successes and cancellation
//! - Probe workers and the pool that runs them

mod coordinator;
mod pool;
mod queue;
mod runner;

pub use coordinator::{AttemptCoordinator, RunState};
pub use pool::{Found, RunReport, WorkerPool};
pub use queue::{Pop, QueueClosed, WorkQueue};
pub use runner::{ProbeWorker, WorkerSettings};
