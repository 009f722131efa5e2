//! Worker pool management.

use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver};
use tracing::error;

use crate::credential::CredentialPair;
use crate::probe::{AuthenticationProbe, Target};
use crate::results_log::ResultsLog;

use super::runner::{ProbeWorker, WorkerSettings};
use super::{AttemptCoordinator, RunState, WorkQueue};

/// A success, announced as soon as a worker records it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    /// The accepted credentials
    pub pair: CredentialPair,
    /// The ID of the worker that found them
    pub worker_id: usize,
    /// The run-wide attempt number of the successful attempt
    pub attempt: u64,
}

/// Aggregated outcome of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub target: Target,
    /// Pairs in the work set
    pub total_items: usize,
    /// Attempts actually made
    pub attempts: u64,
    /// Accepted pairs, in recording order
    pub found: Vec<CredentialPair>,
    /// Wall-clock duration of the run
    pub duration: Duration,
    /// Whether the run stopped before draining the queue
    pub cancelled: bool,
}

impl RunReport {
    /// Returns true if at least one pair was accepted.
    pub fn success(&self) -> bool {
        !self.found.is_empty()
    }
}

/// Manages the workers of one run.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// Pairs queued at start
    total_items: usize,
    settings: Arc<WorkerSettings>,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Channel receiver for successes
    found_rx: Receiver<Found>,
    queue: Arc<WorkQueue>,
    coordinator: Arc<AttemptCoordinator>,
    log: ResultsLog,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Spawns `num_workers` workers draining `queue`.
    ///
    /// If a thread cannot be spawned, the workers already started are
    /// cancelled and joined before the error is returned.
    pub fn spawn(
        num_workers: usize,
        settings: WorkerSettings,
        probe: Arc<dyn AuthenticationProbe>,
        queue: Arc<WorkQueue>,
        coordinator: Arc<AttemptCoordinator>,
        log: ResultsLog,
    ) -> io::Result<Self> {
        let (found_tx, found_rx) = unbounded();
        let settings = Arc::new(settings);
        let total_items = queue.size();
        let start_time = Instant::now();

        let mut handles = Vec::with_capacity(num_workers);
        for id in 0..num_workers {
            let worker = ProbeWorker::new(
                id,
                settings.clone(),
                probe.clone(),
                queue.clone(),
                coordinator.clone(),
                log.clone(),
                found_tx.clone(),
            );

            let spawned = thread::Builder::new()
                .name(format!("cred-worker-{}", id))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    coordinator.request_cancel();
                    Self::join_handles(handles);
                    return Err(e);
                }
            }
        }

        // Drop the extra sender so the channel closes when all workers finish
        drop(found_tx);

        Ok(Self {
            num_workers,
            total_items,
            settings,
            handles: Some(handles),
            found_rx,
            queue,
            coordinator,
            log,
            start_time,
        })
    }

    fn join_handles(handles: Vec<JoinHandle<()>>) {
        for handle in handles {
            if handle.join().is_err() {
                error!("Worker thread panicked");
            }
        }
    }

    /// Waits for a success with a timeout.
    ///
    /// Returns `Some(found)` if a pair was accepted, `None` if the timeout
    /// expires or every worker has finished.
    pub fn wait_for_success(&self, timeout: Duration) -> Option<Found> {
        self.found_rx.recv_timeout(timeout).ok()
    }

    /// Attempts to receive a success without blocking.
    pub fn try_recv(&self) -> Option<Found> {
        self.found_rx.try_recv().ok()
    }

    /// Signals all workers to stop taking new items.
    pub fn cancel(&self) {
        self.coordinator.request_cancel();
    }

    /// Returns true once every worker has exited.
    pub fn is_finished(&self) -> bool {
        self.handles
            .as_ref()
            .map_or(true, |handles| handles.iter().all(JoinHandle::is_finished))
    }

    /// Waits for every worker to finish and returns the final report.
    ///
    /// Workers run until the queue drains or the run is cancelled.
    pub fn join(mut self) -> RunReport {
        if let Some(handles) = self.handles.take() {
            Self::join_handles(handles);
        }

        let duration = self.elapsed();
        let state = self.coordinator.snapshot();
        self.log.record_run_end(
            &self.settings.target,
            state.attempts,
            state.found.len(),
            duration.as_secs_f64(),
        );

        RunReport {
            target: self.settings.target.clone(),
            total_items: self.total_items,
            attempts: state.attempts,
            found: state.found,
            duration,
            cancelled: state.cancelled,
        }
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the number of pairs queued at start.
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Returns the number of pairs not yet taken by a worker.
    pub fn remaining(&self) -> usize {
        self.queue.size()
    }

    /// Returns a consistent view of counts and successes so far.
    pub fn snapshot(&self) -> RunState {
        self.coordinator.snapshot()
    }

    /// Returns the attempts made so far.
    pub fn total_attempts(&self) -> u64 {
        self.coordinator.attempts()
    }

    /// Returns the elapsed time since the pool was started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current attempt rate.
    pub fn attempts_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_attempts() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Returns a clone of the cancel flag for external use (e.g., signal handlers).
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.coordinator.cancel_flag()
    }

    /// Returns true if the run has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.coordinator.is_cancelled()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Not joined: stop the workers rather than leaking them
        if let Some(handles) = self.handles.take() {
            self.cancel();
            Self::join_handles(handles);
        }
    }
}
