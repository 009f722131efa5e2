//! A worker that drains the queue through the authentication probe.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use tracing::trace;

use crate::credential::CredentialPair;
use crate::probe::{AttemptOutcome, AuthenticationProbe, Target};
use crate::results_log::ResultsLog;

use super::{AttemptCoordinator, Found, Pop, WorkQueue};

/// How long a worker waits on the queue before re-checking cancellation.
pub const DEQUEUE_WAIT: Duration = Duration::from_millis(100);

/// Per-attempt parameters shared by every worker of a run.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub target: Target,
    pub timeout: Duration,
    pub delay: Duration,
    pub stop_on_first_success: bool,
}

/// A worker that attempts queued pairs one at a time.
pub struct ProbeWorker {
    /// Worker ID
    id: usize,
    settings: Arc<WorkerSettings>,
    probe: Arc<dyn AuthenticationProbe>,
    queue: Arc<WorkQueue>,
    coordinator: Arc<AttemptCoordinator>,
    log: ResultsLog,
    /// Channel to announce successes as they happen
    found_tx: Sender<Found>,
}

impl ProbeWorker {
    /// Creates a new probe worker.
    pub fn new(
        id: usize,
        settings: Arc<WorkerSettings>,
        probe: Arc<dyn AuthenticationProbe>,
        queue: Arc<WorkQueue>,
        coordinator: Arc<AttemptCoordinator>,
        log: ResultsLog,
        found_tx: Sender<Found>,
    ) -> Self {
        Self {
            id,
            settings,
            probe,
            queue,
            coordinator,
            log,
            found_tx,
        }
    }

    /// Runs the worker loop.
    ///
    /// Takes items until:
    /// - The queue is drained
    /// - Cancellation is requested
    ///
    /// Cancellation never interrupts an attempt already in flight.
    pub fn run(&self) {
        loop {
            if self.coordinator.is_cancelled() {
                break;
            }

            let pair = match self.queue.try_pop(DEQUEUE_WAIT) {
                Pop::Item(pair) => pair,
                Pop::Empty => continue,
                Pop::Drained => break,
            };

            let outcome = self.attempt(&pair);
            self.report(pair, outcome);

            if !self.settings.delay.is_zero() && !self.coordinator.is_cancelled() {
                thread::sleep(self.settings.delay);
            }
        }

        trace!(worker = self.id, "Worker finished");
    }

    /// Calls the probe, turning a panic into a transport error so one bad
    /// attempt cannot take the worker down.
    fn attempt(&self, pair: &CredentialPair) -> AttemptOutcome {
        self.log.record_attempt(pair, &self.settings.target);

        let call = AssertUnwindSafe(|| {
            self.probe.attempt(
                &self.settings.target,
                &pair.username,
                &pair.password,
                self.settings.timeout,
            )
        });

        panic::catch_unwind(call).unwrap_or_else(|payload| {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".into());
            AttemptOutcome::TransportError(format!("probe panicked: {}", detail))
        })
    }

    fn report(&self, pair: CredentialPair, outcome: AttemptOutcome) {
        let attempt = self.coordinator.record_attempt();

        match outcome {
            AttemptOutcome::Success => {
                self.log.record_success(&pair, &self.settings.target);
                self.coordinator.record_success(pair.clone());
                if self.settings.stop_on_first_success {
                    self.coordinator.request_cancel();
                }

                // Ignore if nobody is listening
                let _ = self.found_tx.send(Found {
                    pair,
                    worker_id: self.id,
                    attempt,
                });
            }
            AttemptOutcome::AuthFailure => {}
            AttemptOutcome::TransportError(detail) => {
                self.log.record_error(&format!("{} on {}: {}", pair, self.settings.target, detail));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn settings(stop_on_first_success: bool) -> Arc<WorkerSettings> {
        Arc::new(WorkerSettings {
            target: Target::new("localhost", 22),
            timeout: Duration::from_millis(50),
            delay: Duration::ZERO,
            stop_on_first_success,
        })
    }

    fn worker_with(
        probe: Arc<dyn AuthenticationProbe>,
        items: Vec<CredentialPair>,
        stop_on_first_success: bool,
    ) -> (ProbeWorker, Arc<AttemptCoordinator>, crossbeam_channel::Receiver<Found>) {
        let coordinator = Arc::new(AttemptCoordinator::new());
        let (tx, rx) = unbounded();
        let worker = ProbeWorker::new(
            0,
            settings(stop_on_first_success),
            probe,
            Arc::new(WorkQueue::from_items(items)),
            coordinator.clone(),
            ResultsLog::new(),
            tx,
        );
        (worker, coordinator, rx)
    }

    #[test]
    fn test_panicking_probe_is_contained() {
        let probe: Arc<dyn AuthenticationProbe> =
            Arc::new(|_: &Target, user: &str, _: &str, _: Duration| -> AttemptOutcome {
                if user == "boom" {
                    panic!("probe blew up");
                }
                AttemptOutcome::Success
            });
        let items = vec![CredentialPair::new("boom", "x"), CredentialPair::new("ok", "x")];
        let (worker, coordinator, rx) = worker_with(probe, items, false);

        worker.run();

        let state = coordinator.snapshot();
        assert_eq!(state.attempts, 2);
        assert_eq!(state.found, vec![CredentialPair::new("ok", "x")]);
        let found = rx.try_recv().unwrap();
        assert_eq!(found.attempt, 2);
        assert_eq!(found.worker_id, 0);
    }

    #[test]
    fn test_stops_after_success_when_enabled() {
        let probe: Arc<dyn AuthenticationProbe> =
            Arc::new(|_: &Target, _: &str, _: &str, _: Duration| AttemptOutcome::Success);
        let items = vec![CredentialPair::new("a", "1"), CredentialPair::new("b", "2")];
        let (worker, coordinator, _rx) = worker_with(probe, items, true);

        worker.run();

        let state = coordinator.snapshot();
        assert_eq!(state.attempts, 1);
        assert!(state.cancelled);
    }

    #[test]
    fn test_transport_errors_are_counted() {
        let probe: Arc<dyn AuthenticationProbe> = Arc::new(|_: &Target, _: &str, _: &str, _: Duration| {
            AttemptOutcome::TransportError("connection refused".into())
        });
        let items = vec![CredentialPair::new("a", "1"); 3];
        let (worker, coordinator, rx) = worker_with(probe, items, false);

        worker.run();

        assert_eq!(coordinator.snapshot().attempts, 3);
        assert!(rx.try_recv().is_err());
    }
}
