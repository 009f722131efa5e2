//! Shared run state: attempt counts, successes and cancellation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::credential::CredentialPair;

/// Point-in-time view of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    /// Attempts completed so far
    pub attempts: u64,
    /// Successful pairs, in the order they were recorded
    pub found: Vec<CredentialPair>,
    /// Whether cancellation was requested
    pub cancelled: bool,
}

/// Owns the state every worker of a run reports into.
///
/// All operations take `&self` and are safe to call from any number of
/// workers at once.
#[derive(Debug, Default)]
pub struct AttemptCoordinator {
    attempts: AtomicU64,
    found: Mutex<Vec<CredentialPair>>,
    cancelled: Arc<AtomicBool>,
}

impl AttemptCoordinator {
    /// Creates a coordinator with zeroed state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a coordinator sharing an existing cancellation flag.
    pub fn with_cancel_flag(cancelled: Arc<AtomicBool>) -> Self {
        Self {
            cancelled,
            ..Self::default()
        }
    }

    fn found(&self) -> MutexGuard<'_, Vec<CredentialPair>> {
        self.found.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Counts one completed attempt and returns the new total.
    pub fn record_attempt(&self) -> u64 {
        self.attempts.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Appends a successful pair.
    pub fn record_success(&self, pair: CredentialPair) {
        self.found().push(pair);
    }

    /// Asks every worker to stop taking new items.
    pub fn request_cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Returns a clone of the cancellation flag (e.g., for signal handlers).
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Returns the attempt count without taking the lock.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Returns a consistent view of the run.
    ///
    /// The count is read while holding the success lock, and a worker
    /// counts its attempt before recording its success, so every pair in
    /// `found` is already reflected in `attempts`.
    pub fn snapshot(&self) -> RunState {
        let found = self.found();
        RunState {
            attempts: self.attempts.load(Ordering::Relaxed),
            found: found.clone(),
            cancelled: self.is_cancelled(),
        }
    }

    /// Consumes the coordinator and returns its final state.
    pub fn into_state(self) -> RunState {
        RunState {
            attempts: self.attempts.into_inner(),
            found: self.found.into_inner().unwrap_or_else(PoisonError::into_inner),
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }
}
