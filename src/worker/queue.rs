//! Multi-consumer queue of pending credential pairs.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::credential::CredentialPair;

/// Result of a bounded dequeue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pop {
    /// An item was dequeued
    Item(CredentialPair),
    /// Nothing arrived within the timeout, but more may still come
    Empty,
    /// The queue is closed and every item has been handed out
    Drained,
}

/// Returned by [`WorkQueue::push`] after [`WorkQueue::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Work queue is closed")]
pub struct QueueClosed;

/// Work queue shared by all workers of a run.
///
/// Every pushed item is delivered to exactly one [`try_pop`](Self::try_pop)
/// caller. Closing the queue lets consumers tell "empty for now" apart from
/// "drained for good".
#[derive(Debug)]
pub struct WorkQueue {
    tx: Mutex<Option<Sender<CredentialPair>>>,
    rx: Receiver<CredentialPair>,
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkQueue {
    /// Creates an open, empty queue.
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx: Mutex::new(Some(tx)),
            rx,
        }
    }

    /// Creates a queue holding `items` and closes it.
    pub fn from_items(items: impl IntoIterator<Item = CredentialPair>) -> Self {
        let queue = Self::new();
        for item in items {
            // Cannot fail: the queue is still open.
            let _ = queue.push(item);
        }
        queue.close();
        queue
    }

    /// Enqueues an item.
    pub fn push(&self, item: CredentialPair) -> Result<(), QueueClosed> {
        let guard = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(tx) => tx.send(item).map_err(|_| QueueClosed),
            None => Err(QueueClosed),
        }
    }

    /// Waits up to `timeout` for an item.
    pub fn try_pop(&self, timeout: Duration) -> Pop {
        match self.rx.recv_timeout(timeout) {
            Ok(item) => Pop::Item(item),
            Err(RecvTimeoutError::Timeout) => Pop::Empty,
            Err(RecvTimeoutError::Disconnected) => Pop::Drained,
        }
    }

    /// Number of items not yet handed out. Advisory only.
    pub fn size(&self) -> usize {
        self.rx.len()
    }

    /// Signals that no more items will be pushed.
    pub fn close(&self) {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner).is_none()
    }
}
