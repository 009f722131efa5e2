//! Run orchestration: work-set planning, pool startup and result collection.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::warn;

use crate::combinator::combine;
use crate::config::EngineConfig;
use crate::credential::CredentialPair;
use crate::error::{Error, Result};
use crate::probe::AuthenticationProbe;
use crate::results_log::ResultsLog;
use crate::wordlist::{WordlistError, WordlistStore};
use crate::worker::{AttemptCoordinator, RunReport, WorkQueue, WorkerPool, WorkerSettings};

/// The ordered list of pairs a run will attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkSet {
    pairs: Vec<CredentialPair>,
}

impl WorkSet {
    /// Builds the work set from in-memory sources.
    pub fn new<U: AsRef<str>, P: AsRef<str>>(
        usernames: &[U],
        passwords: &[P],
        defaults: &[CredentialPair],
    ) -> Self {
        Self {
            pairs: combine(usernames, passwords, defaults),
        }
    }

    /// Loads the username, password and default-pair sources through
    /// `store` and combines them.
    ///
    /// A source that cannot be read contributes nothing. If that leaves the
    /// work set empty, the run cannot start and [`Error::EmptyWorkSet`] is
    /// returned; an empty set built from readable sources is a valid (empty)
    /// run.
    pub fn from_sources(
        store: &WordlistStore,
        userlist: impl AsRef<Path>,
        passlist: impl AsRef<Path>,
        default_pairs: Option<&Path>,
    ) -> Result<Self> {
        let mut failures = Vec::new();

        let mut load = |path: &Path| match store.load(path) {
            Ok(words) => words,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable wordlist");
                failures.push(e);
                Vec::new()
            }
        };
        let usernames = load(userlist.as_ref());
        let passwords = load(passlist.as_ref());

        let defaults = match store.load_default_pairs_or_builtin(default_pairs) {
            Ok(pairs) => pairs,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable default pairs");
                failures.push(e);
                Vec::new()
            }
        };

        let work = Self::new(&usernames, &passwords, &defaults);
        if work.is_empty() && !failures.is_empty() {
            let reasons: Vec<String> = failures.iter().map(WordlistError::to_string).collect();
            return Err(Error::EmptyWorkSet(reasons.join("; ")));
        }

        Ok(work)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[CredentialPair] {
        &self.pairs
    }

    pub fn into_pairs(self) -> Vec<CredentialPair> {
        self.pairs
    }
}

impl From<Vec<CredentialPair>> for WorkSet {
    fn from(pairs: Vec<CredentialPair>) -> Self {
        Self { pairs }
    }
}

impl FromIterator<CredentialPair> for WorkSet {
    fn from_iter<I: IntoIterator<Item = CredentialPair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Runs credential pairs against one endpoint through a probe.
pub struct EnumerationEngine {
    config: EngineConfig,
    probe: Arc<dyn AuthenticationProbe>,
    log: ResultsLog,
}

impl EnumerationEngine {
    /// Creates an engine, validating `config` first.
    pub fn new(config: EngineConfig, probe: impl AuthenticationProbe + 'static) -> Result<Self> {
        Self::with_shared_probe(config, Arc::new(probe))
    }

    /// Creates an engine around an already shared probe.
    pub fn with_shared_probe(config: EngineConfig, probe: Arc<dyn AuthenticationProbe>) -> Result<Self> {
        config.validate()?;
        let log = ResultsLog::new().log_attempts(config.log_attempts);
        Ok(Self { config, probe, log })
    }

    /// Replaces the logger (e.g., to add a results file).
    ///
    /// The configured `log_attempts` setting still applies.
    pub fn with_log(mut self, log: ResultsLog) -> Self {
        self.log = log.log_attempts(self.config.log_attempts);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Queues `work` and starts the workers.
    ///
    /// The pool has `min(max_threads, work.len())` workers; an empty work
    /// set starts none and the returned pool is already finished.
    pub fn start(&self, work: impl Into<WorkSet>) -> Result<WorkerPool> {
        self.start_with_coordinator(work, Arc::new(AttemptCoordinator::new()))
    }

    /// Like [`start`](Self::start), but cancellation is driven by an
    /// external flag (e.g., one already wired to Ctrl-C).
    pub fn start_with_coordinator(
        &self,
        work: impl Into<WorkSet>,
        coordinator: Arc<AttemptCoordinator>,
    ) -> Result<WorkerPool> {
        let work = work.into();
        let target = self.config.target();
        let num_workers = self.config.pool_size(work.len());
        self.log.record_run_start(&target, work.len(), num_workers);

        let queue = Arc::new(WorkQueue::from_items(work.into_pairs()));
        let settings = WorkerSettings {
            target,
            timeout: self.config.timeout,
            delay: self.config.delay,
            stop_on_first_success: self.config.stop_on_first_success,
        };

        let pool = WorkerPool::spawn(
            num_workers,
            settings,
            self.probe.clone(),
            queue,
            coordinator,
            self.log.clone(),
        )?;
        Ok(pool)
    }

    /// Runs `work` to completion (or cancellation) and returns the report.
    pub fn run(&self, work: impl Into<WorkSet>) -> Result<RunReport> {
        Ok(self.start(work)?.join())
    }
}

/// Sets `flag` when the operator presses Ctrl-C.
///
/// Pass a pool's [`cancel_flag`](WorkerPool::cancel_flag) (or a flag shared
/// through [`AttemptCoordinator::with_cancel_flag`]) to turn an interrupt
/// into a regular cancellation: in-flight attempts finish and partial
/// results are kept. Only one handler can be installed per process.
pub fn cancel_on_interrupt(flag: Arc<AtomicBool>) -> Result<()> {
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::Relaxed);
    })
    .map_err(|e| Error::Interrupt(e.to_string()))
}
