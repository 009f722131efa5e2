//! # cred_sweep
//!
//! Concurrent credential enumeration against a single endpoint.
//!
//! ## Architecture
//!
//! - `credential`: The username/password value type
//! - `combinator`: Work-set construction (cartesian product plus default pairs)
//! - `mutation`: Password mutation from seed words
//! - `wordlist`: Wordlist loading with built-in fallbacks, filtering, stats
//! - `probe`: The authentication probe seam callers implement
//! - `worker`: Work queue, shared run state and the worker pool
//! - `engine`: Run orchestration
//! - `results_log`: Event logging and the results file
//! - `config`: Runtime configuration
//! - `cli`: Command-line interface

pub mod cli;
pub mod combinator;
pub mod config;
pub mod credential;
pub mod engine;
pub mod error;
pub mod mutation;
pub mod probe;
pub mod results_log;
pub mod wordlist;
pub mod worker;

pub use combinator::combine;
pub use config::{ConfigError, EngineConfig, Settings};
pub use credential::CredentialPair;
pub use engine::{cancel_on_interrupt, EnumerationEngine, WorkSet};
pub use error::{Error, Result};
pub use mutation::{generate_mutations, MutationPolicy};
pub use probe::{AttemptOutcome, AuthenticationProbe, Target};
pub use results_log::ResultsLog;
pub use wordlist::{WordFilter, WordlistStore};
pub use worker::{AttemptCoordinator, Found, RunReport, RunState, WorkQueue, WorkerPool};
