//! Setup-time errors surfaced to the caller of a run.
//!
//! Per-attempt failures never appear here; they are reported as
//! [`AttemptOutcome`](crate::probe::AttemptOutcome) values and counted.

use std::io;

use crate::config::ConfigError;
use crate::wordlist::WordlistError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Wordlist(#[from] WordlistError),

    #[error("No credential pairs to try: {0}")]
    EmptyWorkSet(String),

    #[error("Failed to install interrupt handler: {0}")]
    Interrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
