//! Wordlist sources and utilities.
//!
//! - `store`: Loading, saving and merging wordlist files, with built-in
//!   fallbacks when a file is missing
//! - `filter`: Length/substring filtering, statistics and shuffling

mod filter;
mod store;

pub use filter::{filter, shuffle, stats, WordFilter, WordlistStats};
pub use store::{WordlistError, WordlistStore, DEFAULT_PAIRS, DEFAULT_PASSWORDS, DEFAULT_USERNAMES};
