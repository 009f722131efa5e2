//! Password mutation.
//!
//! Expands a small seed corpus into candidate variants using a fixed set of
//! transforms:
//! - Case: capitalized, upper, lower
//! - Suffixes: digits, zero-padded digits, years, common symbols
//! - Reversal

mod generator;

pub use generator::{generate_mutations, parse_year_range, MutationPolicy, DEFAULT_SYMBOL_SUFFIXES};
