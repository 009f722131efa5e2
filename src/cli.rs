//! Command-line interface definition.

use std::ops::RangeInclusive;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigError;
use crate::mutation::{parse_year_range, MutationPolicy};
use crate::wordlist::WordFilter;

/// Credential sweep toolkit: wordlists, mutations and run planning
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (TOML); missing file means defaults
    #[arg(short = 'C', long, global = true, default_value = "cred_sweep.toml")]
    pub config: PathBuf,

    /// Log filter used when RUST_LOG is unset (overrides the settings file)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Expand seed words into password candidates
    Mutate(MutateArgs),
    /// Build the work set for a target and report its size
    Plan(PlanArgs),
    /// Show statistics for a wordlist
    Stats {
        /// Wordlist file
        wordlist: PathBuf,
    },
    /// Filter a wordlist by length and substring
    Filter(FilterArgs),
    /// Merge wordlists into one file
    Merge(MergeArgs),
    /// List wordlists in the wordlist directory
    List,
}

#[derive(Args, Debug, Clone)]
pub struct MutateArgs {
    /// Seed words
    pub seeds: Vec<String>,

    /// Read additional seed words from a wordlist file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Year range to append, e.g. 2018-2025
    #[arg(short, long, value_parser = parse_year_range)]
    pub years: Option<RangeInclusive<u32>>,

    /// Replace the default symbol suffixes (repeatable)
    #[arg(short, long = "suffix")]
    pub suffixes: Vec<String>,

    /// Write the candidates to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of generator threads (default: number of CPU cores)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

impl MutateArgs {
    /// Builds the mutation policy from the overrides given.
    pub fn policy(&self) -> MutationPolicy {
        let mut policy = MutationPolicy::default();
        if let Some(years) = &self.years {
            policy = policy.with_years(years.clone());
        }
        if !self.suffixes.is_empty() {
            policy = policy.with_symbols(self.suffixes.iter().cloned());
        }
        policy
    }

    /// Returns the number of generator threads, defaulting to CPU count
    pub fn job_count(&self) -> usize {
        self.jobs.unwrap_or_else(num_cpus::get)
    }
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Target host
    pub host: String,

    /// Username wordlist (default from settings)
    #[arg(short, long)]
    pub userlist: Option<PathBuf>,

    /// Password wordlist (default from settings)
    #[arg(short = 'P', long)]
    pub passlist: Option<PathBuf>,

    /// Default username:password pairs file (default from settings)
    #[arg(long)]
    pub pairs: Option<PathBuf>,

    /// Target port (default from settings)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Maximum worker threads (default from settings)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Print every pair in work order
    #[arg(long, default_value = "false")]
    pub list: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Wordlist file
    pub wordlist: PathBuf,

    /// Minimum word length
    #[arg(long, default_value = "1")]
    pub min: usize,

    /// Maximum word length
    #[arg(long)]
    pub max: Option<usize>,

    /// Keep only words containing this text (case-insensitive)
    #[arg(long)]
    pub contains: Option<String>,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl FilterArgs {
    pub fn criteria(&self) -> WordFilter {
        WordFilter {
            min_len: self.min,
            max_len: self.max,
            contains: self.contains.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    /// Wordlists to merge, in order
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Output file (bare names go to the custom/ wordlist directory)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Keep duplicate words
    #[arg(long, default_value = "false")]
    pub keep_duplicates: bool,
}

impl Cli {
    /// Validates argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.command {
            Command::Mutate(args) => {
                if args.seeds.is_empty() && args.file.is_none() {
                    return Err(ConfigError::Invalid(
                        "Provide seed words or --file".into(),
                    ));
                }
                if args.jobs == Some(0) {
                    return Err(ConfigError::Invalid("Job count must be positive".into()));
                }
            }
            Command::Plan(args) => {
                if args.threads == Some(0) {
                    return Err(ConfigError::Invalid("Thread count must be positive".into()));
                }
            }
            Command::Filter(args) => {
                if args.max.is_some_and(|max| max < args.min) {
                    return Err(ConfigError::Invalid(
                        "--max cannot be smaller than --min".into(),
                    ));
                }
            }
            Command::Stats { .. } | Command::Merge(_) | Command::List => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cred_sweep").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_mutate_args() {
        let cli = parse(&["mutate", "summer", "admin", "-y", "2019-2020", "-s", "!", "-s", "?"]);
        let Command::Mutate(args) = &cli.command else {
            panic!("expected mutate");
        };
        assert_eq!(args.seeds, vec!["summer", "admin"]);

        let policy = args.policy();
        assert_eq!(policy.years, 2019..=2020);
        assert_eq!(policy.symbols, vec!["!", "?"]);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_mutate_requires_seeds() {
        assert!(parse(&["mutate"]).validate().is_err());
        assert!(parse(&["mutate", "--file", "seeds.txt"]).validate().is_ok());
    }

    #[test]
    fn test_bad_year_range() {
        let result = Cli::try_parse_from(["cred_sweep", "mutate", "x", "--years", "2025-2020"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_plan_defaults() {
        let cli = parse(&["plan", "10.0.0.5"]);
        assert_eq!(cli.config, PathBuf::from("cred_sweep.toml"));
        let Command::Plan(args) = &cli.command else {
            panic!("expected plan");
        };
        assert_eq!(args.host, "10.0.0.5");
        assert!(args.threads.is_none());
        assert!(!args.list);
    }

    #[test]
    fn test_plan_zero_threads() {
        assert!(parse(&["plan", "host", "-t", "0"]).validate().is_err());
    }

    #[test]
    fn test_filter_bounds() {
        assert!(parse(&["filter", "w.txt", "--min", "6", "--max", "4"]).validate().is_err());
        let cli = parse(&["filter", "w.txt", "--min", "4", "--contains", "pass"]);
        let Command::Filter(args) = &cli.command else {
            panic!("expected filter");
        };
        assert_eq!(args.criteria().contains.as_deref(), Some("pass"));
    }

    #[test]
    fn test_merge_requires_inputs() {
        assert!(Cli::try_parse_from(["cred_sweep", "merge", "-o", "out.txt"]).is_err());
        let cli = parse(&["merge", "a.txt", "b.txt", "-o", "out.txt"]);
        assert!(cli.validate().is_ok());
    }
}
