//! Credential sweep CLI
//!
//! Usage:
//!   cred_sweep mutate summer admin -y 2018-2025     # Password candidates
//!   cred_sweep plan 10.0.0.5 -u users.txt -P pw.txt # Work-set size for a run
//!   cred_sweep filter rockyou.txt --min 8 --contains pass

use std::io::{self, BufWriter, Write};
use std::process;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cred_sweep::cli::{Cli, Command, FilterArgs, MergeArgs, MutateArgs, PlanArgs};
use cred_sweep::wordlist::{self, WordlistStore};
use cred_sweep::{generate_mutations, Settings, WorkSet};

fn main() {
    let cli = Cli::parse();

    // Validate configuration
    if let Err(e) = cli.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    let settings = match Settings::load_or_default(&cli.config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    init_tracing(cli.log_level.as_deref().unwrap_or(&settings.logging.level));

    let store = WordlistStore::new(&settings.wordlists.dir);
    let result = match &cli.command {
        Command::Mutate(args) => mutate(&store, args),
        Command::Plan(args) => plan(&store, &settings, args),
        Command::Stats { wordlist } => stats(&store, wordlist),
        Command::Filter(args) => filter(&store, args),
        Command::Merge(args) => merge(&store, args),
        Command::List => list(&store),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn mutate(store: &WordlistStore, args: &MutateArgs) -> cred_sweep::Result<()> {
    let mut seeds = args.seeds.clone();
    if let Some(file) = &args.file {
        seeds.extend(store.load(file)?);
    }

    let policy = args.policy();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.job_count())
        .build()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let candidates: Vec<String> = pool
        .install(|| generate_mutations(&seeds, &policy))
        .into_iter()
        .collect();

    match &args.output {
        Some(output) => {
            let path = store.save(&candidates, output)?;
            println!("Wrote {} candidates to {}", candidates.len(), path.display());
        }
        None => print_words(&candidates)?,
    }
    Ok(())
}

fn plan(store: &WordlistStore, settings: &Settings, args: &PlanArgs) -> cred_sweep::Result<()> {
    let mut config = settings.engine_config(args.host.clone())?;
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(threads) = args.threads {
        config = config.with_max_threads(threads);
    }
    config.validate()?;

    let userlist = args.userlist.as_ref().unwrap_or(&settings.wordlists.userlist);
    let passlist = args.passlist.as_ref().unwrap_or(&settings.wordlists.passlist);
    let pairs = args.pairs.as_ref().unwrap_or(&settings.wordlists.default_pairs);
    let work = WorkSet::from_sources(store, userlist, passlist, Some(pairs.as_path()))?;

    println!("Credential Sweep Plan");
    println!("=====================");
    println!("Target:      {}", config.target());
    println!("Pairs:       {}", work.len());
    println!("Workers:     {}", config.pool_size(work.len()));
    println!("Timeout:     {:.1}s", config.timeout.as_secs_f64());
    println!("Delay:       {}ms", config.delay.as_millis());
    println!(
        "Stop early:  {}",
        if config.stop_on_first_success { "yes" } else { "no" }
    );

    if args.list {
        println!();
        let rendered: Vec<String> = work.pairs().iter().map(|p| p.to_string()).collect();
        print_words(&rendered)?;
    }
    Ok(())
}

fn stats(store: &WordlistStore, path: &std::path::Path) -> cred_sweep::Result<()> {
    let words = store.load(path)?;
    let s = wordlist::stats(&words);
    println!("Words:        {}", s.count);
    println!("Unique:       {}", s.unique);
    println!("Min length:   {}", s.min_len);
    println!("Max length:   {}", s.max_len);
    println!("Avg length:   {:.2}", s.avg_len);
    Ok(())
}

fn filter(store: &WordlistStore, args: &FilterArgs) -> cred_sweep::Result<()> {
    let words = store.load(&args.wordlist)?;
    let kept = wordlist::filter(&words, &args.criteria());

    match &args.output {
        Some(output) => {
            let path = store.save(&kept, output)?;
            println!("Kept {} of {} words in {}", kept.len(), words.len(), path.display());
        }
        None => print_words(&kept)?,
    }
    Ok(())
}

fn merge(store: &WordlistStore, args: &MergeArgs) -> cred_sweep::Result<()> {
    let path = store.merge(&args.inputs, &args.output, !args.keep_duplicates)?;
    println!("Merged {} wordlists into {}", args.inputs.len(), path.display());
    Ok(())
}

fn list(store: &WordlistStore) -> cred_sweep::Result<()> {
    let available = store.list_available();
    if available.is_empty() {
        println!("No wordlists under {}", store.base_dir().display());
    }
    for path in available {
        println!("{}", path.display());
    }
    Ok(())
}

fn print_words(words: &[String]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for word in words {
        writeln!(out, "{}", word)?;
    }
    out.flush()
}
