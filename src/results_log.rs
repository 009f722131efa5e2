//! Attempt/success/error logging and the durable results file.
//!
//! Events go through `tracing`. Successes are additionally appended to a
//! results file, one line per success:
//!
//! ```text
//! [2024-05-01 13:37:00] 10.0.0.5:22 - root:toor
//! ```
//!
//! File writes happen on a dedicated writer thread so workers never wait on
//! disk I/O.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Local};
use crossbeam_channel::{unbounded, Sender};
use tracing::{debug, error, info, warn};

use crate::credential::CredentialPair;
use crate::probe::Target;

/// Formats one results-file line (without the trailing newline).
pub fn format_success_line(pair: &CredentialPair, target: &Target, at: DateTime<Local>) -> String {
    format!("[{}] {} - {}", at.format("%Y-%m-%d %H:%M:%S"), target, pair)
}

/// Background appender owning the results file.
#[derive(Debug)]
struct FileSink {
    path: PathBuf,
    tx: Option<Sender<String>>,
    handle: Option<JoinHandle<()>>,
}

impl FileSink {
    fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        let (tx, rx) = unbounded::<String>();
        let writer_path = path.to_path_buf();
        let handle = thread::Builder::new()
            .name("cred-results-writer".into())
            .spawn(move || {
                let mut file: File = file;
                for line in rx.iter() {
                    if let Err(e) = writeln!(file, "{}", line).and_then(|_| file.flush()) {
                        error!(path = %writer_path.display(), error = %e, "Failed to append result");
                    }
                }
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    fn append(&self, line: String) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(line);
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Closing the channel lets the writer drain and exit.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Fire-and-forget logger handed to every worker.
///
/// Cloning is cheap; the results file is flushed and closed once the last
/// clone is dropped.
#[derive(Debug, Clone)]
pub struct ResultsLog {
    sink: Option<Arc<FileSink>>,
    log_attempts: bool,
}

impl Default for ResultsLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsLog {
    /// Creates a logger that only emits tracing events.
    pub fn new() -> Self {
        Self {
            sink: None,
            log_attempts: true,
        }
    }

    /// Creates a logger that also appends successes to `path`.
    pub fn with_results_file(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self {
            sink: Some(Arc::new(FileSink::open(path.as_ref())?)),
            log_attempts: true,
        })
    }

    /// Enables or disables per-attempt events.
    pub fn log_attempts(mut self, enabled: bool) -> Self {
        self.log_attempts = enabled;
        self
    }

    /// Returns true if per-attempt events are emitted.
    pub fn attempts_enabled(&self) -> bool {
        self.log_attempts
    }

    /// Returns the results file path, if any.
    pub fn results_file(&self) -> Option<&Path> {
        self.sink.as_deref().map(|sink| sink.path.as_path())
    }

    pub fn record_attempt(&self, pair: &CredentialPair, target: &Target) {
        if self.log_attempts {
            debug!(target_addr = %target, username = %pair.username, password = %pair.password, "Attempt");
        }
    }

    pub fn record_success(&self, pair: &CredentialPair, target: &Target) {
        info!(target_addr = %target, username = %pair.username, password = %pair.password, "Credentials accepted");
        if let Some(sink) = &self.sink {
            sink.append(format_success_line(pair, target, Local::now()));
        }
    }

    pub fn record_error(&self, message: &str) {
        warn!(error = message, "Attempt error");
    }

    pub fn record_run_start(&self, target: &Target, total_items: usize, workers: usize) {
        info!(target_addr = %target, total_items, workers, "Run started");
    }

    pub fn record_run_end(&self, target: &Target, attempts: u64, found: usize, secs: f64) {
        info!(target_addr = %target, attempts, found, duration_secs = secs, "Run finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_success_line_format() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 13, 37, 0).unwrap();
        let line = format_success_line(&CredentialPair::new("root", "toor"), &Target::new("10.0.0.5", 22), at);
        assert_eq!(line, "[2024-05-01 13:37:00] 10.0.0.5:22 - root:toor");
    }

    #[test]
    fn test_results_file_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("results.txt");
        let target = Target::new("host", 22);

        let log = ResultsLog::with_results_file(&path).unwrap();
        let clone = log.clone();
        clone.record_success(&CredentialPair::new("admin", "admin"), &target);
        log.record_success(&CredentialPair::new("pi", "raspberry"), &target);
        log.record_attempt(&CredentialPair::new("x", "y"), &target);
        drop(clone);
        drop(log);

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("host:22 - admin:admin"));
        assert!(lines[1].ends_with("host:22 - pi:raspberry"));
    }

    #[test]
    fn test_no_sink() {
        let log = ResultsLog::new().log_attempts(false);
        assert!(log.results_file().is_none());
        log.record_success(&CredentialPair::new("a", "b"), &Target::new("h", 1));
    }
}
