//! Runtime configuration for enumeration runs.
//!
//! [`EngineConfig`] is the validated, typed view the engine consumes.
//! [`Settings`] is the optional TOML file it can be built from; every field
//! has a default so a partial file (or no file) is fine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::probe::Target;
use crate::results_log::ResultsLog;

pub const DEFAULT_PORT: u16 = 22;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_THREADS: usize = 10;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Engine parameters for a single run against one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Target host name or address
    pub host: String,
    /// Target port
    pub port: u16,
    /// Upper bound for a single probe attempt
    pub timeout: Duration,
    /// Maximum number of concurrent workers
    pub max_threads: usize,
    /// Pause each worker takes after an attempt
    pub delay: Duration,
    /// Stop issuing new attempts once any pair succeeds
    pub stop_on_first_success: bool,
    /// Emit a debug event for every attempt
    pub log_attempts: bool,
}

impl EngineConfig {
    /// Creates a configuration with default parameters for `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            max_threads: DEFAULT_MAX_THREADS,
            delay: DEFAULT_DELAY,
            stop_on_first_success: false,
            log_attempts: true,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = max_threads;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_stop_on_first_success(mut self, stop: bool) -> Self {
        self.stop_on_first_success = stop;
        self
    }

    /// Returns the endpoint as a [`Target`].
    pub fn target(&self) -> Target {
        Target::new(self.host.clone(), self.port)
    }

    /// Number of workers for a run of `total_items` pairs.
    pub fn pool_size(&self, total_items: usize) -> usize {
        self.max_threads.min(total_items)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("Target host cannot be empty".into()));
        }

        if self.port == 0 {
            return Err(ConfigError::Invalid("Port must be between 1 and 65535".into()));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("Timeout must be positive".into()));
        }

        if self.max_threads == 0 {
            return Err(ConfigError::Invalid("Thread count must be positive".into()));
        }

        Ok(())
    }
}

/// Settings file contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineSettings,
    pub wordlists: WordlistSettings,
    pub logging: LoggingSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub port: u16,
    pub timeout_secs: u64,
    pub max_threads: usize,
    pub delay_ms: u64,
    pub stop_on_first_success: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            max_threads: DEFAULT_MAX_THREADS,
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
            stop_on_first_success: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordlistSettings {
    /// Directory relative wordlist paths are resolved against
    pub dir: PathBuf,
    pub userlist: PathBuf,
    pub passlist: PathBuf,
    pub default_pairs: PathBuf,
}

impl Default for WordlistSettings {
    fn default() -> Self {
        Self {
            dir: "wordlists".into(),
            userlist: "common_users.txt".into(),
            passlist: "common_passwords.txt".into(),
            default_pairs: "default_creds.txt".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub log_attempts: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            log_attempts: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub save_results: bool,
    pub results_file: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            save_results: true,
            results_file: "logs/successful_logins.txt".into(),
        }
    }
}

impl Settings {
    /// Reads a TOML settings file; absent fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Like [`Settings::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parses settings from a TOML string.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            message: e.to_string(),
        })
    }

    /// Writes the settings as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let write = || -> io::Result<()> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, text)
        };

        write().map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the run logger from the `[output]` and `[logging]` sections.
    ///
    /// With `save_results`, successes are appended to `results_file`.
    pub fn results_log(&self) -> io::Result<ResultsLog> {
        let log = if self.output.save_results {
            ResultsLog::with_results_file(&self.output.results_file)?
        } else {
            ResultsLog::new()
        };
        Ok(log.log_attempts(self.logging.log_attempts))
    }

    /// Builds a validated [`EngineConfig`] for `host`.
    pub fn engine_config(&self, host: impl Into<String>) -> Result<EngineConfig, ConfigError> {
        let config = EngineConfig {
            host: host.into(),
            port: self.engine.port,
            timeout: Duration::from_secs(self.engine.timeout_secs),
            max_threads: self.engine.max_threads,
            delay: Duration::from_millis(self.engine.delay_ms),
            stop_on_first_success: self.engine.stop_on_first_success,
            log_attempts: self.logging.log_attempts,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to access settings file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write settings file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to parse settings file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::new("192.168.1.10").validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let base = EngineConfig::new("host");
        assert!(EngineConfig::new("  ").validate().is_err());
        assert!(base.clone().with_port(0).validate().is_err());
        assert!(base.clone().with_timeout(Duration::ZERO).validate().is_err());
        assert!(base.with_max_threads(0).validate().is_err());
    }

    #[test]
    fn test_pool_size() {
        let config = EngineConfig::new("host").with_max_threads(8);
        assert_eq!(config.pool_size(3), 3);
        assert_eq!(config.pool_size(100), 8);
        assert_eq!(config.pool_size(0), 0);
    }

    #[test]
    fn test_partial_settings() {
        let settings = Settings::from_toml(
            r#"
            [engine]
            max_threads = 4
            stop_on_first_success = true

            [output]
            save_results = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.engine.max_threads, 4);
        assert!(settings.engine.stop_on_first_success);
        assert_eq!(settings.engine.port, 22);
        assert_eq!(settings.engine.delay_ms, 100);
        assert!(!settings.output.save_results);
        assert_eq!(settings.wordlists, WordlistSettings::default());
    }

    #[test]
    fn test_settings_to_engine_config() {
        let mut settings = Settings::default();
        settings.engine.timeout_secs = 2;
        let config = settings.engine_config("10.0.0.5").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.max_threads, 10);
        assert_eq!(config.target(), Target::new("10.0.0.5", 22));

        settings.engine.max_threads = 0;
        assert!(matches!(settings.engine_config("h"), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            Settings::from_toml("[engine]\nport = \"ssh\""),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_or_default_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("settings.toml");
        assert_eq!(Settings::load_or_default(&path).unwrap(), Settings::default());

        let mut settings = Settings::default();
        settings.engine.port = 2222;
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_save_into_directory_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::default().save(dir.path());
        assert!(matches!(result, Err(ConfigError::Write { .. })));
    }

    #[test]
    fn test_results_log_from_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("results.txt");

        let mut settings = Settings::default();
        settings.output.results_file = path.clone();
        settings.logging.log_attempts = false;

        let log = settings.results_log().unwrap();
        assert_eq!(log.results_file(), Some(path.as_path()));
        assert!(!log.attempts_enabled());

        settings.output.save_results = false;
        let log = settings.results_log().unwrap();
        assert!(log.results_file().is_none());
        assert!(!log.attempts_enabled());
    }
}
