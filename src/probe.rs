//! The authentication probe seam.
//!
//! The engine never speaks a protocol itself. Each attempt goes through an
//! [`AuthenticationProbe`], which opens whatever connection it needs, tries
//! one credential pair, and classifies the outcome.

use std::fmt;
use std::time::Duration;

/// Remote endpoint of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Classification of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The service accepted the credentials
    Success,
    /// The service rejected the credentials
    AuthFailure,
    /// Connectivity, timeout or negotiation failure
    TransportError(String),
}

impl AttemptOutcome {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success)
    }
}

/// Performs one authentication attempt.
///
/// Implementations must return within roughly `timeout`, reporting
/// [`AttemptOutcome::TransportError`] on expiry, and must close any
/// connection they opened before returning on every path. Holding the
/// connection in an RAII guard inside `attempt` is the simplest way to get
/// the latter.
pub trait AuthenticationProbe: Send + Sync {
    fn attempt(
        &self,
        target: &Target,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> AttemptOutcome;
}

impl<F> AuthenticationProbe for F
where
    F: Fn(&Target, &str, &str, Duration) -> AttemptOutcome + Send + Sync,
{
    fn attempt(
        &self,
        target: &Target,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> AttemptOutcome {
        self(target, username, password, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_probe() {
        let probe = |_: &Target, user: &str, pass: &str, _: Duration| {
            if user == pass {
                AttemptOutcome::Success
            } else {
                AttemptOutcome::AuthFailure
            }
        };
        let target = Target::new("10.0.0.1", 22);
        let timeout = Duration::from_secs(1);

        assert!(probe.attempt(&target, "root", "root", timeout).is_success());
        assert_eq!(
            probe.attempt(&target, "root", "toor", timeout),
            AttemptOutcome::AuthFailure
        );
    }

    #[test]
    fn test_target_display() {
        assert_eq!(Target::new("host.lan", 2222).to_string(), "host.lan:2222");
    }
}
