//! Credential pairs and their `username:password` text form.

use std::fmt;
use std::str::FromStr;

/// A username/password combination queued for one attempt.
///
/// Pairs are plain values: the same pair may be queued more than once and
/// every copy is attempted independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CredentialPair {
    /// Account name
    pub username: String,
    /// Secret tried for the account (may be empty)
    pub password: String,
}

impl CredentialPair {
    /// Creates a new credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Display for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.username, self.password)
    }
}

impl FromStr for CredentialPair {
    type Err = String;

    /// Parses `username:password`, splitting on the first colon.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((username, password)) => Ok(Self::new(username.trim(), password.trim())),
            None => Err(format!("Missing ':' separator in credential line: {}", s)),
        }
    }
}

impl<U: Into<String>, P: Into<String>> From<(U, P)> for CredentialPair {
    fn from((username, password): (U, P)) -> Self {
        Self::new(username, password)
    }
}
