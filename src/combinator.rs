//! Work-set construction from username/password sources and default pairs.

use crate::credential::CredentialPair;

/// Builds the ordered work set.
///
/// The full cartesian product `usernames x passwords` (outer loop over
/// usernames) comes first, followed by `defaults` in the given order.
/// Nothing is deduplicated, so a pair present in both the product and the
/// defaults is attempted twice.
pub fn combine<U, P>(usernames: &[U], passwords: &[P], defaults: &[CredentialPair]) -> Vec<CredentialPair>
where
    U: AsRef<str>,
    P: AsRef<str>,
{
    let mut work = Vec::with_capacity(usernames.len() * passwords.len() + defaults.len());

    for username in usernames {
        for password in passwords {
            work.push(CredentialPair::new(username.as_ref(), password.as_ref()));
        }
    }

    work.extend(defaults.iter().cloned());
    work
}
