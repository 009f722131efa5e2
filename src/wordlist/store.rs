//! Wordlist file loading with built-in fallbacks.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::credential::CredentialPair;

/// Usernames used when a username-like wordlist file is missing.
pub const DEFAULT_USERNAMES: [&str; 8] = [
    "root",
    "admin",
    "administrator",
    "user",
    "guest",
    "test",
    "oracle",
    "postgres",
];

/// Passwords used when a password-like wordlist file is missing.
pub const DEFAULT_PASSWORDS: [&str; 8] = [
    "password",
    "123456",
    "admin",
    "root",
    "guest",
    "test",
    "password123",
    "",
];

/// Pairs used when the default-pair file is missing.
pub const DEFAULT_PAIRS: [(&str, &str); 19] = [
    ("root", "root"),
    ("admin", "admin"),
    ("administrator", "administrator"),
    ("root", ""),
    ("admin", ""),
    ("guest", "guest"),
    ("test", "test"),
    ("user", "user"),
    ("oracle", "oracle"),
    ("postgres", "postgres"),
    ("mysql", "mysql"),
    ("ftp", "ftp"),
    ("pi", "raspberry"),
    ("ubuntu", "ubuntu"),
    ("root", "toor"),
    ("admin", "password"),
    ("root", "password"),
    ("admin", "123456"),
    ("root", "123456"),
];

const DEFAULT_PAIRS_FILE: &str = "default_creds.txt";
const CUSTOM_DIR: &str = "custom";

#[derive(Debug, thiserror::Error)]
pub enum WordlistError {
    #[error("Failed to read wordlist {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write wordlist {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Reads wordlist files relative to a base directory.
#[derive(Debug, Clone)]
pub struct WordlistStore {
    base_dir: PathBuf,
}

impl Default for WordlistStore {
    fn default() -> Self {
        Self::new("wordlists")
    }
}

impl WordlistStore {
    /// Creates a store resolving relative paths against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Loads one token per line, skipping blank lines and `#` comments.
    ///
    /// A missing file yields the built-in list picked by file name: names
    /// containing `user` get [`DEFAULT_USERNAMES`], names containing `pass`
    /// get [`DEFAULT_PASSWORDS`], anything else an empty list.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<String>, WordlistError> {
        let path = self.resolve(path);

        match read_lines(&path) {
            Ok(lines) => {
                debug!(path = %path.display(), words = lines.len(), "Loaded wordlist");
                Ok(lines)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Wordlist not found, using built-in list");
                Ok(fallback_wordlist(&path))
            }
            Err(source) => Err(WordlistError::Read { path, source }),
        }
    }

    /// Loads `username:password` lines.
    ///
    /// Lines without a colon are skipped. A missing file yields
    /// [`DEFAULT_PAIRS`].
    pub fn load_default_pairs(&self, path: impl AsRef<Path>) -> Result<Vec<CredentialPair>, WordlistError> {
        let path = self.resolve(path);

        match read_lines(&path) {
            Ok(lines) => Ok(lines.iter().filter_map(|line| line.parse().ok()).collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Default pair file not found, using built-in pairs");
                Ok(builtin_pairs())
            }
            Err(source) => Err(WordlistError::Read { path, source }),
        }
    }

    /// Loads the default pairs from `path`, or `default_creds.txt` in the
    /// base directory when no path is given.
    pub fn load_default_pairs_or_builtin(
        &self,
        path: Option<&Path>,
    ) -> Result<Vec<CredentialPair>, WordlistError> {
        match path {
            Some(path) => self.load_default_pairs(path),
            None => self.load_default_pairs(DEFAULT_PAIRS_FILE),
        }
    }

    /// Writes one word per line.
    ///
    /// A bare file name is placed under `<base>/custom/`. Returns the path
    /// that was written.
    pub fn save<S: AsRef<str>>(&self, words: &[S], output: impl AsRef<Path>) -> Result<PathBuf, WordlistError> {
        let output = output.as_ref();
        let path = if output.parent().map_or(true, |p| p.as_os_str().is_empty()) {
            self.base_dir.join(CUSTOM_DIR).join(output)
        } else {
            output.to_path_buf()
        };

        let mut contents = String::new();
        for word in words {
            contents.push_str(word.as_ref());
            contents.push('\n');
        }

        let write = || -> io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, contents)
        };

        write().map_err(|source| WordlistError::Write {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), words = words.len(), "Saved wordlist");
        Ok(path)
    }

    /// Concatenates several wordlists and saves the result.
    ///
    /// With `dedup`, only the first occurrence of each word is kept.
    pub fn merge<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        output: impl AsRef<Path>,
        dedup: bool,
    ) -> Result<PathBuf, WordlistError> {
        let mut merged = Vec::new();
        for input in inputs {
            merged.extend(self.load(input)?);
        }

        if dedup {
            let mut seen = std::collections::HashSet::new();
            merged.retain(|word| seen.insert(word.clone()));
        }

        self.save(&merged, output)
    }

    /// Lists `*.txt` files under the base directory, relative and sorted.
    pub fn list_available(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        let mut pending = vec![self.base_dir.clone()];

        while let Some(dir) = pending.pop() {
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == "txt") {
                    if let Ok(rel) = path.strip_prefix(&self.base_dir) {
                        found.push(rel.to_path_buf());
                    }
                }
            }
        }

        found.sort();
        found
    }
}

/// Reads non-empty, non-comment lines, trimmed. Invalid UTF-8 is replaced.
fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

fn fallback_wordlist(path: &Path) -> Vec<String> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let list: &[&str] = if name.contains("user") {
        &DEFAULT_USERNAMES
    } else if name.contains("pass") {
        &DEFAULT_PASSWORDS
    } else {
        &[]
    };

    list.iter().map(|s| s.to_string()).collect()
}

fn builtin_pairs() -> Vec<CredentialPair> {
    DEFAULT_PAIRS.iter().map(|&pair| pair.into()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(files: &[(&str, &str)]) -> (tempfile::TempDir, WordlistStore) {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        let store = WordlistStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_load_skips_comments_and_blanks() {
        let (_dir, store) = store_with(&[("users.txt", "# header\nroot\n\n  admin  \n#x\nguest\n")]);
        assert_eq!(store.load("users.txt").unwrap(), vec!["root", "admin", "guest"]);
    }

    #[test]
    fn test_missing_file_fallbacks() {
        let (_dir, store) = store_with(&[]);
        assert_eq!(store.load("common_users.txt").unwrap(), DEFAULT_USERNAMES.to_vec());
        assert_eq!(store.load("passwords.txt").unwrap(), DEFAULT_PASSWORDS.to_vec());
        assert!(store.load("other.txt").unwrap().is_empty());
    }

    #[test]
    fn test_absolute_path_ignores_base() {
        let (dir, _) = store_with(&[("abs.txt", "one\ntwo\n")]);
        let store = WordlistStore::new("/nonexistent-base");
        let words = store.load(dir.path().join("abs.txt")).unwrap();
        assert_eq!(words, vec!["one", "two"]);
    }

    #[test]
    fn test_unreadable_path_is_error() {
        // A directory cannot be read as a file.
        let (dir, store) = store_with(&[]);
        fs::create_dir(dir.path().join("users.txt")).unwrap();
        assert!(matches!(store.load("users.txt"), Err(WordlistError::Read { .. })));
    }

    #[test]
    fn test_load_default_pairs() {
        let (_dir, store) = store_with(&[("pairs.txt", "# defaults\nroot:toor\nbadline\npi:raspberry\nadmin:\n")]);
        let pairs = store.load_default_pairs("pairs.txt").unwrap();
        assert_eq!(
            pairs,
            vec![
                CredentialPair::new("root", "toor"),
                CredentialPair::new("pi", "raspberry"),
                CredentialPair::new("admin", ""),
            ]
        );
    }

    #[test]
    fn test_builtin_pairs_when_missing() {
        let (_dir, store) = store_with(&[]);
        let pairs = store.load_default_pairs_or_builtin(None).unwrap();
        assert_eq!(pairs.len(), 19);
        assert_eq!(pairs[0], CredentialPair::new("root", "root"));
        assert!(pairs.contains(&CredentialPair::new("root", "")));
    }

    #[test]
    fn test_save_bare_name_goes_to_custom() {
        let (dir, store) = store_with(&[]);
        let path = store.save(&["a", "b"], "mine.txt").unwrap();
        assert_eq!(path, dir.path().join("custom").join("mine.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_merge_dedup_keeps_first_order() {
        let (dir, store) = store_with(&[("a.txt", "x\ny\n"), ("b.txt", "y\nz\nx\n")]);
        let out = dir.path().join("merged.txt");
        store.merge(&["a.txt", "b.txt"], &out, true).unwrap();
        assert_eq!(store.load(&out).unwrap(), vec!["x", "y", "z"]);

        store.merge(&["a.txt", "b.txt"], &out, false).unwrap();
        assert_eq!(store.load(&out).unwrap().len(), 5);
    }

    #[test]
    fn test_list_available() {
        let (dir, store) = store_with(&[("b.txt", ""), ("a.txt", ""), ("notes.md", "")]);
        fs::create_dir(dir.path().join("custom")).unwrap();
        fs::write(dir.path().join("custom").join("c.txt"), "").unwrap();

        let listed = store.list_available();
        assert_eq!(
            listed,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("custom").join("c.txt"),
            ]
        );
    }
}
