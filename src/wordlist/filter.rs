//! Wordlist filtering and statistics.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

/// Criteria a word must satisfy to survive [`filter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordFilter {
    /// Minimum length in characters
    pub min_len: usize,
    /// Maximum length in characters, if bounded
    pub max_len: Option<usize>,
    /// Case-insensitive substring every word must contain
    pub contains: Option<String>,
}

impl Default for WordFilter {
    fn default() -> Self {
        Self {
            min_len: 1,
            max_len: None,
            contains: None,
        }
    }
}

impl WordFilter {
    /// Returns true if `word` satisfies every criterion.
    pub fn accepts(&self, word: &str) -> bool {
        let len = word.chars().count();
        if len < self.min_len {
            return false;
        }
        if self.max_len.is_some_and(|max| len > max) {
            return false;
        }
        match &self.contains {
            Some(needle) => word.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        }
    }
}

/// Keeps the words accepted by `criteria`, preserving order.
pub fn filter<S: AsRef<str>>(words: &[S], criteria: &WordFilter) -> Vec<String> {
    words
        .iter()
        .map(AsRef::as_ref)
        .filter(|word| criteria.accepts(word))
        .map(String::from)
        .collect()
}

/// Summary statistics for a wordlist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordlistStats {
    pub count: usize,
    pub min_len: usize,
    pub max_len: usize,
    pub avg_len: f64,
    pub unique: usize,
}

/// Computes length statistics; an empty list yields all zeroes.
pub fn stats<S: AsRef<str>>(words: &[S]) -> WordlistStats {
    if words.is_empty() {
        return WordlistStats::default();
    }

    let lengths: Vec<usize> = words.iter().map(|w| w.as_ref().chars().count()).collect();
    let unique: HashSet<&str> = words.iter().map(AsRef::as_ref).collect();

    WordlistStats {
        count: words.len(),
        min_len: lengths.iter().copied().min().unwrap_or(0),
        max_len: lengths.iter().copied().max().unwrap_or(0),
        avg_len: lengths.iter().sum::<usize>() as f64 / lengths.len() as f64,
        unique: unique.len(),
    }
}

/// Returns a shuffled copy of `words`.
pub fn shuffle<S: Clone, R: Rng + ?Sized>(words: &[S], rng: &mut R) -> Vec<S> {
    let mut shuffled = words.to_vec();
    shuffled.shuffle(rng);
    shuffled
}
