//! Mutation generator implementation.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use rayon::prelude::*;

/// Suffixes appended to every seed by default.
pub const DEFAULT_SYMBOL_SUFFIXES: [&str; 9] = ["123", "321", "!", "@", "#", "$", "1", "01", "001"];

/// Controls which suffixes are generated for each seed word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationPolicy {
    /// Digits appended both bare (`word7`) and zero-padded (`word07`)
    pub digits: RangeInclusive<u32>,
    /// Years appended as-is (`word2024`)
    pub years: RangeInclusive<u32>,
    /// Literal suffixes (`word!`, `word123`)
    pub symbols: Vec<String>,
}

impl Default for MutationPolicy {
    fn default() -> Self {
        Self {
            digits: 0..=9,
            years: 2020..=2025,
            symbols: DEFAULT_SYMBOL_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl MutationPolicy {
    /// Replaces the year range.
    pub fn with_years(mut self, years: RangeInclusive<u32>) -> Self {
        self.years = years;
        self
    }

    /// Replaces the symbol suffix set.
    pub fn with_symbols<S: Into<String>>(mut self, symbols: impl IntoIterator<Item = S>) -> Self {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    /// Emits every variant of a single seed word, duplicates included.
    fn mutate(&self, word: &str) -> Vec<String> {
        let mut out = Vec::with_capacity(
            5 + 2 * self.digits.clone().count() + self.years.clone().count() + self.symbols.len(),
        );

        out.push(word.to_string());
        out.push(capitalize(word));
        out.push(word.to_uppercase());
        out.push(word.to_lowercase());

        for i in self.digits.clone() {
            out.push(format!("{}{}", word, i));
            out.push(format!("{}0{}", word, i));
        }

        for year in self.years.clone() {
            out.push(format!("{}{}", word, year));
        }

        for symbol in &self.symbols {
            out.push(format!("{}{}", word, symbol));
        }

        out.push(word.chars().rev().collect());
        out
    }
}

/// Parses an inclusive year range written as `start-end` or a single year.
pub fn parse_year_range(s: &str) -> Result<RangeInclusive<u32>, String> {
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|_| format!("Invalid year: {}", v.trim()))
    };

    let (start, end) = match s.split_once('-') {
        Some((start, end)) => (parse(start)?, parse(end)?),
        None => {
            let year = parse(s)?;
            (year, year)
        }
    };

    if start > end {
        return Err(format!("Year range is reversed: {}", s));
    }

    Ok(start..=end)
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Expands seed words into the deduplicated set of their mutations.
///
/// The result is fully determined by `seeds` and `policy`. Seeds are
/// processed in parallel; the sorted set makes iteration order stable too.
pub fn generate_mutations<S>(seeds: &[S], policy: &MutationPolicy) -> BTreeSet<String>
where
    S: AsRef<str> + Sync,
{
    seeds
        .par_iter()
        .flat_map_iter(|seed| policy.mutate(seed.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_mutations() {
        let set = generate_mutations(&["password"], &MutationPolicy::default());
        for expected in [
            "password",
            "Password",
            "PASSWORD",
            "password1",
            "password123",
            "password2024",
            "drowssap",
            "password07",
            "password!",
        ] {
            assert!(set.contains(expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_mutation_count() {
        // 4 case forms collapse to 3 ("password" == lower), 20 digit forms,
        // 6 years, 9 symbols, 1 reversal; "password1" and "password01"
        // appear both as digit and symbol suffixes.
        let set = generate_mutations(&["password"], &MutationPolicy::default());
        assert_eq!(set.len(), 3 + 20 + 6 + 9 + 1 - 2);
    }

    #[test]
    fn test_deterministic() {
        let seeds = ["admin", "Summer", "qwerty"];
        let policy = MutationPolicy::default();
        assert_eq!(generate_mutations(&seeds, &policy), generate_mutations(&seeds, &policy));
    }

    #[test]
    fn test_empty_seed() {
        let set = generate_mutations(&[""], &MutationPolicy::default());
        assert!(set.contains(""));
        assert!(set.contains("0"));
        assert!(set.contains("00"));
        assert!(set.contains("2020"));
        assert!(set.contains("!"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("hELLO"), "Hello");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "Élan");
    }

    #[test]
    fn test_custom_policy() {
        let policy = MutationPolicy::default()
            .with_years(1999..=1999)
            .with_symbols(["?"]);
        let set = generate_mutations(&["abc"], &policy);
        assert!(set.contains("abc1999"));
        assert!(set.contains("abc?"));
        assert!(!set.contains("abc2024"));
        assert!(!set.contains("abc!"));
    }

    #[test]
    fn test_parse_year_range() {
        assert_eq!(parse_year_range("2019-2021").unwrap(), 2019..=2021);
        assert_eq!(parse_year_range("2024").unwrap(), 2024..=2024);
        assert!(parse_year_range("2025-2020").is_err());
        assert!(parse_year_range("soon").is_err());
    }
}
