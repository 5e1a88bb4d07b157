//! Tag-based inclusion/exclusion filtering. `Tags` is latest-wins (a plain
//! map); `TagMatcher` treats an empty value set for a key as "any value
//! matches".

use std::collections::{HashMap, HashSet};

pub type Tags = HashMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMatcher {
    criteria: HashMap<String, HashSet<String>>,
}

impl TagMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `key=value` or bare `key` (wildcard) strings, as the CLI's
    /// repeatable `--include-tags`/`--exclude-tags` flags accept them.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut criteria: HashMap<String, HashSet<String>> = HashMap::new();
        for pair in pairs {
            let pair = pair.as_ref();
            match pair.split_once('=') {
                Some((key, value)) => {
                    criteria.entry(key.to_string()).or_default().insert(value.to_string());
                }
                None => {
                    criteria.entry(pair.to_string()).or_default();
                }
            }
        }
        Self { criteria }
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// True if `tags` satisfies every key/value criterion in this matcher.
    /// An empty matcher matches everything (vacuous truth), matching how
    /// `include-tags` with nothing supplied means "no inclusion
    /// restriction".
    pub fn matches(&self, tags: &Tags) -> bool {
        self.criteria.iter().all(|(key, values)| match tags.get(key) {
            Some(actual) => values.is_empty() || values.contains(actual),
            None => false,
        })
    }
}
