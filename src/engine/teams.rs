//! Read-only team lookup capability.
//!
//! The engine never reaches for a global team table; callers hand it a
//! `TeamDirectory` so short-code lookups stay injectable and testable.

use std::collections::HashMap;

use super::matchup::normalize_team;

/// Source of team short codes ("Denver Broncos" → "DEN").
pub trait TeamDirectory: Send + Sync {
    /// Abbreviation for a full team name, if known.
    fn abbreviation(&self, team: &str) -> Option<String>;
}

/// Directory that knows nothing; abbreviations fall back to initials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDirectory;

impl TeamDirectory for NoDirectory {
    fn abbreviation(&self, _team: &str) -> Option<String> {
        None
    }
}

/// In-memory directory keyed by normalized team name.
#[derive(Debug, Clone, Default)]
pub struct StaticTeamDirectory {
    /// normalized name → upper-case abbreviation
    by_name: HashMap<String, String>,
}

impl StaticTeamDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, abbreviation)` pairs; later duplicates win.
    pub fn from_pairs<I, N, A>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, A)>,
        N: AsRef<str>,
        A: AsRef<str>,
    {
        let mut dir = Self::new();
        for (name, abbr) in pairs {
            dir.insert(name.as_ref(), abbr.as_ref());
        }
        dir
    }

    pub fn insert(&mut self, name: &str, abbreviation: &str) {
        let key = normalize_team(name);
        let abbr = abbreviation.trim().to_uppercase();
        if key.is_empty() || abbr.is_empty() {
            return;
        }
        self.by_name.insert(key, abbr);
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl TeamDirectory for StaticTeamDirectory {
    fn abbreviation(&self, team: &str) -> Option<String> {
        self.by_name.get(&normalize_team(team)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_directory_lookup_ignores_case_and_punctuation() {
        let dir = StaticTeamDirectory::from_pairs([("Denver Broncos", "den")]);
        assert_eq!(dir.abbreviation("denver broncos"), Some("DEN".to_string()));
        assert_eq!(dir.abbreviation("Denver-Broncos!"), Some("DEN".to_string()));
        assert_eq!(dir.abbreviation("Broncos"), None);
    }

    #[test]
    fn test_static_directory_skips_blank_entries() {
        let mut dir = StaticTeamDirectory::new();
        dir.insert("", "XYZ");
        dir.insert("Raiders", "  ");
        assert!(dir.is_empty());
    }

    #[test]
    fn test_no_directory_knows_nothing() {
        assert_eq!(NoDirectory.abbreviation("Denver Broncos"), None);
    }
}
