//! Matchup splitting and pick-side resolution.

use serde::{Deserialize, Serialize};

use super::teams::TeamDirectory;

/// Matchup separators, tried in this order; the first one present wins.
pub const SEPARATORS: [&str; 4] = ["@", " / ", " vs ", " vs. "];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Away,
    Home,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Away => Side::Home,
            Side::Home => Side::Away,
        }
    }
}

/// Two sides of a game. `home` is empty for single-team picks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub away: String,
    pub home: String,
}

impl Matchup {
    pub fn is_single_team(&self) -> bool {
        self.home.is_empty()
    }

    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Away => &self.away,
            Side::Home => &self.home,
        }
    }
}

/// Byte offset and length of the first separator present in `text`.
/// Matching is ASCII case-insensitive, so offsets line up with `text`.
pub fn find_separator(text: &str) -> Option<(usize, usize)> {
    let lower = text.to_ascii_lowercase();
    SEPARATORS
        .iter()
        .find_map(|sep| lower.find(sep).map(|idx| (idx, sep.len())))
}

pub fn contains_separator(text: &str) -> bool {
    find_separator(text).is_some()
}

/// Split "Raiders @ Broncos" into away/home. No separator ⇒ single-team matchup.
pub fn split_matchup(text: &str) -> Matchup {
    match find_separator(text) {
        Some((idx, len)) => Matchup {
            away: text[..idx].trim().to_string(),
            home: text[idx + len..].trim().to_string(),
        },
        None => Matchup {
            away: text.trim().to_string(),
            home: String::new(),
        },
    }
}

/// Lower-case and drop everything that is not alphanumeric.
/// "Los Angeles Lakers" → "losangeleslakers"
pub fn normalize_team(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Short code for a team: directory entry first, else word initials
/// ("Los Angeles Lakers" → "LAL"), single words use their first three letters.
pub fn team_abbreviation(team: &str, directory: &dyn TeamDirectory) -> String {
    if let Some(abbr) = directory.abbreviation(team) {
        return abbr;
    }
    let words: Vec<&str> = team
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    match words.as_slice() {
        [] => String::new(),
        [single] => single.chars().take(3).collect::<String>().to_uppercase(),
        many => many
            .iter()
            .filter_map(|w| w.chars().next())
            .collect::<String>()
            .to_uppercase(),
    }
}

fn names_overlap(normalized_pick: &str, team: &str) -> bool {
    let team_norm = normalize_team(team);
    !team_norm.is_empty()
        && (team_norm.contains(normalized_pick) || normalized_pick.contains(&team_norm))
}

fn abbreviation_matches(normalized_pick: &str, team: &str, directory: &dyn TeamDirectory) -> bool {
    if normalize_team(team).is_empty() {
        return false;
    }
    normalize_team(&team_abbreviation(team, directory)) == normalized_pick
}

/// Labels this short are treated as codes, not names.
const SHORT_LABEL_LEN: usize = 4;

/// How strongly a scoreboard label names `team`, 0 for no match.
///
/// Exact name or abbreviation beats a prefix, which beats a bare substring.
/// A short code buried inside a longer name ("NE" in "Tennessee") only
/// scores 1, so the team it abbreviates wins the comparison.
pub fn label_match_strength(label: &str, team: &str, directory: &dyn TeamDirectory) -> u8 {
    let label_norm = normalize_team(label);
    let team_norm = normalize_team(team);
    if label_norm.is_empty() || team_norm.is_empty() {
        return 0;
    }
    if label_norm == team_norm || abbreviation_matches(&label_norm, team, directory) {
        return 3;
    }
    let word_prefix = team
        .split(|c: char| !c.is_alphanumeric())
        .map(normalize_team)
        .any(|w| !w.is_empty() && w.starts_with(&label_norm));
    if team_norm.starts_with(&label_norm) || word_prefix || label_norm.contains(&team_norm) {
        return 2;
    }
    if team_norm.contains(&label_norm) {
        return if label_norm.len() <= SHORT_LABEL_LEN { 1 } else { 2 };
    }
    0
}

/// Decide which side of `matchup` the pick text refers to.
///
/// Name containment is tried for away then home before any abbreviation
/// fallback; `None` when nothing matches.
pub fn resolve_side(
    pick_team_text: &str,
    matchup: &Matchup,
    directory: &dyn TeamDirectory,
) -> Option<Side> {
    let pick = normalize_team(pick_team_text);
    if pick.is_empty() {
        return None;
    }
    for side in [Side::Away, Side::Home] {
        if names_overlap(&pick, matchup.team(side)) {
            return Some(side);
        }
    }
    [Side::Away, Side::Home]
        .into_iter()
        .find(|side| abbreviation_matches(&pick, matchup.team(*side), directory))
}
