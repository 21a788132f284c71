//! Freeform scoreboard text → numeric scores and game phase.
//!
//! Feeds hand us strings like `"DEN 21 - PHI 17 (Q4 2:15)"`, `"21-17 Final"`
//! or `"7:30 PM ET"`. Scores that cannot be read stay `None` (never zero) so
//! coverage downstream reports `unknown` instead of a false reading.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::matchup::{label_match_strength, Matchup};
use super::teams::TeamDirectory;

/// Point-in-time reading of one game. Rebuilt on every evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreboardSnapshot {
    pub away_score: Option<u32>,
    pub home_score: Option<u32>,
    pub is_final: bool,
    pub is_halftime: bool,
    pub is_pre_game: bool,
    /// e.g. "2:15"
    pub clock: String,
    /// e.g. "Q4", "OT", "2H"
    pub period: String,
    pub phase_label: String,
    /// Score portion of the text with the phase suffix removed
    pub score_text: String,
}

impl ScoreboardSnapshot {
    pub fn has_scores(&self) -> bool {
        self.away_score.is_some() && self.home_score.is_some()
    }

    pub fn is_live(&self) -> bool {
        self.has_scores() && !self.is_final && !self.is_pre_game
    }
}

static PHASE_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^()]*)\)\s*$").unwrap());

static SCORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<l1>.*?)\s*(?P<s1>\d+)\s*[-–—]\s*(?P<l2>\D*?)\s*(?P<s2>\d+)(?P<rest>.*)$")
        .unwrap()
});

static PHASE_KEYWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(final|f/\d*ot|half|halftime|ht|\d?ot|q[1-4])\b").unwrap());

static FINAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bfinal\b|\bf/\d*ot\b|\bft\b").unwrap());

static IN_PLAY_HALF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(1st|2nd|first|second)\s+half\b").unwrap());

static HALFTIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bhalf[\s-]?time\b|\bht\b|\bend\s+of\s+(1st|first)\s+half\b").unwrap()
});

static PRE_GAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(et|est|edt|ct|pt|am|pm|start|starts|tip|tipoff|tip-off|kickoff|scheduled)\b|\d(am|pm)\b",
    )
    .unwrap()
});

static CLOCK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2}:\d{2})\b").unwrap());

static PERIOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?P<ord>1st|2nd|3rd|4th)(?:\s+(?P<unit>half|period|quarter|qtr))?\b|\b(?P<code>q[1-9]|\d?ot|[12]h)\b")
        .unwrap()
});

/// Read scores and phase out of `result_text` for the given matchup.
pub fn normalize_scoreboard(
    result_text: &str,
    matchup: &Matchup,
    directory: &dyn TeamDirectory,
) -> ScoreboardSnapshot {
    let text = result_text.trim();
    let (score_text, suffix) = match PHASE_SUFFIX_RE.captures(text) {
        Some(caps) => {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(text.len());
            let phase = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            (text[..start].trim(), Some(phase))
        }
        None => (text, None),
    };

    let mut snapshot = ScoreboardSnapshot {
        score_text: score_text.to_string(),
        ..ScoreboardSnapshot::default()
    };

    let mut residue: Option<String> = None;
    if let Some(caps) = SCORE_RE.captures(score_text) {
        let l1 = caps.name("l1").map(|m| m.as_str().trim()).unwrap_or_default();
        let l2 = caps.name("l2").map(|m| m.as_str().trim()).unwrap_or_default();
        let s1 = caps.name("s1").and_then(|m| m.as_str().parse::<u32>().ok());
        let s2 = caps.name("s2").and_then(|m| m.as_str().parse::<u32>().ok());

        let first_is_home = first_score_is_home(l1, l2, matchup, directory);
        if first_is_home {
            snapshot.home_score = s1;
            snapshot.away_score = s2;
        } else {
            snapshot.away_score = s1;
            snapshot.home_score = s2;
        }

        let rest = caps.name("rest").map(|m| m.as_str().trim()).unwrap_or_default();
        residue = if !rest.is_empty() {
            Some(rest.to_string())
        } else if PHASE_KEYWORD_RE.is_match(l1) {
            Some(l1.to_string())
        } else {
            Some(String::new())
        };
    } else {
        trace!("No score pattern in '{}'", score_text);
    }

    let phase_text = match (suffix, residue) {
        (Some(phase), _) => phase.to_string(),
        (None, Some(residue)) => residue,
        (None, None) => text.to_string(),
    };

    classify_phase(&phase_text, &mut snapshot);
    snapshot
}

/// The first label decides when it names one team more strongly than the
/// other; a tie defers to the second label, and no signal means first = away.
fn first_score_is_home(
    first_label: &str,
    second_label: &str,
    matchup: &Matchup,
    directory: &dyn TeamDirectory,
) -> bool {
    let first_home = label_match_strength(first_label, &matchup.home, directory);
    let first_away = label_match_strength(first_label, &matchup.away, directory);
    if first_home != first_away {
        return first_home > first_away;
    }
    let second_home = label_match_strength(second_label, &matchup.home, directory);
    let second_away = label_match_strength(second_label, &matchup.away, directory);
    second_away > second_home
}

fn classify_phase(phase_text: &str, snapshot: &mut ScoreboardSnapshot) {
    snapshot.is_final = FINAL_RE.is_match(phase_text);
    snapshot.is_halftime = !snapshot.is_final
        && (HALFTIME_RE.is_match(phase_text)
            || (phase_text.to_ascii_uppercase().contains("HALF")
                && !IN_PLAY_HALF_RE.is_match(phase_text)));
    snapshot.is_pre_game =
        !snapshot.is_final && !snapshot.is_halftime && PRE_GAME_RE.is_match(phase_text);

    if !snapshot.is_pre_game {
        snapshot.clock = CLOCK_RE
            .captures(phase_text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
    }
    snapshot.period = extract_period(phase_text);

    snapshot.phase_label = if snapshot.is_final {
        "Final".to_string()
    } else if snapshot.is_halftime {
        "Halftime".to_string()
    } else if snapshot.is_pre_game {
        phase_text.to_string()
    } else {
        match (snapshot.clock.is_empty(), snapshot.period.is_empty()) {
            (false, false) => format!("{} left in {}", snapshot.clock, snapshot.period),
            (false, true) => snapshot.clock.clone(),
            (true, false) => snapshot.period.clone(),
            (true, true) => phase_text.to_string(),
        }
    };
}

/// Period code in canonical form: "1ST" → "Q1", "2ND HALF" → "2H", "3RD PERIOD" → "P3".
pub fn extract_period(phase_text: &str) -> String {
    let Some(caps) = PERIOD_RE.captures(phase_text) else {
        return String::new();
    };
    if let Some(code) = caps.name("code") {
        return code.as_str().to_ascii_uppercase();
    }
    let n = caps
        .name("ord")
        .and_then(|m| m.as_str().chars().next())
        .unwrap_or('1');
    match caps.name("unit").map(|m| m.as_str().to_ascii_lowercase()) {
        Some(unit) if unit == "half" => format!("{}H", n),
        Some(unit) if unit == "period" => format!("P{}", n),
        _ => format!("Q{}", n),
    }
}
