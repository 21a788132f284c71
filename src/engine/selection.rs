//! Freeform bet description → structured `Selection`.
//!
//! Parsing runs in two phases. The odds suffix and the game-segment phrase are
//! lifted out of the text first; the remaining body is then offered to each
//! entry of [`PARSE_RULES`] in order and the first rule that recognises it
//! wins. Nothing here fails: text no rule understands becomes
//! `BetKind::Unknown`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::matchup::{contains_separator, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BetKind {
    Spread,
    Total,
    TeamTotal,
    Moneyline,
    #[default]
    Unknown,
}

impl BetKind {
    /// Kinds whose outcome depends on which team was picked.
    pub fn is_side_dependent(self) -> bool {
        matches!(self, BetKind::Spread | BetKind::TeamTotal | BetKind::Moneyline)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Over,
    Under,
}

impl Direction {
    fn from_keyword(keyword: &str) -> Option<Direction> {
        match keyword.to_ascii_lowercase().as_str() {
            "o" | "over" => Some(Direction::Over),
            "u" | "under" => Some(Direction::Under),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Over => "Over",
            Direction::Under => "Under",
        }
    }
}

/// Portion of the game the bet settles on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Segment {
    #[default]
    FullGame,
    Half(u8),
    Quarter(u8),
    Period(u8),
}

fn ordinal(n: u8) -> String {
    let suffix = match n {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::FullGame => write!(f, "Full Game"),
            Segment::Half(n) => write!(f, "{} Half", ordinal(*n)),
            Segment::Quarter(n) => write!(f, "{} Quarter", ordinal(*n)),
            Segment::Period(n) => write!(f, "{} Period", ordinal(*n)),
        }
    }
}

/// Structured meaning of one pick's description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub kind: BetKind,
    /// Filled in by side resolution once the matchup is known
    pub side: Option<Side>,
    /// Signed from the picked team's perspective for spreads
    pub line: Option<f64>,
    pub direction: Option<Direction>,
    pub raw_team_text: String,
    /// American odds, e.g. -110 / +150
    pub odds: Option<i32>,
    pub segment: Segment,
}

impl Selection {
    fn of_kind(kind: BetKind) -> Self {
        Selection {
            kind,
            ..Selection::default()
        }
    }

    /// Copy of this selection bound to `side`.
    pub fn with_side(&self, side: Option<Side>) -> Selection {
        Selection {
            side,
            ..self.clone()
        }
    }
}

/// One recognisable description shape.
pub struct ParseRule {
    pub name: &'static str,
    pub apply: fn(&str) -> Option<Selection>,
}

/// Rule priority, highest first. Order matters: the team-total shape
/// `Raiders O 15` must be claimed before the looser total and spread rules
/// get a chance to misread it.
pub const PARSE_RULES: [ParseRule; 4] = [
    ParseRule {
        name: "team-total",
        apply: team_total_rule,
    },
    ParseRule {
        name: "game-total",
        apply: game_total_rule,
    },
    ParseRule {
        name: "moneyline",
        apply: moneyline_rule,
    },
    ParseRule {
        name: "spread",
        apply: spread_rule,
    },
];

static ODDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*([+\-−]?\s*\d+|(?i:even|ev))\s*\)\s*$").unwrap());

static SEGMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?P<ord>1st|2nd|3rd|4th|first|second|third|fourth)\s+(?P<unit>half|quarter|qtr|period))\b|\b(?P<sh>[12])h\b|\b(?P<sq>[1-4])q\b",
    )
    .unwrap()
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static TEAM_TOTAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?P<team>.+?)\s+(?P<tt>team\s+total\s+)?(?P<dir>over|under|o|u)\s*(?P<line>\d+(?:\.\d+)?)$",
    )
    .unwrap()
});

static LONG_DIRECTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(over|under)\b").unwrap());

static TOTAL_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(over|under|o|u)\s*(\d+(?:\.\d+)?)").unwrap());

static MONEYLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(moneyline|money\s+line|ml)\b").unwrap());

static SPREAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<team>.+?)\s+(?P<line>[+\-−]\s?\d+(?:\.\d+)?|pk|pick'?em|pick)$").unwrap()
});

/// Parse a freeform description. Never fails.
pub fn parse_description(text: &str) -> Selection {
    let (body, odds) = split_odds(text);
    let (body, segment) = split_segment(&body);
    let body = tidy(&body);

    let mut selection = PARSE_RULES
        .iter()
        .find_map(|rule| {
            let parsed = (rule.apply)(&body)?;
            debug!("Parsed '{}' as {:?} via {} rule", text, parsed.kind, rule.name);
            Some(parsed)
        })
        .unwrap_or_default();

    selection.odds = odds;
    selection.segment = segment;
    selection
}

/// Parse American odds such as "-110", "+150", "(−120)" or "EVEN".
pub fn parse_odds(text: &str) -> Option<i32> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '−' { '-' } else { c })
        .collect();
    if cleaned.eq_ignore_ascii_case("even") || cleaned.eq_ignore_ascii_case("ev") {
        return Some(100);
    }
    cleaned.trim_start_matches('+').parse().ok()
}

/// Strip a trailing "(±N)" odds suffix.
pub fn split_odds(text: &str) -> (String, Option<i32>) {
    match ODDS_RE.captures(text) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.start()).unwrap_or(text.len());
            let odds = caps.get(1).and_then(|m| parse_odds(m.as_str()));
            (text[..whole].to_string(), odds)
        }
        None => (text.to_string(), None),
    }
}

/// Strip the first segment phrase ("1st Half", "2H", "3rd Quarter").
pub fn split_segment(text: &str) -> (String, Segment) {
    let Some(caps) = SEGMENT_RE.captures(text) else {
        return (text.to_string(), Segment::FullGame);
    };
    let segment = if let (Some(ord), Some(unit)) = (caps.name("ord"), caps.name("unit")) {
        let n = match ord.as_str().to_ascii_lowercase().as_str() {
            "1st" | "first" => 1,
            "2nd" | "second" => 2,
            "3rd" | "third" => 3,
            _ => 4,
        };
        match unit.as_str().to_ascii_lowercase().as_str() {
            "half" => Segment::Half(n.min(2)),
            "period" => Segment::Period(n),
            _ => Segment::Quarter(n),
        }
    } else if let Some(h) = caps.name("sh") {
        Segment::Half(h.as_str().parse().unwrap_or(1))
    } else if let Some(q) = caps.name("sq") {
        Segment::Quarter(q.as_str().parse().unwrap_or(1))
    } else {
        Segment::FullGame
    };
    let range = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
    let mut rest = String::with_capacity(text.len());
    rest.push_str(&text[..range.start]);
    rest.push(' ');
    rest.push_str(&text[range.end..]);
    (rest, segment)
}

fn tidy(text: &str) -> String {
    WHITESPACE_RE
        .replace_all(text, " ")
        .trim_matches(|c: char| c.is_whitespace() || c == ',' || c == ':')
        .to_string()
}

fn trim_label(text: &str) -> String {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ':' | '-' | '–'))
        .to_string()
}

fn parse_line(text: &str) -> Option<f64> {
    let lower = text.to_ascii_lowercase();
    if lower.starts_with("pk") || lower.starts_with("pick") {
        return Some(0.0);
    }
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '−' { '-' } else { c })
        .collect();
    cleaned.trim_start_matches('+').parse().ok()
}

/// `Raiders O 15`, `Raiders Team Total Over 15`; never when a matchup separator is present.
pub fn team_total_rule(body: &str) -> Option<Selection> {
    if contains_separator(body) {
        return None;
    }
    let caps = TEAM_TOTAL_RE.captures(body)?;
    let dir = caps.name("dir")?.as_str();
    if caps.name("tt").is_none() && dir.len() != 1 {
        return None;
    }
    Some(Selection {
        direction: Direction::from_keyword(dir),
        line: caps.name("line").and_then(|m| m.as_str().parse().ok()),
        raw_team_text: trim_label(caps.name("team")?.as_str()),
        ..Selection::of_kind(BetKind::TeamTotal)
    })
}

/// Game total on both teams' combined score: `Raiders @ Broncos Under 43`.
pub fn game_total_rule(body: &str) -> Option<Selection> {
    let keyword = LONG_DIRECTION_RE
        .find(body)
        .or_else(|| TOTAL_LINE_RE.captures(body).and_then(|c| c.get(1)))?;

    let mut selection = Selection::of_kind(BetKind::Total);
    match TOTAL_LINE_RE.captures(body) {
        Some(caps) => {
            selection.direction = caps.get(1).and_then(|m| Direction::from_keyword(m.as_str()));
            selection.line = caps.get(2).and_then(|m| m.as_str().parse().ok());
            let start = caps.get(0).map(|m| m.start()).unwrap_or(keyword.start());
            selection.raw_team_text = trim_label(&body[..start]);
        }
        None => {
            selection.direction = Direction::from_keyword(keyword.as_str());
            selection.raw_team_text = trim_label(&body[..keyword.start()]);
        }
    }
    Some(selection)
}

/// `Phoenix Suns Moneyline`, `Suns ML`.
pub fn moneyline_rule(body: &str) -> Option<Selection> {
    let keyword = MONEYLINE_RE.find(body)?;
    let before = &body[..keyword.start()];
    let before = before.split('@').next().unwrap_or_default();
    let mut team = trim_label(before);
    if team.is_empty() {
        team = trim_label(&body[keyword.end()..]);
    }
    Some(Selection {
        raw_team_text: team,
        ..Selection::of_kind(BetKind::Moneyline)
    })
}

/// `Phoenix Suns -2`, `Raiders +3.5`, `Chiefs PK`.
pub fn spread_rule(body: &str) -> Option<Selection> {
    let caps = SPREAD_RE.captures(body)?;
    let line = parse_line(caps.name("line")?.as_str())?;
    Some(Selection {
        line: Some(line),
        raw_team_text: trim_label(caps.name("team")?.as_str()),
        ..Selection::of_kind(BetKind::Spread)
    })
}
