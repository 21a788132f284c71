//! Badge and tooltip strings for the picks table.

use serde::{Deserialize, Serialize};

use super::coverage::{CoverageResult, CoverageState};
use super::scoreboard::ScoreboardSnapshot;
use super::selection::{BetKind, Selection};
use super::status::StatusDecision;

/// Joins the margin phrase and the phase phrase.
pub const BADGE_SEPARATOR: &str = " · ";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPresentation {
    pub badge_text: String,
    pub tooltip_text: String,
}

/// Already-evaluated parlay leg, as listed in the parent's tooltip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegSummary {
    pub description: String,
    pub label: String,
    pub badge: String,
}

/// Everything the formatter reads. Borrowed; nothing is retained.
#[derive(Debug, Clone, Copy)]
pub struct PresentationInput<'a> {
    pub selection: &'a Selection,
    pub snapshot: &'a ScoreboardSnapshot,
    pub coverage: &'a CoverageResult,
    pub decision: Option<&'a StatusDecision>,
    pub result_text: &'a str,
    pub raw_status: &'a str,
    pub legs: &'a [LegSummary],
}

/// Magnitude to one decimal place, trailing ".0" dropped: 4.5 → "4.5", 3.0 → "3".
pub fn format_points(value: f64) -> String {
    let rounded = (value.abs() * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

fn signed_points(value: f64) -> String {
    let magnitude = format_points(value);
    if magnitude == "0" {
        magnitude
    } else if value > 0.0 {
        format!("+{}", magnitude)
    } else {
        format!("-{}", magnitude)
    }
}

/// "Covering by 4.5", "Over 145.5: -5.5", "Up 3"; `None` when coverage is unknown.
pub fn margin_phrase(selection: &Selection, coverage: &CoverageResult) -> Option<String> {
    if coverage.state == CoverageState::Unknown {
        return None;
    }
    match selection.kind {
        BetKind::Spread => {
            let m = coverage.margin?;
            Some(match coverage.state {
                CoverageState::Covering => format!("Covering by {}", format_points(m)),
                CoverageState::Trailing => format!("Need {}", format_points(m)),
                _ => "On the number".to_string(),
            })
        }
        BetKind::Total | BetKind::TeamTotal => {
            let m = coverage.margin?;
            let direction = selection.direction?;
            let prefix = if selection.kind == BetKind::TeamTotal { "TT " } else { "" };
            let line = selection.line.map(format_points).unwrap_or_default();
            let amount = if coverage.state == CoverageState::Push {
                "on the number".to_string()
            } else {
                signed_points(m)
            };
            Some(format!("{}{} {}: {}", prefix, direction.label(), line, amount))
        }
        BetKind::Moneyline => {
            let d = coverage.diff?;
            Some(if d > 0.0 {
                format!("Up {}", format_points(d))
            } else if d < 0.0 {
                format!("Down {}", format_points(d))
            } else {
                "Tied".to_string()
            })
        }
        BetKind::Unknown => None,
    }
}

/// Phase label, compacted to "Q4 2:15" when both period and clock are known.
pub fn phase_phrase(snapshot: &ScoreboardSnapshot) -> Option<String> {
    let settled = snapshot.is_final || snapshot.is_halftime || snapshot.is_pre_game;
    if !settled && !snapshot.clock.is_empty() && !snapshot.period.is_empty() {
        return Some(format!("{} {}", snapshot.period, snapshot.clock));
    }
    let label = snapshot.phase_label.trim();
    (!label.is_empty()).then(|| label.to_string())
}

fn join_phrases(margin: Option<String>, phase: Option<String>) -> String {
    match (margin, phase) {
        (Some(m), Some(p)) => format!("{}{}{}", m, BADGE_SEPARATOR, p),
        (Some(m), None) => m,
        (None, Some(p)) => p,
        (None, None) => String::new(),
    }
}

fn leg_line(index: usize, leg: &LegSummary) -> String {
    let mut line = format!(
        "{}. {}{}{}",
        index + 1,
        leg.description.trim(),
        BADGE_SEPARATOR,
        leg.label
    );
    if !leg.badge.is_empty() {
        line.push_str(BADGE_SEPARATOR);
        line.push_str(&leg.badge);
    }
    line
}

/// Build badge and tooltip. Never fails; at worst both are empty.
pub fn present(input: &PresentationInput<'_>) -> StatusPresentation {
    let badge_text = join_phrases(
        margin_phrase(input.selection, input.coverage),
        phase_phrase(input.snapshot),
    );

    let decision_label = input.decision.map(|d| d.label.as_str()).unwrap_or_default();
    let headline = [
        badge_text.as_str(),
        input.snapshot.score_text.as_str(),
        input.result_text,
        decision_label,
        input.raw_status,
    ]
    .into_iter()
    .map(str::trim)
    .find(|s| !s.is_empty())
    .unwrap_or_default()
    .to_string();

    let tooltip_text = if input.legs.is_empty() {
        headline
    } else {
        let mut lines = Vec::with_capacity(input.legs.len() + 1);
        if !headline.is_empty() {
            lines.push(headline);
        }
        lines.extend(input.legs.iter().enumerate().map(|(i, leg)| leg_line(i, leg)));
        lines.join("\n")
    };

    StatusPresentation {
        badge_text,
        tooltip_text,
    }
}
