//! Pick coverage and status engine.
//!
//! One pass per pick, every stage a pure function of the previous one:
//!
//! description ─▶ `selection` ─┐
//! matchup text ─▶ `matchup` ──┼─▶ `coverage` ─▶ `status` ─▶ `presentation`
//! result text ─▶ `scoreboard` ┘
//!
//! `PickEngine` only holds read-only configuration, so one instance can be
//! shared across tasks and evaluated in any order.

pub mod coverage;
pub mod matchup;
pub mod presentation;
pub mod scoreboard;
pub mod selection;
pub mod status;
pub mod teams;

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::models::{PickOutcome, PickRecord};

use coverage::{evaluate, CoverageResult};
use matchup::{resolve_side, split_matchup, Matchup};
use presentation::{present, LegSummary, PresentationInput, StatusPresentation};
use scoreboard::{normalize_scoreboard, ScoreboardSnapshot};
use selection::{parse_description, parse_odds, Selection};
use status::{decide, LivePolicy, StatusDecision, StatusKey};
use teams::{NoDirectory, TeamDirectory};

/// Every intermediate value produced for one pick.
#[derive(Debug, Clone, PartialEq)]
pub struct PickEvaluation {
    pub selection: Selection,
    pub matchup: Matchup,
    pub snapshot: ScoreboardSnapshot,
    pub coverage: CoverageResult,
    pub decision: StatusDecision,
    pub presentation: StatusPresentation,
    /// Per-leg evaluations for parlays; empty otherwise
    pub legs: Vec<PickEvaluation>,
}

#[derive(Clone)]
pub struct PickEngine {
    directory: Arc<dyn TeamDirectory>,
    policy: LivePolicy,
}

impl Default for PickEngine {
    fn default() -> Self {
        PickEngine::new(Arc::new(NoDirectory), LivePolicy::default())
    }
}

impl PickEngine {
    pub fn new(directory: Arc<dyn TeamDirectory>, policy: LivePolicy) -> Self {
        PickEngine { directory, policy }
    }

    pub fn policy(&self) -> &LivePolicy {
        &self.policy
    }

    /// Evaluate one pick into the fields the table and KPI views consume.
    pub fn evaluate(&self, record: &PickRecord) -> PickOutcome {
        let eval = self.evaluate_detailed(record);
        PickOutcome {
            key: record.key(),
            status_key: eval.decision.key,
            status_label: eval.decision.label,
            badge_text: eval.presentation.badge_text,
            tooltip_text: eval.presentation.tooltip_text,
        }
    }

    pub fn evaluate_all(&self, records: &[PickRecord]) -> Vec<PickOutcome> {
        records.iter().map(|r| self.evaluate(r)).collect()
    }

    /// Run the full pipeline, keeping every stage's output.
    pub fn evaluate_detailed(&self, record: &PickRecord) -> PickEvaluation {
        if record.is_parlay() {
            return self.evaluate_parlay(record);
        }
        let directory = self.directory.as_ref();

        let parsed = parse_description(&record.description);
        let odds = parsed.odds.or_else(|| parse_odds(&record.odds_text));

        let matchup = if record.matchup_text.trim().is_empty() {
            split_matchup(&parsed.raw_team_text)
        } else {
            split_matchup(&record.matchup_text)
        };

        let side = if parsed.kind.is_side_dependent() {
            resolve_side(&parsed.raw_team_text, &matchup, directory)
        } else {
            None
        };
        let selection = Selection {
            side,
            odds,
            ..parsed
        };

        let snapshot = normalize_scoreboard(&record.result_text, &matchup, directory);
        let coverage = evaluate(&selection, &snapshot);
        let reported = StatusKey::from_reported(&record.reported_status);
        let decision = decide(reported, snapshot.is_final, &coverage, &self.policy);
        let presentation = present(&PresentationInput {
            selection: &selection,
            snapshot: &snapshot,
            coverage: &coverage,
            decision: Some(&decision),
            result_text: &record.result_text,
            raw_status: &record.reported_status,
            legs: &[],
        });

        debug!(
            "Pick '{}': {:?} side={:?} coverage={:?} → {}",
            record.description, selection.kind, selection.side, coverage.state, decision.key
        );

        PickEvaluation {
            selection,
            matchup,
            snapshot,
            coverage,
            decision,
            presentation,
            legs: Vec::new(),
        }
    }

    fn evaluate_parlay(&self, record: &PickRecord) -> PickEvaluation {
        let legs: Vec<PickEvaluation> = record
            .parlay_legs
            .iter()
            .map(|leg| self.evaluate_detailed(leg))
            .collect();
        let leg_keys: Vec<StatusKey> = legs.iter().map(|l| l.decision.key).collect();

        let reported = StatusKey::from_reported(&record.reported_status);
        let key = match reported {
            Some(k) if k.is_terminal() => k,
            _ => match combine_legs(&leg_keys) {
                StatusKey::Pending => reported.unwrap_or(StatusKey::Pending),
                combined => combined,
            },
        };
        let decision = StatusDecision::new(key);

        let hitting = leg_keys
            .iter()
            .filter(|k| matches!(k, StatusKey::Win | StatusKey::OnTrack))
            .count();
        let legs_badge = format!("{}/{} legs hitting", hitting, leg_keys.len());

        let summaries: Vec<LegSummary> = record
            .parlay_legs
            .iter()
            .zip(&legs)
            .map(|(leg, eval)| LegSummary {
                description: leg.description.clone(),
                label: eval.decision.label.clone(),
                badge: eval.presentation.badge_text.clone(),
            })
            .collect();

        let selection = parse_description(&record.description);
        let matchup = split_matchup(&record.matchup_text);
        let snapshot = normalize_scoreboard(&record.result_text, &matchup, self.directory.as_ref());
        let coverage = CoverageResult::unknown();
        let headline = if record.result_text.trim().is_empty() {
            legs_badge.as_str()
        } else {
            record.result_text.as_str()
        };
        let mut presentation = present(&PresentationInput {
            selection: &selection,
            snapshot: &snapshot,
            coverage: &coverage,
            decision: Some(&decision),
            result_text: headline,
            raw_status: &record.reported_status,
            legs: &summaries,
        });
        if presentation.badge_text.is_empty() {
            presentation.badge_text = legs_badge;
        }

        debug!(
            "Parlay '{}' ({} legs): {:?} → {}",
            record.description,
            legs.len(),
            leg_keys,
            decision.key
        );

        PickEvaluation {
            selection,
            matchup,
            snapshot,
            coverage,
            decision,
            presentation,
            legs,
        }
    }
}

/// Parlay status from its legs' statuses.
///
/// Any lost leg loses the parlay; once every leg is settled it is a win if
/// any leg won, otherwise a push. Live parlays are at-risk if any leg is,
/// on-track only when every unsettled leg is on-track.
pub fn combine_legs(legs: &[StatusKey]) -> StatusKey {
    if legs.is_empty() {
        return StatusKey::Pending;
    }
    if legs.contains(&StatusKey::Lost) {
        return StatusKey::Lost;
    }
    if legs.iter().all(|k| k.is_terminal()) {
        return if legs.contains(&StatusKey::Win) {
            StatusKey::Win
        } else {
            StatusKey::Push
        };
    }
    if legs.contains(&StatusKey::AtRisk) {
        return StatusKey::AtRisk;
    }
    if legs
        .iter()
        .filter(|k| !k.is_terminal())
        .all(|k| *k == StatusKey::OnTrack)
    {
        return StatusKey::OnTrack;
    }
    StatusKey::Pending
}

/// Count of picks per status, every status present (zero when unused).
pub fn summarize(outcomes: &[PickOutcome]) -> BTreeMap<StatusKey, usize> {
    let mut counts: BTreeMap<StatusKey, usize> = StatusKey::ALL.iter().map(|k| (*k, 0)).collect();
    for outcome in outcomes {
        *counts.entry(outcome.status_key).or_default() += 1;
    }
    counts
}
