//! Canonical pick lifecycle and the decision rule that drives it.
//!
//! ```text
//! pending ──▶ on-track ◀──▶ at-risk
//!    │            │            │
//!    └────────────┴────────────┴──▶ win | lost | push   (terminal)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::coverage::{CoverageResult, CoverageState};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum StatusKey {
    #[default]
    Pending,
    OnTrack,
    AtRisk,
    Win,
    Lost,
    Push,
}

impl StatusKey {
    pub const ALL: [StatusKey; 6] = [
        StatusKey::Pending,
        StatusKey::OnTrack,
        StatusKey::AtRisk,
        StatusKey::Win,
        StatusKey::Lost,
        StatusKey::Push,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, StatusKey::Win | StatusKey::Lost | StatusKey::Push)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusKey::Pending => "pending",
            StatusKey::OnTrack => "on-track",
            StatusKey::AtRisk => "at-risk",
            StatusKey::Win => "win",
            StatusKey::Lost => "lost",
            StatusKey::Push => "push",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusKey::Pending => "Pending",
            StatusKey::OnTrack => "On Track",
            StatusKey::AtRisk => "At Risk",
            StatusKey::Win => "Win",
            StatusKey::Lost => "Lost",
            StatusKey::Push => "Push",
        }
    }

    /// Map a status string from an importer or sportsbook export.
    /// Unrecognised or empty text yields `None` (no base status).
    pub fn from_reported(raw: &str) -> Option<StatusKey> {
        let norm: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c })
            .collect();
        match norm.as_str() {
            "win" | "won" | "w" => Some(StatusKey::Win),
            "loss" | "lost" | "lose" | "l" => Some(StatusKey::Lost),
            "push" | "void" | "tie" | "p" => Some(StatusKey::Push),
            "on-track" | "ontrack" | "covering" => Some(StatusKey::OnTrack),
            "at-risk" | "atrisk" | "trailing" => Some(StatusKey::AtRisk),
            "pending" | "open" | "live" => Some(StatusKey::Pending),
            _ => None,
        }
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDecision {
    pub key: StatusKey,
    pub label: String,
}

impl StatusDecision {
    pub fn new(key: StatusKey) -> Self {
        StatusDecision {
            key,
            label: key.label().to_string(),
        }
    }
}

/// How eagerly a live (not final) game is called on-track / at-risk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivePolicy {
    pub name: &'static str,
    /// Minimum favourable margin before a covering pick shows on-track
    pub on_track_margin: f64,
    /// Minimum deficit before a trailing pick shows at-risk
    pub at_risk_deficit: f64,
}

/// Sign-only: any lead is on-track, any deficit is at-risk.
pub const STRICT: LivePolicy = LivePolicy {
    name: "strict",
    on_track_margin: 0.0,
    at_risk_deficit: 0.0,
};

/// Only comfortable covers (3+) or clear deficits (7+) move a live pick.
pub const COMFORTABLE: LivePolicy = LivePolicy {
    name: "comfortable",
    on_track_margin: 3.0,
    at_risk_deficit: 7.0,
};

impl Default for LivePolicy {
    fn default() -> Self {
        STRICT
    }
}

impl LivePolicy {
    /// Live status implied by coverage, or `None` to keep the base status.
    pub fn live_key(&self, coverage: &CoverageResult) -> Option<StatusKey> {
        let distance = coverage.lead().map(f64::abs).unwrap_or(0.0);
        match coverage.state {
            CoverageState::Covering if distance >= self.on_track_margin => Some(StatusKey::OnTrack),
            CoverageState::Trailing if distance >= self.at_risk_deficit => Some(StatusKey::AtRisk),
            _ => None,
        }
    }
}

/// Combine the reported status, finality and coverage into a canonical status.
///
/// Precedence: a reported terminal status is returned untouched; a final game
/// is settled from coverage by sign alone; a live game goes through `policy`.
/// `unknown` coverage always falls back to the reported status (or pending).
pub fn decide(
    reported: Option<StatusKey>,
    is_final: bool,
    coverage: &CoverageResult,
    policy: &LivePolicy,
) -> StatusDecision {
    if let Some(key) = reported.filter(|k| k.is_terminal()) {
        return StatusDecision::new(key);
    }
    let base = reported.unwrap_or(StatusKey::Pending);

    let key = if is_final {
        match coverage.state {
            CoverageState::Covering => StatusKey::Win,
            CoverageState::Trailing => StatusKey::Lost,
            CoverageState::Push => StatusKey::Push,
            CoverageState::Unknown => base,
        }
    } else {
        policy.live_key(coverage).unwrap_or(base)
    };
    StatusDecision::new(key)
}

/// Keep a previously settled status when a later refresh would un-settle it.
pub fn latch(previous: Option<StatusKey>, next: StatusDecision) -> StatusDecision {
    match previous {
        Some(prev) if prev.is_terminal() && !next.key.is_terminal() => StatusDecision::new(prev),
        _ => next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(state: CoverageState, margin: f64) -> CoverageResult {
        CoverageResult {
            state,
            margin: Some(margin),
            ..CoverageResult::default()
        }
    }

    #[test]
    fn test_reported_terminal_wins_over_scores() {
        let trailing = coverage(CoverageState::Trailing, -20.0);
        for key in [StatusKey::Win, StatusKey::Lost, StatusKey::Push] {
            assert_eq!(decide(Some(key), false, &trailing, &STRICT).key, key);
            assert_eq!(decide(Some(key), true, &trailing, &STRICT).key, key);
        }
    }

    #[test]
    fn test_loss_is_normalised_to_lost() {
        assert_eq!(StatusKey::from_reported("Loss"), Some(StatusKey::Lost));
        assert_eq!(StatusKey::from_reported(" WON "), Some(StatusKey::Win));
        assert_eq!(StatusKey::from_reported("on track"), Some(StatusKey::OnTrack));
        assert_eq!(StatusKey::from_reported("at_risk"), Some(StatusKey::AtRisk));
        assert_eq!(StatusKey::from_reported(""), None);
        assert_eq!(StatusKey::from_reported("???"), None);
    }

    #[test]
    fn test_final_settles_by_sign() {
        let d = decide(None, true, &coverage(CoverageState::Covering, 0.5), &COMFORTABLE);
        assert_eq!(d.key, StatusKey::Win);
        assert_eq!(d.label, "Win");
        let d = decide(
            Some(StatusKey::OnTrack),
            true,
            &coverage(CoverageState::Trailing, -0.5),
            &STRICT,
        );
        assert_eq!(d.key, StatusKey::Lost);
        let d = decide(None, true, &coverage(CoverageState::Push, 0.0), &STRICT);
        assert_eq!(d.key, StatusKey::Push);
    }

    #[test]
    fn test_final_unknown_falls_back_to_base() {
        let d = decide(None, true, &CoverageResult::unknown(), &STRICT);
        assert_eq!(d.key, StatusKey::Pending);
        let d = decide(Some(StatusKey::AtRisk), true, &CoverageResult::unknown(), &STRICT);
        assert_eq!(d.key, StatusKey::AtRisk);
    }

    #[test]
    fn test_live_strict() {
        let d = decide(None, false, &coverage(CoverageState::Covering, 0.5), &STRICT);
        assert_eq!(d.key, StatusKey::OnTrack);
        assert_eq!(d.label, "On Track");
        let d = decide(None, false, &coverage(CoverageState::Trailing, -0.5), &STRICT);
        assert_eq!(d.key, StatusKey::AtRisk);
        let d = decide(
            Some(StatusKey::AtRisk),
            false,
            &coverage(CoverageState::Push, 0.0),
            &STRICT,
        );
        assert_eq!(d.key, StatusKey::AtRisk);
        let d = decide(None, false, &CoverageResult::unknown(), &STRICT);
        assert_eq!(d.key, StatusKey::Pending);
    }

    #[test]
    fn test_live_comfortable_thresholds() {
        let close_cover = coverage(CoverageState::Covering, 2.0);
        let comfy_cover = coverage(CoverageState::Covering, 3.0);
        let close_deficit = coverage(CoverageState::Trailing, -6.5);
        let big_deficit = coverage(CoverageState::Trailing, -7.0);

        assert_eq!(decide(None, false, &close_cover, &COMFORTABLE).key, StatusKey::Pending);
        assert_eq!(decide(None, false, &comfy_cover, &COMFORTABLE).key, StatusKey::OnTrack);
        assert_eq!(decide(None, false, &close_deficit, &COMFORTABLE).key, StatusKey::Pending);
        assert_eq!(decide(None, false, &big_deficit, &COMFORTABLE).key, StatusKey::AtRisk);
        assert_eq!(decide(None, false, &close_deficit, &STRICT).key, StatusKey::AtRisk);
    }

    #[test]
    fn test_comfortable_uses_moneyline_diff() {
        let ml = CoverageResult {
            state: CoverageState::Covering,
            diff: Some(4.0),
            ..CoverageResult::default()
        };
        assert_eq!(decide(None, false, &ml, &COMFORTABLE).key, StatusKey::OnTrack);
    }

    #[test]
    fn test_unknown_never_fabricates_terminal() {
        for reported in [None, Some(StatusKey::Pending), Some(StatusKey::OnTrack)] {
            for is_final in [false, true] {
                let d = decide(reported, is_final, &CoverageResult::unknown(), &STRICT);
                assert!(!d.key.is_terminal());
            }
        }
    }

    #[test]
    fn test_latch_keeps_terminal() {
        let next = StatusDecision::new(StatusKey::OnTrack);
        assert_eq!(latch(Some(StatusKey::Win), next.clone()).key, StatusKey::Win);
        assert_eq!(latch(Some(StatusKey::AtRisk), next.clone()).key, StatusKey::OnTrack);
        assert_eq!(latch(None, next).key, StatusKey::OnTrack);
        let corrected = StatusDecision::new(StatusKey::Lost);
        assert_eq!(latch(Some(StatusKey::Win), corrected).key, StatusKey::Lost);
    }

    #[test]
    fn test_terminal_partition() {
        let terminal: Vec<StatusKey> =
            StatusKey::ALL.into_iter().filter(|k| k.is_terminal()).collect();
        assert_eq!(terminal, vec![StatusKey::Win, StatusKey::Lost, StatusKey::Push]);
    }

    #[test]
    fn test_serialises_kebab_case() {
        assert_eq!(serde_json::to_string(&StatusKey::OnTrack).unwrap(), "\"on-track\"");
        assert_eq!(StatusKey::AtRisk.to_string(), "at-risk");
    }
}
