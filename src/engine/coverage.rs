//! Whether a selection is currently satisfied by the scoreboard.

use serde::{Deserialize, Serialize};

use super::matchup::Side;
use super::scoreboard::ScoreboardSnapshot;
use super::selection::{BetKind, Direction, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageState {
    Covering,
    Trailing,
    Push,
    #[default]
    Unknown,
}

/// Numeric reading of a bet against the current score.
///
/// * total / team-total: `margin` is points beyond the line in the bet's favour
/// * spread: `margin` is the cover margin (`diff + line`), `diff` the raw differential
/// * moneyline: only `diff` is set
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoverageResult {
    pub state: CoverageState,
    pub margin: Option<f64>,
    pub our_score: Option<f64>,
    pub opp_score: Option<f64>,
    pub diff: Option<f64>,
}

impl CoverageResult {
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Signed distance from the bet's break-even point, whatever the bet kind.
    pub fn lead(&self) -> Option<f64> {
        self.margin.or(self.diff)
    }
}

/// Lines are at most tenths; rounding keeps `x.5 + n` style sums exact
/// and is monotone, so it never flips a sign on its own.
fn round_points(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

fn state_from_sign(v: f64) -> CoverageState {
    if v > 0.0 {
        CoverageState::Covering
    } else if v < 0.0 {
        CoverageState::Trailing
    } else {
        CoverageState::Push
    }
}

fn over_under_margin(points: f64, line: f64, direction: Direction) -> f64 {
    match direction {
        Direction::Over => round_points(points - line),
        Direction::Under => round_points(line - points),
    }
}

/// Evaluate `selection` against `snapshot`. Pure; never fails.
pub fn evaluate(selection: &Selection, snapshot: &ScoreboardSnapshot) -> CoverageResult {
    let (Some(away), Some(home)) = (snapshot.away_score, snapshot.home_score) else {
        return CoverageResult::unknown();
    };
    let (away, home) = (f64::from(away), f64::from(home));
    let sides = |side: Side| match side {
        Side::Home => (home, away),
        Side::Away => (away, home),
    };

    match selection.kind {
        BetKind::Total => {
            let (Some(line), Some(direction)) = (selection.line, selection.direction) else {
                return CoverageResult::unknown();
            };
            let margin = over_under_margin(away + home, line, direction);
            CoverageResult {
                state: state_from_sign(margin),
                margin: Some(margin),
                ..CoverageResult::default()
            }
        }
        BetKind::TeamTotal => {
            let (Some(side), Some(line), Some(direction)) =
                (selection.side, selection.line, selection.direction)
            else {
                return CoverageResult::unknown();
            };
            let (ours, theirs) = sides(side);
            let margin = over_under_margin(ours, line, direction);
            CoverageResult {
                state: state_from_sign(margin),
                margin: Some(margin),
                our_score: Some(ours),
                opp_score: Some(theirs),
                diff: None,
            }
        }
        BetKind::Spread => {
            let (Some(side), Some(line)) = (selection.side, selection.line) else {
                return CoverageResult::unknown();
            };
            let (ours, theirs) = sides(side);
            let diff = ours - theirs;
            let cover_margin = round_points(diff + line);
            CoverageResult {
                state: state_from_sign(cover_margin),
                margin: Some(cover_margin),
                our_score: Some(ours),
                opp_score: Some(theirs),
                diff: Some(diff),
            }
        }
        BetKind::Moneyline => {
            let Some(side) = selection.side else {
                return CoverageResult::unknown();
            };
            let (ours, theirs) = sides(side);
            let diff = ours - theirs;
            CoverageResult {
                state: state_from_sign(diff),
                margin: None,
                our_score: Some(ours),
                opp_score: Some(theirs),
                diff: Some(diff),
            }
        }
        BetKind::Unknown => CoverageResult::unknown(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn snap(away: u32, home: u32) -> ScoreboardSnapshot {
        ScoreboardSnapshot {
            away_score: Some(away),
            home_score: Some(home),
            ..ScoreboardSnapshot::default()
        }
    }

    fn spread(side: Side, line: f64) -> Selection {
        Selection {
            kind: BetKind::Spread,
            side: Some(side),
            line: Some(line),
            ..Selection::default()
        }
    }

    fn total(direction: Direction, line: f64) -> Selection {
        Selection {
            kind: BetKind::Total,
            line: Some(line),
            direction: Some(direction),
            ..Selection::default()
        }
    }

    #[test]
    fn test_spread_favourite_covering() {
        let r = evaluate(&spread(Side::Home, -5.5), &snap(90, 100));
        assert_eq!(r.state, CoverageState::Covering);
        assert_relative_eq!(r.diff.unwrap(), 10.0);
        assert_relative_eq!(r.margin.unwrap(), 4.5);
        assert_relative_eq!(r.our_score.unwrap(), 100.0);
        assert_relative_eq!(r.opp_score.unwrap(), 90.0);
    }

    #[test]
    fn test_spread_underdog_trailing_and_push() {
        let r = evaluate(&spread(Side::Away, 3.0), &snap(10, 17));
        assert_eq!(r.state, CoverageState::Trailing);
        assert_relative_eq!(r.margin.unwrap(), -4.0);

        let r = evaluate(&spread(Side::Away, 7.0), &snap(10, 17));
        assert_eq!(r.state, CoverageState::Push);
    }

    #[test]
    fn test_total_over() {
        let r = evaluate(&total(Direction::Over, 145.5), &snap(70, 80));
        assert_eq!(r.state, CoverageState::Covering);
        assert_relative_eq!(r.margin.unwrap(), 4.5);

        let r = evaluate(&total(Direction::Over, 145.5), &snap(70, 70));
        assert_eq!(r.state, CoverageState::Trailing);
        assert_relative_eq!(r.margin.unwrap(), -5.5);
    }

    #[test]
    fn test_total_under_and_push() {
        let r = evaluate(&total(Direction::Under, 43.0), &snap(20, 17));
        assert_eq!(r.state, CoverageState::Covering);
        assert_relative_eq!(r.margin.unwrap(), 6.0);

        let r = evaluate(&total(Direction::Under, 43.0), &snap(23, 20));
        assert_eq!(r.state, CoverageState::Push);
    }

    #[test]
    fn test_total_needs_no_side() {
        let sel = total(Direction::Over, 40.0);
        assert_eq!(sel.side, None);
        assert_eq!(evaluate(&sel, &snap(21, 21)).state, CoverageState::Covering);
    }

    #[test]
    fn test_team_total_uses_own_score() {
        let sel = Selection {
            kind: BetKind::TeamTotal,
            side: Some(Side::Away),
            line: Some(15.0),
            direction: Some(Direction::Over),
            ..Selection::default()
        };
        let r = evaluate(&sel, &snap(14, 30));
        assert_eq!(r.state, CoverageState::Trailing);
        assert_relative_eq!(r.margin.unwrap(), -1.0);
        assert_relative_eq!(r.our_score.unwrap(), 14.0);
    }

    #[test]
    fn test_team_total_without_side_is_unknown() {
        let sel = Selection {
            kind: BetKind::TeamTotal,
            line: Some(15.0),
            direction: Some(Direction::Over),
            ..Selection::default()
        };
        assert_eq!(evaluate(&sel, &snap(14, 30)).state, CoverageState::Unknown);
    }

    #[test]
    fn test_moneyline_sign_only() {
        let sel = Selection {
            kind: BetKind::Moneyline,
            side: Some(Side::Away),
            ..Selection::default()
        };
        let r = evaluate(&sel, &snap(3, 2));
        assert_eq!(r.state, CoverageState::Covering);
        assert_eq!(r.margin, None);
        assert_relative_eq!(r.lead().unwrap(), 1.0);
        assert_eq!(evaluate(&sel, &snap(2, 2)).state, CoverageState::Push);
        assert_eq!(evaluate(&sel, &snap(1, 2)).state, CoverageState::Trailing);
    }

    #[test]
    fn test_missing_score_is_unknown() {
        let s = ScoreboardSnapshot {
            away_score: Some(10),
            home_score: None,
            ..ScoreboardSnapshot::default()
        };
        assert_eq!(evaluate(&spread(Side::Home, -3.0), &s), CoverageResult::unknown());
    }

    #[test]
    fn test_unresolved_side_is_unknown() {
        let mut sel = spread(Side::Home, -3.0);
        sel.side = None;
        assert_eq!(evaluate(&sel, &snap(0, 10)).state, CoverageState::Unknown);
    }

    #[test]
    fn test_unknown_kind_is_unknown() {
        let sel = Selection::default();
        assert_eq!(evaluate(&sel, &snap(0, 10)).state, CoverageState::Unknown);
    }

    #[test]
    fn test_state_follows_margin_without_oscillation() {
        // Walk the home lead down from +10 to -10 against a -5.5 line.
        let sel = spread(Side::Home, -5.5);
        let mut crossed = false;
        for home in (90..=110).rev() {
            let r = evaluate(&sel, &snap(100, home));
            if r.state == CoverageState::Trailing {
                crossed = true;
            }
            if crossed {
                assert_ne!(r.state, CoverageState::Covering, "home={}", home);
            }
        }
        assert!(crossed);
    }

    #[test]
    fn test_total_state_follows_sum_without_oscillation() {
        let sel = Selection {
            kind: BetKind::Total,
            line: Some(145.5),
            direction: Some(Direction::Over),
            ..Selection::default()
        };
        let mut covering = false;
        for home in 60..=90 {
            let r = evaluate(&sel, &snap(70, home));
            if r.state == CoverageState::Covering {
                covering = true;
            }
            if covering {
                assert_ne!(r.state, CoverageState::Trailing, "home={}", home);
            }
            assert_ne!(r.state, CoverageState::Push);
        }
        assert!(covering);
    }

    #[test]
    fn test_moneyline_state_follows_lead_without_oscillation() {
        let sel = Selection {
            kind: BetKind::Moneyline,
            side: Some(Side::Home),
            ..Selection::default()
        };
        let mut seen = Vec::new();
        for home in (90..=110).rev() {
            let state = evaluate(&sel, &snap(100, home)).state;
            if seen.last() != Some(&state) {
                seen.push(state);
            }
        }
        assert_eq!(
            seen,
            vec![
                CoverageState::Covering,
                CoverageState::Push,
                CoverageState::Trailing
            ]
        );
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let sel = spread(Side::Away, 2.5);
        let s = snap(17, 20);
        assert_eq!(evaluate(&sel, &s), evaluate(&sel, &s));
    }
}
