use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::status::StatusKey;

/// A tracked pick as supplied by the storage/import side of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PickRecord {
    /// Stable identifier, when the importer assigns one
    pub id: Option<String>,
    /// Freeform bet text, e.g. "Phoenix Suns -2 (-120)"
    pub description: String,
    /// Status as last reported by the sportsbook/importer ("win", "loss", "pending", ...)
    pub reported_status: String,
    /// Live or final scoreboard text, e.g. "DEN 21 - PHI 17 (Q4 2:15)"
    pub result_text: String,
    /// Matchup text, e.g. "Raiders @ Broncos"
    pub matchup_text: String,
    /// Odds as entered separately from the description
    pub odds_text: String,
    /// Legs of a parlay; empty for straight bets
    pub parlay_legs: Vec<PickRecord>,
}

impl PickRecord {
    /// Key used to recognise the same pick across refreshes.
    pub fn key(&self) -> String {
        match self.id.as_deref() {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => format!("{}|{}", self.description.trim(), self.matchup_text.trim()),
        }
    }

    pub fn is_parlay(&self) -> bool {
        !self.parlay_legs.is_empty()
    }
}

/// Per-pick output consumed by the table renderer and the KPI aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickOutcome {
    pub key: String,
    pub status_key: StatusKey,
    pub status_label: String,
    pub badge_text: String,
    pub tooltip_text: String,
}

/// Emitted by the refresh monitor whenever a pick's status or badge changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub key: String,
    pub source_provider: String,
    /// `None` the first time a pick is seen
    pub previous: Option<StatusKey>,
    pub outcome: PickOutcome,
    pub detected_at: DateTime<Utc>,
}
