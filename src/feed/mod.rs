pub mod file;
pub mod provider;

pub use file::{load_picks, load_team_directory, FeedError, JsonFilePickSource};
pub use provider::PickSource;

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::engine::status::{latch, StatusDecision};
use crate::engine::{summarize, PickEngine};
use crate::models::{PickOutcome, PickRecord, StatusChange};

/// Remembers the last outcome per pick and reports what changed.
pub struct PickTracker {
    engine: PickEngine,
    /// pick key → last emitted outcome
    previous: HashMap<String, PickOutcome>,
}

impl PickTracker {
    pub fn new(engine: PickEngine) -> Self {
        PickTracker {
            engine,
            previous: HashMap::new(),
        }
    }

    /// Evaluate a fresh batch and return the picks whose status or badge moved.
    ///
    /// A status that already settled (win/lost/push) is never replaced by a
    /// non-terminal one, whatever the latest feed text says.
    pub fn observe(&mut self, provider: &str, records: &[PickRecord]) -> Vec<StatusChange> {
        let mut changes = Vec::new();
        for record in records {
            let mut outcome = self.engine.evaluate(record);
            let prev = self.previous.get(&outcome.key);
            let prev_key = prev.map(|p| p.status_key);

            let latched = latch(prev_key, StatusDecision::new(outcome.status_key));
            if latched.key != outcome.status_key {
                warn!(
                    "Pick {} would regress {} → {}; keeping settled status",
                    outcome.key, latched.key, outcome.status_key
                );
                outcome.status_key = latched.key;
                outcome.status_label = latched.label;
            }

            let changed = prev.map_or(true, |p| {
                p.status_key != outcome.status_key || p.badge_text != outcome.badge_text
            });
            if changed {
                changes.push(StatusChange {
                    key: outcome.key.clone(),
                    source_provider: provider.to_string(),
                    previous: prev_key,
                    outcome: outcome.clone(),
                    detected_at: Utc::now(),
                });
            }
            self.previous.insert(outcome.key.clone(), outcome);
        }
        changes
    }

    /// Drop picks that are no longer tracked.
    pub fn forget(&mut self, key: &str) {
        self.previous.remove(key);
    }

    pub fn outcomes(&self) -> Vec<PickOutcome> {
        self.previous.values().cloned().collect()
    }
}

/// Spawns a background task that re-reads every source at `poll_interval`,
/// re-evaluates all picks and sends a `StatusChange` through the returned
/// channel whenever a pick's status or badge changes.
///
/// When two sources carry the same pick, the source listed first wins.
pub fn start_pick_monitor(
    sources: Vec<Arc<dyn PickSource>>,
    poll_interval: Duration,
    engine: PickEngine,
) -> mpsc::Receiver<StatusChange> {
    let (tx, rx) = mpsc::channel(1024);

    tokio::spawn(async move {
        let source_names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        info!(
            "Pick monitor started ({} sources: {:?}, interval={:?}, policy={})",
            sources.len(),
            source_names,
            poll_interval,
            engine.policy().name
        );

        let mut tracker = PickTracker::new(engine);
        let mut last_seen: HashMap<String, tokio::time::Instant> = HashMap::new();
        let source_timeout = poll_interval.min(Duration::from_secs(5));
        let stale_after = poll_interval * 20;
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            let fetches: Vec<_> = sources
                .iter()
                .map(|s| {
                    let s = Arc::clone(s);
                    async move {
                        let res = tokio::time::timeout(source_timeout, s.fetch_picks()).await;
                        let out = match res {
                            Ok(result) => result,
                            Err(_) => Err(anyhow::anyhow!("timed out after {:?}", source_timeout)),
                        };
                        (s.name().to_string(), out)
                    }
                })
                .collect();

            let results = futures_util::future::join_all(fetches).await;

            // First source to mention a pick owns it for this tick.
            let mut merged: HashMap<String, (String, PickRecord)> = HashMap::new();
            for (source_name, result) in results {
                match result {
                    Ok(records) => {
                        for record in records {
                            merged
                                .entry(record.key())
                                .or_insert_with(|| (source_name.clone(), record));
                        }
                    }
                    Err(e) => warn!("Source '{}' failed: {}", source_name, e),
                }
            }

            let now = tokio::time::Instant::now();
            for (key, (source_name, record)) in merged {
                last_seen.insert(key, now);
                for change in tracker.observe(&source_name, std::slice::from_ref(&record)) {
                    info!(
                        "Status change: {} {:?} → {} ({})",
                        change.key,
                        change.previous,
                        change.outcome.status_key,
                        change.outcome.badge_text
                    );
                    if let Err(e) = tx.try_send(change) {
                        error!("Status change channel full, change DROPPED: {}", e);
                    }
                }
            }

            // Forget picks that disappeared from every source a while ago.
            let stale: Vec<String> = last_seen
                .iter()
                .filter(|(_, seen)| seen.elapsed() > stale_after)
                .map(|(key, _)| key.clone())
                .collect();
            for key in stale {
                last_seen.remove(&key);
                tracker.forget(&key);
            }

            debug!("Status counts: {:?}", summarize(&tracker.outcomes()));

            if tx.is_closed() {
                info!("Pick monitor receiver dropped; stopping");
                break;
            }
        }
    });

    rx
}
