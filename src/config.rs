use clap::{Parser, ValueEnum};

use crate::engine::status::{LivePolicy, COMFORTABLE, STRICT};

/// Which live-game threshold policy to apply.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyName {
    /// Any lead is on-track, any deficit is at-risk
    #[default]
    Strict,
    /// Only 3+ point covers / 7+ point deficits move a live pick
    Comfortable,
}

impl PolicyName {
    pub fn policy(self) -> LivePolicy {
        match self {
            PolicyName::Strict => STRICT,
            PolicyName::Comfortable => COMFORTABLE,
        }
    }
}

/// Pick coverage and status evaluator
#[derive(Parser, Debug, Clone)]
#[command(name = "pick-status", version, about)]
pub struct Config {
    /// JSON file holding an array of pick records
    #[arg(long, env = "PICKS_PATH")]
    pub picks_path: String,

    /// Optional JSON object mapping team names to abbreviations
    #[arg(long, env = "TEAMS_PATH")]
    pub teams_path: Option<String>,

    /// Live-game status policy
    #[arg(long, env = "LIVE_POLICY", value_enum, default_value_t = PolicyName::Strict)]
    pub live_policy: PolicyName,

    /// Keep re-reading the picks file and print status changes as JSON lines
    #[arg(long, env = "WATCH", default_value = "false")]
    pub watch: bool,

    /// Refresh interval in seconds for watch mode
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value = "15")]
    pub poll_interval_secs: u64,

    /// Pretty-print JSON output
    #[arg(long, env = "PRETTY", default_value = "false")]
    pub pretty: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.picks_path.trim().is_empty() {
            anyhow::bail!("PICKS_PATH must not be empty");
        }
        if self.teams_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
            anyhow::bail!("TEAMS_PATH must not be empty when set");
        }
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let c = Config::try_parse_from(["pick-status", "--picks-path", "picks.json"]).unwrap();
        assert_eq!(c.live_policy, PolicyName::Strict);
        assert_eq!(c.poll_interval_secs, 15);
        assert!(!c.watch);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_parse_comfortable_policy() {
        let c = Config::try_parse_from([
            "pick-status",
            "--picks-path",
            "picks.json",
            "--live-policy",
            "comfortable",
        ])
        .unwrap();
        assert_eq!(c.live_policy.policy(), COMFORTABLE);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let c = Config::try_parse_from([
            "pick-status",
            "--picks-path",
            "picks.json",
            "--poll-interval-secs",
            "0",
        ])
        .unwrap();
        assert!(c.validate().is_err());
    }
}
