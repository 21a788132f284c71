use anyhow::Result;
use async_trait::async_trait;

use crate::models::PickRecord;

/// Anything that can hand over the current list of tracked picks.
#[async_trait]
pub trait PickSource: Send + Sync {
    /// Return the picks as they stand right now, with the latest result text.
    async fn fetch_picks(&self) -> Result<Vec<PickRecord>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
