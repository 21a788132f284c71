use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::provider::PickSource;
use crate::engine::teams::StaticTeamDirectory;
use crate::models::PickRecord;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

async fn read_file(path: &Path) -> Result<String, FeedError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Load a JSON array of pick records.
pub async fn load_picks(path: impl AsRef<Path>) -> Result<Vec<PickRecord>, FeedError> {
    let path = path.as_ref();
    let raw = read_file(path).await?;
    let picks: Vec<PickRecord> = serde_json::from_str(&raw).map_err(|source| FeedError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loaded {} pick(s) from {}", picks.len(), path.display());
    Ok(picks)
}

/// Load a `{ "Team Name": "ABBR" }` object into a team directory.
pub async fn load_team_directory(
    path: impl AsRef<Path>,
) -> Result<StaticTeamDirectory, FeedError> {
    let path = path.as_ref();
    let raw = read_file(path).await?;
    let entries: HashMap<String, String> =
        serde_json::from_str(&raw).map_err(|source| FeedError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(StaticTeamDirectory::from_pairs(entries))
}

/// Pick source backed by a JSON file that an importer rewrites in place.
pub struct JsonFilePickSource {
    path: PathBuf,
    name: String,
}

impl JsonFilePickSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        JsonFilePickSource { path, name }
    }
}

#[async_trait]
impl PickSource for JsonFilePickSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_picks(&self) -> Result<Vec<PickRecord>> {
        Ok(load_picks(&self.path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::teams::TeamDirectory;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_picks_camel_case_with_defaults() {
        let file = write_temp(
            r#"[
                {"id": "p1", "description": "Phoenix Suns -2 (-120)", "resultText": "PHX 50 - DEN 48 (Q2)"},
                {"description": "Parlay", "parlayLegs": [{"description": "Raiders O 15"}]}
            ]"#,
        );
        let picks = load_picks(file.path()).await.unwrap();
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].id.as_deref(), Some("p1"));
        assert_eq!(picks[0].result_text, "PHX 50 - DEN 48 (Q2)");
        assert!(picks[0].reported_status.is_empty());
        assert_eq!(picks[1].parlay_legs.len(), 1);
    }

    #[tokio::test]
    async fn test_load_picks_reports_bad_json() {
        let file = write_temp("{not json");
        let err = load_picks(file.path()).await.unwrap_err();
        assert!(matches!(err, FeedError::Json { .. }));
    }

    #[tokio::test]
    async fn test_load_picks_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_picks(dir.path().join("missing.json")).await.unwrap_err();
        assert!(matches!(err, FeedError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[tokio::test]
    async fn test_load_team_directory() {
        let file = write_temp(r#"{"Denver Broncos": "DEN", "Las Vegas Raiders": "lv"}"#);
        let dir = load_team_directory(file.path()).await.unwrap();
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.abbreviation("las vegas raiders"), Some("LV".to_string()));
    }

    #[tokio::test]
    async fn test_file_source_fetch() {
        let file = write_temp(r#"[{"description": "Suns ML"}]"#);
        let source = JsonFilePickSource::new(file.path());
        assert!(source.name().starts_with("file:"));
        let picks = source.fetch_picks().await.unwrap();
        assert_eq!(picks[0].description, "Suns ML");
    }
}
