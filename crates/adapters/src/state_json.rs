//! JSON file publish-state store

use async_trait::async_trait;
use crosspub_domain::{PublishState, StateError, StateStore};
use std::path::{Path, PathBuf};

/// Persists the publish state as pretty-printed JSON at a fixed path.
///
/// Keys serialize in sorted order, so the file is deterministic and
/// human-diffable. A missing file is an empty state, not an error.
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn load(&self) -> Result<PublishState, StateError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No prior state file, starting empty");
            return Ok(PublishState::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| StateError::Serialization(e.to_string()))
    }

    async fn save(&self, state: &PublishState) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(state)
            .map_err(|e| StateError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, json)?;

        tracing::info!(path = %self.path.display(), "Saved publish state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosspub_domain::{Platform, PlatformRecord};
    use tempfile::TempDir;
    use time::OffsetDateTime;

    fn record(id: &str) -> PlatformRecord {
        PlatformRecord {
            id: id.to_string(),
            url: format!("https://qiita.com/items/{id}"),
            published_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty_state() {
        let dir = TempDir::new().unwrap();
        let store = JsonStateStore::new(dir.path().join("config/published-articles.json"));

        let state = store.load().await.unwrap();
        assert!(state.records.is_empty());
    }

    #[tokio::test]
    async fn save_creates_parent_directory_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config/published-articles.json");
        let store = JsonStateStore::new(&path);

        let mut state = PublishState::default();
        state.upsert("my-post", Platform::Qiita, record("q1"));
        store.save(&state).await.unwrap();

        assert!(path.exists());
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn serialized_output_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let store = JsonStateStore::new(dir.path().join("state.json"));

        let mut state = PublishState::default();
        state.upsert("zebra", Platform::Qiita, record("z"));
        state.upsert("alpha", Platform::Devto, record("a"));

        store.save(&state).await.unwrap();
        let first = std::fs::read_to_string(dir.path().join("state.json")).unwrap();
        store.save(&state).await.unwrap();
        let second = std::fs::read_to_string(dir.path().join("state.json")).unwrap();

        assert_eq!(first, second);
        // BTreeMap keys come out sorted
        assert!(first.find("alpha").unwrap() < first.find("zebra").unwrap());
    }

    #[tokio::test]
    async fn corrupt_state_file_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonStateStore::new(&path);
        let result = store.load().await;
        assert!(matches!(result, Err(StateError::Serialization(_))));
    }
}
