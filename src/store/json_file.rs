//! File-backed store.
//!
//! Layout under the data directory:
//!
//! ```text
//! <data>/sessions/<session_id>.json   one Session per file
//! <data>/tvi_results.json             array of StoredTviRecord
//! ```

use crate::core::{HistoricalScore, TviResult};
use crate::error::StoreError;
use crate::session::Session;
use crate::store::{HistoricalScores, ResultStore, SessionLookup, StoredTviRecord};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const RESULTS_FILE: &str = "tvi_results.json";
const SESSIONS_DIR: &str = "sessions";

/// Stores sessions and results as JSON files.
pub struct JsonFileStore {
    root: PathBuf,
    /// Serializes read-modify-write cycles on the results file
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn results_path(&self) -> PathBuf {
        self.root.join(RESULTS_FILE)
    }

    fn session_path(&self, session_id: &str) -> Result<PathBuf, StoreError> {
        let valid = !session_id.is_empty()
            && session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::NotFound(format!(
                "invalid session id '{session_id}'"
            )));
        }
        Ok(self
            .root
            .join(SESSIONS_DIR)
            .join(format!("{session_id}.json")))
    }

    /// Write a session so it can later be looked up and scored.
    pub async fn put_session(&self, session: &Session) -> Result<PathBuf, StoreError> {
        let path = self.session_path(&session.session_id)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(session)?;
        tokio::fs::write(&path, json).await?;
        tracing::debug!("Stored session {} at {:?}", session.session_id, path);
        Ok(path)
    }

    /// All stored records in insertion order.
    pub async fn records(&self) -> Result<Vec<StoredTviRecord>, StoreError> {
        let path = self.results_path();
        if !tokio::fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }
        let content = tokio::fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_records(&self, records: &[StoredTviRecord]) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let json = serde_json::to_string_pretty(records)?;

        // Write to a temp file first so a crash never truncates history
        let tmp = self.root.join(format!("{RESULTS_FILE}.tmp"));
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, self.results_path()).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionLookup for JsonFileStore {
    async fn find_session(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        let path = self.session_path(session_id)?;
        if !tokio::fs::try_exists(&path).await? {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(&path).await?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

#[async_trait]
impl HistoricalScores for JsonFileStore {
    async fn historical_scores(
        &self,
        unit_id: Option<&str>,
    ) -> Result<Vec<HistoricalScore>, StoreError> {
        Ok(self
            .records()
            .await?
            .iter()
            .filter(|r| r.matches_unit(unit_id))
            .map(StoredTviRecord::historical_score)
            .collect())
    }
}

#[async_trait]
impl ResultStore for JsonFileStore {
    async fn save_result(
        &self,
        session_id: &str,
        result: &TviResult,
        unit_id: Option<&str>,
    ) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.records().await?;
        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        records.push(StoredTviRecord::from_result(id, session_id, result, unit_id)?);
        self.write_records(&records).await?;

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analyze;
    use crate::session::Sample;
    use chrono::Utc;

    fn test_root(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tvi-json-store-{name}-{}", uuid::Uuid::new_v4()))
    }

    fn sample_session(id: &str) -> Session {
        let now = Utc::now();
        let samples = (0..15)
            .map(|_| Sample::with_total(now, 0.0, 0.0, 0.3, 0.3))
            .collect();
        Session::new(id, "phone", now, 45.0, 0.3, 0.3, samples).with_unit("U1")
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let store = JsonFileStore::new(test_root("session"));
        let session = sample_session("s-1");
        store.put_session(&session).await.unwrap();

        let loaded = store.find_session("s-1").await.unwrap().unwrap();
        assert_eq!(loaded.samples.len(), 15);
        assert_eq!(loaded.unit_id.as_deref(), Some("U1"));
        assert!(store.find_session("s-2").await.unwrap().is_none());

        let _ = std::fs::remove_dir_all(store.root());
    }

    #[tokio::test]
    async fn test_rejects_path_like_session_ids() {
        let store = JsonFileStore::new(test_root("ids"));
        assert!(store.find_session("../etc/passwd").await.is_err());
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let store = JsonFileStore::new(test_root("save"));
        let result = analyze(&sample_session("s-1")).unwrap();

        assert_eq!(store.save_result("s-1", &result, Some("U1")).await.unwrap(), 1);
        assert_eq!(store.save_result("s-2", &result, None).await.unwrap(), 2);

        let records = store.records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].session_id, "s-2");
        assert_eq!(store.historical_scores(Some("U1")).await.unwrap().len(), 1);
        assert_eq!(store.historical_scores(None).await.unwrap().len(), 2);

        let _ = std::fs::remove_dir_all(store.root());
    }
}
