//! In-process store.

use crate::core::{HistoricalScore, RiskLevel, SafetyRating, TviResult, ANALYSIS_VERSION};
use crate::error::StoreError;
use crate::session::Session;
use crate::store::{HistoricalScores, ResultStore, SessionLookup, StoredTviRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keeps sessions and results in memory.
#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<String, Session>>,
    records: RwLock<Vec<StoredTviRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a session.
    pub async fn insert_session(&self, session: Session) {
        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session);
    }

    /// Append a historical score directly, bypassing a full analysis.
    ///
    /// Only the composite is known, so it stands in for every sub-score.
    pub async fn insert_history(&self, score: HistoricalScore) {
        let mut records = self.records.write().await;
        let id = records.len() as u64 + 1;
        records.push(StoredTviRecord {
            id,
            session_id: format!("history-{id}"),
            unit_id: score.unit_id,
            tvi_score: score.score,
            safety_rating: SafetyRating::from_score(score.score),
            risk_level: RiskLevel::assess(score.score, score.score),
            peak_score: score.score,
            sustained_score: score.score,
            pattern_score: score.score,
            mean_magnitude: 0.0,
            variance: 0.0,
            std_dev: 0.0,
            smoothness_index: 0.0,
            recommendations: "[]".to_string(),
            percentile_rank: None,
            baseline_comparison: None,
            analysis_version: ANALYSIS_VERSION.to_string(),
            created_at: score.computed_at,
        });
    }

    /// All stored records in insertion order.
    pub async fn records(&self) -> Vec<StoredTviRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl SessionLookup for MemoryStore {
    async fn find_session(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }
}

#[async_trait]
impl HistoricalScores for MemoryStore {
    async fn historical_scores(
        &self,
        unit_id: Option<&str>,
    ) -> Result<Vec<HistoricalScore>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.matches_unit(unit_id))
            .map(StoredTviRecord::historical_score)
            .collect())
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn save_result(
        &self,
        session_id: &str,
        result: &TviResult,
        unit_id: Option<&str>,
    ) -> Result<u64, StoreError> {
        let mut records = self.records.write().await;
        let id = records.last().map(|r| r.id + 1).unwrap_or(1);
        records.push(StoredTviRecord::from_result(id, session_id, result, unit_id)?);
        Ok(id)
    }
}
