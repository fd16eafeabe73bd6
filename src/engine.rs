//! The TVI engine: scoring plus historical comparison over an injected store.

use crate::audit::{create_shared_log, SharedAnalysisLog};
use crate::config::EngineConfig;
use crate::core::comparison::newest_first;
use crate::core::{
    analyze, baseline_comparison, percentile_rank, TviResult, DEFAULT_BASELINE_COMPARISON,
    DEFAULT_PERCENTILE_RANK,
};
use crate::error::{StoreError, TviError};
use crate::session::Session;
use crate::store::TviRepository;
use std::sync::Arc;

/// Percentile rank and baseline deviation for one new score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoricalComparison {
    pub percentile_rank: f64,
    pub baseline_comparison: f64,
}

impl Default for HistoricalComparison {
    fn default() -> Self {
        Self {
            percentile_rank: DEFAULT_PERCENTILE_RANK,
            baseline_comparison: DEFAULT_BASELINE_COMPARISON,
        }
    }
}

/// Computes and saves Transport Vibration Index analyses.
///
/// Holds no per-session state, so one engine can score many sessions
/// concurrently.
pub struct TviEngine<R> {
    repository: Arc<R>,
    config: EngineConfig,
    log: SharedAnalysisLog,
}

impl<R: TviRepository> TviEngine<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_config(repository, EngineConfig::default())
    }

    pub fn with_config(repository: Arc<R>, config: EngineConfig) -> Self {
        Self {
            repository,
            config,
            log: create_shared_log(),
        }
    }

    /// Report activity to a shared log instead of a private one.
    pub fn with_log(mut self, log: SharedAnalysisLog) -> Self {
        self.log = log;
        self
    }

    pub fn log(&self) -> &SharedAnalysisLog {
        &self.log
    }

    /// Look up a session and score it.
    ///
    /// A session that cannot be found is reported as insufficient data.
    pub async fn calculate_tvi(&self, session_id: &str) -> Result<TviResult, TviError> {
        let session = self
            .repository
            .find_session(session_id)
            .await
            .map_err(TviError::SessionLookup)?;

        match session {
            Some(session) => self.calculate_for_session(&session).await,
            None => {
                tracing::warn!("Session {} not found", session_id);
                self.log.record_insufficient_data();
                Err(TviError::insufficient(session_id, "session not found"))
            }
        }
    }

    /// Score an already loaded session.
    pub async fn calculate_for_session(&self, session: &Session) -> Result<TviResult, TviError> {
        let mut result = match analyze(session) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Cannot score session {}: {}", session.session_id, e);
                self.log.record_insufficient_data();
                return Err(e);
            }
        };

        tracing::debug!(
            "Session {} scored {:.1} (peak {:.1}, sustained {:.1}, pattern {:.1})",
            session.session_id,
            result.tvi_score,
            result.sub_scores.peak,
            result.sub_scores.sustained,
            result.sub_scores.pattern
        );

        if let Some(unit_id) = session.unit_id.as_deref() {
            let comparison = match self.compare_with_history(result.tvi_score, unit_id).await {
                Ok(comparison) => comparison,
                Err(e) => {
                    tracing::warn!(
                        "History lookup failed for session {}: {}; using defaults",
                        session.session_id,
                        e
                    );
                    self.log.record_history_fallback();
                    HistoricalComparison::default()
                }
            };
            result.percentile_rank = Some(comparison.percentile_rank);
            result.baseline_comparison = Some(comparison.baseline_comparison);
        }

        self.log.record_analysis();
        Ok(result)
    }

    /// Compare a score against stored history for a unit.
    pub async fn compare_with_history(
        &self,
        score: f64,
        unit_id: &str,
    ) -> Result<HistoricalComparison, StoreError> {
        let mut unit_history = self.repository.historical_scores(Some(unit_id)).await?;
        newest_first(&mut unit_history);

        let percentile = if self.config.unit_scoped_percentile {
            percentile_rank(score, &unit_history)
        } else {
            let all = self.repository.historical_scores(None).await?;
            percentile_rank(score, &all)
        };

        Ok(HistoricalComparison {
            percentile_rank: percentile,
            baseline_comparison: baseline_comparison(
                score,
                &unit_history,
                self.config.baseline_window,
            ),
        })
    }

    /// Persist a finished analysis and return the new record id.
    pub async fn save_tvi_analysis(
        &self,
        session_id: &str,
        result: &TviResult,
        unit_id: Option<&str>,
    ) -> Result<u64, TviError> {
        let id = self
            .repository
            .save_result(session_id, result, unit_id)
            .await
            .map_err(TviError::Save)?;

        self.log.record_saved();
        tracing::info!("Saved TVI analysis {} for session {}", id, session_id);
        Ok(id)
    }

    /// Score a session and save the result once it is complete.
    pub async fn score_and_save(&self, session_id: &str) -> Result<(TviResult, u64), TviError> {
        let result = self.calculate_tvi(session_id).await?;
        let id = self
            .save_tvi_analysis(session_id, &result, result.unit_id.as_deref())
            .await?;
        Ok((result, id))
    }
}
