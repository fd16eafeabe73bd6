//! Run statistics for the engine.
//!
//! Counts what the engine did (analyses, rejections, history fallbacks,
//! saves) so operators can see how often comparative context was missing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Engine activity counters.
#[derive(Debug)]
pub struct AnalysisLog {
    /// Number of analyses that produced a result
    analyses_completed: AtomicU64,
    /// Number of sessions rejected as empty, missing or unscorable
    insufficient_data: AtomicU64,
    /// Number of times history lookup failed and defaults were used
    history_fallbacks: AtomicU64,
    /// Number of results persisted
    results_saved: AtomicU64,
    started_at: DateTime<Utc>,
    persist_path: Option<PathBuf>,
}

impl AnalysisLog {
    pub fn new() -> Self {
        Self {
            analyses_completed: AtomicU64::new(0),
            insufficient_data: AtomicU64::new(0),
            history_fallbacks: AtomicU64::new(0),
            results_saved: AtomicU64::new(0),
            started_at: Utc::now(),
            persist_path: None,
        }
    }

    /// Create a log that loads and saves its counters at `path`.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut log = Self::new();
        log.persist_path = Some(path);

        if let Err(e) = log.load() {
            tracing::warn!("Could not load previous analysis stats: {}", e);
        }

        log
    }

    pub fn record_analysis(&self) {
        self.analyses_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_insufficient_data(&self) {
        self.insufficient_data.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_history_fallback(&self) {
        self.history_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_saved(&self) {
        self.results_saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> AnalysisStats {
        AnalysisStats {
            analyses_completed: self.analyses_completed.load(Ordering::Relaxed),
            insufficient_data: self.insufficient_data.load(Ordering::Relaxed),
            history_fallbacks: self.history_fallbacks.load(Ordering::Relaxed),
            results_saved: self.results_saved.load(Ordering::Relaxed),
            started_at: self.started_at,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Analysis Statistics:\n\
             - Analyses completed: {}\n\
             - Rejected sessions: {}\n\
             - History lookup fallbacks: {}\n\
             - Results saved: {}",
            stats.analyses_completed,
            stats.insufficient_data,
            stats.history_fallbacks,
            stats.results_saved,
        )
    }

    /// Save counters to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedStats {
                analyses_completed: stats.analyses_completed,
                insufficient_data: stats.insufficient_data,
                history_fallbacks: stats.history_fallbacks,
                results_saved: stats.results_saved,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }

    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.analyses_completed
                    .store(persisted.analyses_completed, Ordering::Relaxed);
                self.insufficient_data
                    .store(persisted.insufficient_data, Ordering::Relaxed);
                self.history_fallbacks
                    .store(persisted.history_fallbacks, Ordering::Relaxed);
                self.results_saved
                    .store(persisted.results_saved, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Zero every counter. Call [`save`](Self::save) to persist the reset.
    pub fn reset(&self) {
        self.analyses_completed.store(0, Ordering::Relaxed);
        self.insufficient_data.store(0, Ordering::Relaxed);
        self.history_fallbacks.store(0, Ordering::Relaxed);
        self.results_saved.store(0, Ordering::Relaxed);
    }
}

impl Default for AnalysisLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub analyses_completed: u64,
    pub insufficient_data: u64,
    pub history_fallbacks: u64,
    pub results_saved: u64,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    analyses_completed: u64,
    insufficient_data: u64,
    history_fallbacks: u64,
    results_saved: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared analysis log.
pub type SharedAnalysisLog = Arc<AnalysisLog>;

pub fn create_shared_log() -> SharedAnalysisLog {
    Arc::new(AnalysisLog::new())
}

pub fn create_shared_log_with_persistence(path: PathBuf) -> SharedAnalysisLog {
    Arc::new(AnalysisLog::with_persistence(path))
}
