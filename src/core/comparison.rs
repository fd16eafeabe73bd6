//! Comparison of a new score against previously computed scores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Percentile rank reported when there is no history to compare against.
pub const DEFAULT_PERCENTILE_RANK: f64 = 50.0;

/// Baseline deviation reported when the unit has no history.
pub const DEFAULT_BASELINE_COMPARISON: f64 = 0.0;

/// Default number of recent scores forming a unit's baseline.
pub const DEFAULT_BASELINE_WINDOW: usize = 10;

/// A previously stored composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalScore {
    pub score: f64,
    pub computed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
}

impl HistoricalScore {
    pub fn new(score: f64, computed_at: DateTime<Utc>, unit_id: Option<String>) -> Self {
        Self {
            score,
            computed_at,
            unit_id,
        }
    }
}

/// Sort scores newest first.
pub fn newest_first(scores: &mut [HistoricalScore]) {
    scores.sort_by(|a, b| b.computed_at.cmp(&a.computed_at));
}

/// Share of historical scores strictly below `score`, as a percentage.
pub fn percentile_rank(score: f64, history: &[HistoricalScore]) -> f64 {
    if history.is_empty() {
        return DEFAULT_PERCENTILE_RANK;
    }
    let below = history.iter().filter(|h| h.score < score).count();
    below as f64 / history.len() as f64 * 100.0
}

/// Percentage deviation of `score` from the mean of the most recent scores.
///
/// `history` must already be ordered newest first.
pub fn baseline_comparison(score: f64, history: &[HistoricalScore], window: usize) -> f64 {
    let recent: Vec<f64> = history.iter().take(window).map(|h| h.score).collect();
    if recent.is_empty() {
        return DEFAULT_BASELINE_COMPARISON;
    }

    let baseline = recent.iter().mean();
    if baseline == 0.0 || !baseline.is_finite() {
        return DEFAULT_BASELINE_COMPARISON;
    }
    (score - baseline) / baseline * 100.0
}

/// Distribution summary of a score history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, `None` with fewer than two scores
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub latest: f64,
    pub latest_at: DateTime<Utc>,
}

impl HistorySummary {
    /// Summarize a history; `None` when it is empty.
    pub fn from_history(history: &[HistoricalScore]) -> Option<Self> {
        let latest = history.iter().max_by_key(|h| h.computed_at)?;
        let scores: Vec<f64> = history.iter().map(|h| h.score).collect();

        let std_dev = if scores.len() >= 2 {
            Some(scores.iter().std_dev())
        } else {
            None
        };

        Some(Self {
            count: scores.len(),
            mean: scores.iter().mean(),
            std_dev,
            min: Statistics::min(scores.iter()),
            max: Statistics::max(scores.iter()),
            latest: latest.score,
            latest_at: latest.computed_at,
        })
    }
}
