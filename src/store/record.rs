//! Persisted form of a TVI analysis.

use crate::core::{
    HistoricalScore, RiskLevel, SafetyRating, SubScores, TviResult, VibrationStatistics,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored analysis row.
///
/// Recommendations are kept as JSON array text so the row stays flat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTviRecord {
    pub id: u64,
    pub session_id: String,
    pub unit_id: Option<String>,
    pub tvi_score: f64,
    pub safety_rating: SafetyRating,
    pub risk_level: RiskLevel,
    pub peak_score: f64,
    pub sustained_score: f64,
    pub pattern_score: f64,
    pub mean_magnitude: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub smoothness_index: f64,
    pub recommendations: String,
    pub percentile_rank: Option<f64>,
    pub baseline_comparison: Option<f64>,
    pub analysis_version: String,
    pub created_at: DateTime<Utc>,
}

impl StoredTviRecord {
    /// Build a row from a result.
    pub fn from_result(
        id: u64,
        session_id: &str,
        result: &TviResult,
        unit_id: Option<&str>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id,
            session_id: session_id.to_string(),
            unit_id: unit_id.map(str::to_string),
            tvi_score: result.tvi_score,
            safety_rating: result.safety_rating,
            risk_level: result.risk_level,
            peak_score: result.sub_scores.peak,
            sustained_score: result.sub_scores.sustained,
            pattern_score: result.sub_scores.pattern,
            mean_magnitude: result.statistics.mean,
            variance: result.statistics.variance,
            std_dev: result.statistics.std_dev,
            smoothness_index: result.statistics.smoothness_index,
            recommendations: serde_json::to_string(&result.recommendations)?,
            percentile_rank: result.percentile_rank,
            baseline_comparison: result.baseline_comparison,
            analysis_version: result.analysis_version.clone(),
            created_at: result.computed_at,
        })
    }

    /// Decode the stored recommendation list.
    pub fn recommendations(&self) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_str(&self.recommendations)
    }

    /// Rebuild the result this row was stored from.
    pub fn to_result(&self) -> Result<TviResult, serde_json::Error> {
        Ok(TviResult {
            session_id: self.session_id.clone(),
            unit_id: self.unit_id.clone(),
            tvi_score: self.tvi_score,
            safety_rating: self.safety_rating,
            risk_level: self.risk_level,
            sub_scores: SubScores {
                peak: self.peak_score,
                sustained: self.sustained_score,
                pattern: self.pattern_score,
            },
            statistics: VibrationStatistics {
                mean: self.mean_magnitude,
                variance: self.variance,
                std_dev: self.std_dev,
                smoothness_index: self.smoothness_index,
            },
            recommendations: self.recommendations()?,
            percentile_rank: self.percentile_rank,
            baseline_comparison: self.baseline_comparison,
            analysis_version: self.analysis_version.clone(),
            computed_at: self.created_at,
        })
    }

    pub fn historical_score(&self) -> HistoricalScore {
        HistoricalScore::new(self.tvi_score, self.created_at, self.unit_id.clone())
    }

    /// Whether this row belongs to the requested unit (any unit for `None`).
    pub fn matches_unit(&self, unit_id: Option<&str>) -> bool {
        match unit_id {
            Some(unit) => self.unit_id.as_deref() == Some(unit),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analyze;
    use crate::session::{Sample, Session};

    #[test]
    fn test_record_preserves_result() {
        let now = Utc::now();
        let samples = (0..12)
            .map(|i| Sample::with_total(now, 0.0, 0.0, 0.1 * i as f64, 0.1 * i as f64))
            .collect();
        let session = Session::new("s-9", "dev", now, 30.0, 1.1, 0.55, samples).with_unit("U2");
        let mut result = analyze(&session).unwrap();
        result.percentile_rank = Some(75.0);

        let record = StoredTviRecord::from_result(4, "s-9", &result, Some("U2")).unwrap();
        assert!(record.recommendations.starts_with('['));
        assert_eq!(record.recommendations().unwrap(), result.recommendations);
        assert_eq!(record.to_result().unwrap(), result);

        assert!(record.matches_unit(Some("U2")));
        assert!(record.matches_unit(None));
        assert!(!record.matches_unit(Some("U3")));
        assert_eq!(record.historical_score().score, result.tvi_score);
    }
}
