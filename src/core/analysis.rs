//! TVI result type and the pure scoring pipeline.
//!
//! [`analyze`] runs statistics, sub-scores, composite, classification and
//! recommendations for one session. It never touches a store; historical
//! comparison is layered on top by the engine.

use crate::core::classification::{recommendations, RiskLevel, SafetyRating};
use crate::core::scoring::{composite_score, SubScores};
use crate::core::statistics::VibrationStatistics;
use crate::error::TviError;
use crate::session::Session;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version tag stamped on every analysis.
pub const ANALYSIS_VERSION: &str = "1.0";

/// The outcome of scoring one transport session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TviResult {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    /// Composite Transport Vibration Index (0-100)
    pub tvi_score: f64,
    pub safety_rating: SafetyRating,
    pub risk_level: RiskLevel,
    pub sub_scores: SubScores,
    pub statistics: VibrationStatistics,
    /// Ordered, human-readable recommendations
    pub recommendations: Vec<String>,
    /// Position within historical scores (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile_rank: Option<f64>,
    /// Signed % deviation from the unit's recent baseline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_comparison: Option<f64>,
    pub analysis_version: String,
    pub computed_at: DateTime<Utc>,
}

impl TviResult {
    /// Multi-line summary for display.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Session {}\n\
             - TVI score: {:.1} ({}, risk {})\n\
             - Peak / sustained / pattern: {:.1} / {:.1} / {:.1}\n\
             - Smoothness index: {:.1} (std dev {:.3}g)\n",
            self.session_id,
            self.tvi_score,
            self.safety_rating,
            self.risk_level,
            self.sub_scores.peak,
            self.sub_scores.sustained,
            self.sub_scores.pattern,
            self.statistics.smoothness_index,
            self.statistics.std_dev,
        );

        if let Some(rank) = self.percentile_rank {
            out.push_str(&format!("- Percentile rank: {rank:.0}\n"));
        }
        if let Some(deviation) = self.baseline_comparison {
            out.push_str(&format!("- Baseline deviation: {deviation:+.1}%\n"));
        }

        out.push_str("\nRecommendations:\n");
        for rec in &self.recommendations {
            out.push_str(&format!("  * {rec}\n"));
        }
        out
    }
}

/// Score a session without historical comparison.
pub fn analyze(session: &Session) -> Result<TviResult, TviError> {
    if session.is_empty() {
        return Err(TviError::insufficient(
            &session.session_id,
            "session has no samples",
        ));
    }

    if let Some(index) = session.samples.iter().position(|s| !s.total.is_finite()) {
        return Err(TviError::invalid(
            &session.session_id,
            format!("sample {index} has a non-finite magnitude"),
        ));
    }

    let magnitudes = session.magnitudes();
    let statistics = VibrationStatistics::from_magnitudes(&magnitudes);
    if !statistics.is_finite() {
        return Err(TviError::invalid(&session.session_id, "magnitudes too large to score"));
    }
    let sub_scores = SubScores::compute(
        &magnitudes,
        &statistics,
        session.peak_magnitude,
        session.duration_secs,
    );

    let tvi_score = composite_score(&sub_scores, statistics.smoothness_index);
    let recommendations = recommendations(&sub_scores, statistics.smoothness_index, tvi_score)
        .iter()
        .map(ToString::to_string)
        .collect();

    Ok(TviResult {
        session_id: session.session_id.clone(),
        unit_id: session.unit_id.clone(),
        tvi_score,
        safety_rating: SafetyRating::from_score(tvi_score),
        risk_level: RiskLevel::assess(tvi_score, sub_scores.peak),
        sub_scores,
        statistics,
        recommendations,
        percentile_rank: None,
        baseline_comparison: None,
        analysis_version: ANALYSIS_VERSION.to_string(),
        computed_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classification::{Recommendation, DEFAULT_RECOMMENDATIONS};
    use crate::session::Sample;

    fn session(magnitudes: &[f64], peak: f64, duration: f64) -> Session {
        let now = Utc::now();
        let samples = magnitudes
            .iter()
            .map(|&m| Sample::with_total(now, 0.0, 0.0, m, m))
            .collect();
        let avg = magnitudes.iter().sum::<f64>() / magnitudes.len().max(1) as f64;
        Session::new("s-test", "device", now, duration, peak, avg, samples)
    }

    #[test]
    fn test_uniform_low_vibration() {
        let result = analyze(&session(&[0.2; 20], 0.2, 60.0)).unwrap();

        assert_eq!(result.sub_scores.peak, 95.0);
        assert_eq!(result.sub_scores.sustained, 100.0);
        assert!((result.sub_scores.pattern - 100.0).abs() < 1e-9);
        assert_eq!(result.tvi_score, 100.0);
        assert_eq!(result.safety_rating, SafetyRating::Excellent);
        assert_eq!(result.risk_level, RiskLevel::Low);

        let defaults: Vec<String> = DEFAULT_RECOMMENDATIONS
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(result.recommendations, defaults);
        assert!(result.percentile_rank.is_none());
        assert!(result.baseline_comparison.is_none());
        assert_eq!(result.analysis_version, ANALYSIS_VERSION);
    }

    #[test]
    fn test_harsh_long_transport() {
        let magnitudes: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 0.5 } else { 2.5 }).collect();
        let result = analyze(&session(&magnitudes, 3.5, 700.0)).unwrap();

        assert_eq!(result.sub_scores.peak, 20.0);
        assert_eq!(result.sub_scores.sustained, 0.0);
        assert!(result.tvi_score < 35.0);
        assert_eq!(result.safety_rating, SafetyRating::Critical);
        assert_eq!(result.risk_level, RiskLevel::Critical);
        assert!(result
            .recommendations
            .contains(&Recommendation::ImmediateReview.to_string()));
    }

    #[test]
    fn test_few_samples_neutral_pattern() {
        let result = analyze(&session(&[0.3, 0.4, 0.2, 0.35, 0.25], 0.4, 10.0)).unwrap();
        assert_eq!(result.sub_scores.pattern, 50.0);
    }

    #[test]
    fn test_empty_session_is_insufficient() {
        let err = analyze(&session(&[], 0.0, 0.0)).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_non_finite_magnitude_is_rejected() {
        let mut magnitudes = vec![0.3; 15];
        magnitudes[7] = f64::NAN;
        let err = analyze(&session(&magnitudes, 0.3, 30.0)).unwrap_err();
        assert!(matches!(err, TviError::InvalidData { .. }));

        magnitudes[7] = f64::INFINITY;
        let err = analyze(&session(&magnitudes, 0.3, 30.0)).unwrap_err();
        assert!(matches!(err, TviError::InvalidData { .. }));
    }

    #[test]
    fn test_overflowing_variance_is_rejected() {
        let mut magnitudes = vec![0.3; 15];
        magnitudes[7] = 1e200;
        let err = analyze(&session(&magnitudes, 1e200, 30.0)).unwrap_err();
        assert!(matches!(err, TviError::InvalidData { .. }));
        assert!(!err.is_insufficient_data());
    }

    #[test]
    fn test_large_finite_magnitudes_stay_in_range() {
        let magnitudes: Vec<f64> = (0..15).map(|i| 50.0 + i as f64).collect();
        let result = analyze(&session(&magnitudes, 64.0, 30.0)).unwrap();
        assert!((0.0..=100.0).contains(&result.tvi_score));
        assert!((0.0..=100.0).contains(&result.sub_scores.pattern));
    }

    #[test]
    fn test_all_zero_session_is_finite() {
        let result = analyze(&session(&[0.0; 12], 0.0, 30.0)).unwrap();
        assert!(result.tvi_score.is_finite());
        assert_eq!(result.statistics.smoothness_index, 100.0);
    }

    #[test]
    fn test_summary_contents() {
        let result = analyze(&session(&[0.2; 20], 0.2, 60.0)).unwrap();
        let summary = result.summary();
        assert!(summary.contains("TVI score: 100.0"));
        assert!(summary.contains("excellent"));
        assert!(summary.contains("Recommendations"));
        assert!(!summary.contains("Percentile"));
    }
}
