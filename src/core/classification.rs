//! Safety rating, risk level and recommendation rules.
//!
//! All three are pure functions of the computed scores. The risk rule is
//! asymmetric: `low` and `moderate` need both the composite and the peak
//! sub-score to be good, while either one alone escalates to `high`.

use crate::core::scoring::SubScores;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall safety rating of a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyRating {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl SafetyRating {
    /// Classify a composite score.
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            SafetyRating::Excellent
        } else if score >= 70.0 {
            SafetyRating::Good
        } else if score >= 55.0 {
            SafetyRating::Fair
        } else if score >= 35.0 {
            SafetyRating::Poor
        } else {
            SafetyRating::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyRating::Excellent => "excellent",
            SafetyRating::Good => "good",
            SafetyRating::Fair => "fair",
            SafetyRating::Poor => "poor",
            SafetyRating::Critical => "critical",
        }
    }
}

impl fmt::Display for SafetyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Risk level of a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Classify from the composite score and the peak sub-score.
    ///
    /// Branches are evaluated in order and the first match wins.
    pub fn assess(composite: f64, peak_score: f64) -> Self {
        if composite >= 75.0 && peak_score >= 80.0 {
            RiskLevel::Low
        } else if composite >= 60.0 && peak_score >= 60.0 {
            RiskLevel::Moderate
        } else if composite >= 40.0 || peak_score >= 40.0 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An actionable recommendation attached to an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    ReduceSpeed,
    VibrationDampening,
    MinimizeDuration,
    OptimizeRoute,
    SmootherAcceleration,
    StaffTraining,
    EquipmentReview,
    AdditionalStabilization,
    ImmediateReview,
    SafetyAssessment,
    WithinSafeLimits,
    ContinuePractices,
}

impl Recommendation {
    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::ReduceSpeed => {
                "Reduce transport speed and avoid sudden movements to lower peak vibration"
            }
            Recommendation::VibrationDampening => {
                "Use vibration dampening on the incubator mount"
            }
            Recommendation::MinimizeDuration => {
                "Minimize transport duration where clinically possible"
            }
            Recommendation::OptimizeRoute => "Optimize the route to avoid rough road surfaces",
            Recommendation::SmootherAcceleration => {
                "Ensure smoother acceleration and deceleration"
            }
            Recommendation::StaffTraining => {
                "Provide staff and driver training on neonatal transport handling"
            }
            Recommendation::EquipmentReview => "Review transport equipment for mechanical issues",
            Recommendation::AdditionalStabilization => {
                "Add stabilization for the incubator during transport"
            }
            Recommendation::ImmediateReview => {
                "IMMEDIATE REVIEW REQUIRED: vibration exposure exceeded safe levels"
            }
            Recommendation::SafetyAssessment => {
                "Complete a safety assessment before the next transport"
            }
            Recommendation::WithinSafeLimits => "Transport vibration levels are within safe limits",
            Recommendation::ContinuePractices => "Continue current transport practices",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Recommendations returned when no degradation condition fires.
pub const DEFAULT_RECOMMENDATIONS: [Recommendation; 2] = [
    Recommendation::WithinSafeLimits,
    Recommendation::ContinuePractices,
];

/// Build the ordered recommendation list.
///
/// Every rule is checked independently, so several can fire together.
pub fn recommendations(
    sub_scores: &SubScores,
    smoothness_index: f64,
    composite: f64,
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if sub_scores.peak < 60.0 {
        out.push(Recommendation::ReduceSpeed);
        out.push(Recommendation::VibrationDampening);
    }
    if sub_scores.sustained < 70.0 {
        out.push(Recommendation::MinimizeDuration);
        out.push(Recommendation::OptimizeRoute);
    }
    if sub_scores.pattern < 60.0 {
        out.push(Recommendation::SmootherAcceleration);
        out.push(Recommendation::StaffTraining);
    }
    if smoothness_index < 40.0 {
        out.push(Recommendation::EquipmentReview);
        out.push(Recommendation::AdditionalStabilization);
    }
    if composite < 50.0 {
        out.push(Recommendation::ImmediateReview);
        out.push(Recommendation::SafetyAssessment);
    }

    if out.is_empty() {
        out.extend(DEFAULT_RECOMMENDATIONS);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(peak: f64, sustained: f64, pattern: f64) -> SubScores {
        SubScores {
            peak,
            sustained,
            pattern,
        }
    }

    #[test]
    fn test_safety_rating_breakpoints() {
        assert_eq!(SafetyRating::from_score(100.0), SafetyRating::Excellent);
        assert_eq!(SafetyRating::from_score(85.0), SafetyRating::Excellent);
        assert_eq!(SafetyRating::from_score(84.99), SafetyRating::Good);
        assert_eq!(SafetyRating::from_score(70.0), SafetyRating::Good);
        assert_eq!(SafetyRating::from_score(55.0), SafetyRating::Fair);
        assert_eq!(SafetyRating::from_score(35.0), SafetyRating::Poor);
        assert_eq!(SafetyRating::from_score(34.9), SafetyRating::Critical);
        assert_eq!(SafetyRating::from_score(0.0), SafetyRating::Critical);
    }

    #[test]
    fn test_risk_level_branches() {
        assert_eq!(RiskLevel::assess(80.0, 80.0), RiskLevel::Low);
        // Good composite but weak peak drops to moderate
        assert_eq!(RiskLevel::assess(90.0, 60.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::assess(60.0, 95.0), RiskLevel::Moderate);
        // Either dimension alone is enough for high
        assert_eq!(RiskLevel::assess(90.0, 20.0), RiskLevel::High);
        assert_eq!(RiskLevel::assess(20.0, 40.0), RiskLevel::High);
        assert_eq!(RiskLevel::assess(39.9, 20.0), RiskLevel::Critical);
    }

    #[test]
    fn test_rating_serialization() {
        let json = serde_json::to_string(&SafetyRating::Excellent).unwrap();
        assert_eq!(json, "\"excellent\"");
        let risk: RiskLevel = serde_json::from_str("\"moderate\"").unwrap();
        assert_eq!(risk, RiskLevel::Moderate);
        assert_eq!(RiskLevel::Critical.to_string(), "critical");
    }

    #[test]
    fn test_default_recommendations() {
        let recs = recommendations(&scores(95.0, 100.0, 100.0), 100.0, 100.0);
        assert_eq!(recs, DEFAULT_RECOMMENDATIONS.to_vec());
    }

    #[test]
    fn test_all_recommendations_fire_in_order() {
        let recs = recommendations(&scores(20.0, 0.0, 30.0), 10.0, 15.0);
        assert_eq!(
            recs,
            vec![
                Recommendation::ReduceSpeed,
                Recommendation::VibrationDampening,
                Recommendation::MinimizeDuration,
                Recommendation::OptimizeRoute,
                Recommendation::SmootherAcceleration,
                Recommendation::StaffTraining,
                Recommendation::EquipmentReview,
                Recommendation::AdditionalStabilization,
                Recommendation::ImmediateReview,
                Recommendation::SafetyAssessment,
            ]
        );
    }

    #[test]
    fn test_single_condition() {
        let recs = recommendations(&scores(95.0, 65.0, 100.0), 90.0, 80.0);
        assert_eq!(
            recs,
            vec![
                Recommendation::MinimizeDuration,
                Recommendation::OptimizeRoute
            ]
        );
    }

    #[test]
    fn test_immediate_review_message() {
        assert!(Recommendation::ImmediateReview
            .to_string()
            .starts_with("IMMEDIATE REVIEW REQUIRED"));
    }
}
