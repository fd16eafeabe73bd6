//! Sub-score and composite score computation.
//!
//! Three independent component scores (peak, sustained, pattern) are
//! combined into the 0-100 Transport Vibration Index. Magnitudes are in g.

use crate::core::statistics::{
    lag1_autocorrelation, percentage_above, spike_percentage, VibrationStatistics,
};
use serde::{Deserialize, Serialize};

/// Magnitude above which a sample counts as a warning-level vibration.
pub const WARNING_THRESHOLD_G: f64 = 1.0;

/// Magnitude above which a sample counts as a critical vibration.
pub const CRITICAL_THRESHOLD_G: f64 = 2.0;

/// Minimum sample count for a meaningful pattern analysis.
pub const MIN_PATTERN_SAMPLES: usize = 10;

/// Pattern score used when there are too few samples.
pub const NEUTRAL_PATTERN_SCORE: f64 = 50.0;

/// Duration breakpoints (seconds) for the sustained-exposure discounts.
const LONG_TRANSPORT_SECS: f64 = 300.0;
const EXTENDED_TRANSPORT_SECS: f64 = 600.0;

/// Peak magnitude breakpoints and their scores, checked in order.
const PEAK_BREAKPOINTS: [(f64, f64); 4] = [(0.5, 95.0), (1.0, 80.0), (2.0, 60.0), (3.0, 40.0)];
const PEAK_FLOOR_SCORE: f64 = 20.0;

const PEAK_WEIGHT: f64 = 0.4;
const SUSTAINED_WEIGHT: f64 = 0.35;
const PATTERN_WEIGHT: f64 = 0.25;
const SMOOTHNESS_WEIGHT: f64 = 0.1;

/// The three component scores of one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub peak: f64,
    pub sustained: f64,
    pub pattern: f64,
}

impl SubScores {
    /// Compute all three sub-scores.
    pub fn compute(
        magnitudes: &[f64],
        stats: &VibrationStatistics,
        peak_magnitude: f64,
        duration_secs: f64,
    ) -> Self {
        Self {
            peak: peak_vibration_score(peak_magnitude),
            sustained: sustained_vibration_score(magnitudes, duration_secs),
            pattern: frequency_pattern_score(magnitudes, stats),
        }
    }
}

/// Score the declared peak magnitude against fixed breakpoints.
pub fn peak_vibration_score(peak_magnitude: f64) -> f64 {
    PEAK_BREAKPOINTS
        .iter()
        .find(|(limit, _)| peak_magnitude <= *limit)
        .map(|&(_, score)| score)
        .unwrap_or(PEAK_FLOOR_SCORE)
}

/// Score how much of the session was spent above the warning and critical
/// thresholds, discounted for long transports.
pub fn sustained_vibration_score(magnitudes: &[f64], duration_secs: f64) -> f64 {
    let warning_pct = percentage_above(magnitudes, WARNING_THRESHOLD_G);
    let critical_pct = percentage_above(magnitudes, CRITICAL_THRESHOLD_G);

    let mut score = 100.0 - 0.5 * warning_pct - 2.0 * critical_pct;

    if duration_secs > LONG_TRANSPORT_SECS {
        score *= 0.9;
    }
    if duration_secs > EXTENDED_TRANSPORT_SECS {
        score *= 0.8;
    }

    score.max(0.0)
}

/// Score the regularity of the vibration signal.
///
/// Rewards correlated (gradual) changes and penalizes isolated spikes.
pub fn frequency_pattern_score(magnitudes: &[f64], stats: &VibrationStatistics) -> f64 {
    if magnitudes.len() < MIN_PATTERN_SAMPLES {
        return NEUTRAL_PATTERN_SCORE;
    }

    let autocorrelation = lag1_autocorrelation(magnitudes, stats.mean, stats.variance);
    let spike_pct = spike_percentage(magnitudes, stats.mean, stats.std_dev);

    (90.0 - 2.0 * spike_pct + 10.0 * autocorrelation).clamp(0.0, 100.0)
}

/// Weighted composite of the sub-scores with a smoothness adjustment.
pub fn composite_score(sub_scores: &SubScores, smoothness_index: f64) -> f64 {
    let weighted = sub_scores.peak * PEAK_WEIGHT
        + sub_scores.sustained * SUSTAINED_WEIGHT
        + sub_scores.pattern * PATTERN_WEIGHT;
    let smoothness_adjustment = (smoothness_index - 50.0) * SMOOTHNESS_WEIGHT;

    (weighted + smoothness_adjustment).clamp(0.0, 100.0)
}
