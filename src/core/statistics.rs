//! Descriptive statistics over sample magnitudes.
//!
//! Variance and standard deviation are population measures. The smoothness
//! index is 100 minus the coefficient of variation expressed as a percentage.

use serde::{Deserialize, Serialize};

/// Statistical summary of one session's magnitudes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VibrationStatistics {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    /// 0-100, higher = more uniform vibration
    pub smoothness_index: f64,
}

impl VibrationStatistics {
    /// Compute statistics for a set of magnitudes.
    ///
    /// An empty slice yields all zeros; callers reject empty sessions first.
    pub fn from_magnitudes(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mean = mean(values);
        let variance = population_variance(values, mean);
        let std_dev = variance.sqrt();

        Self {
            mean,
            variance,
            std_dev,
            smoothness_index: smoothness_index(mean, std_dev),
        }
    }

    /// False when a value overflowed, which happens for extreme magnitudes.
    pub fn is_finite(&self) -> bool {
        self.mean.is_finite() && self.variance.is_finite() && self.std_dev.is_finite()
    }
}

/// Arithmetic mean of a slice of values.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance around a precomputed mean.
pub fn population_variance(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Smoothness index from mean and standard deviation.
///
/// A zero mean over non-negative magnitudes means every sample is zero, so
/// the set is treated as perfectly smooth instead of dividing by zero.
pub fn smoothness_index(mean: f64, std_dev: f64) -> f64 {
    if mean == 0.0 {
        return 100.0;
    }
    let coefficient_of_variation = std_dev / mean;
    (100.0 - 100.0 * coefficient_of_variation).max(0.0)
}

/// Lag-1 autocorrelation of a sequence.
///
/// Returns 1 when the variance is zero, and 0 for fewer than two values.
pub fn lag1_autocorrelation(values: &[f64], mean: f64, variance: f64) -> f64 {
    if variance == 0.0 {
        return 1.0;
    }
    if values.len() < 2 {
        return 0.0;
    }

    let numerator: f64 = values
        .windows(2)
        .map(|pair| (pair[0] - mean) * (pair[1] - mean))
        .sum();

    numerator / ((values.len() - 1) as f64 * variance)
}

/// Percentage of values deviating from the mean by more than two standard
/// deviations.
pub fn spike_percentage(values: &[f64], mean: f64, std_dev: f64) -> f64 {
    let threshold = 2.0 * std_dev;
    percentage_where(values, |v| (v - mean).abs() > threshold)
}

/// Percentage of values strictly greater than a threshold.
pub fn percentage_above(values: &[f64], threshold: f64) -> f64 {
    percentage_where(values, |v| v > threshold)
}

fn percentage_where(values: &[f64], predicate: impl Fn(f64) -> bool) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let count = values.iter().filter(|&&v| predicate(v)).count();
    count as f64 / values.len() as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_statistics() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = VibrationStatistics::from_magnitudes(&values);

        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.variance - 4.0).abs() < 1e-12);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
        // CV = 0.4 -> 100 - 40
        assert!((stats.smoothness_index - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_smoothness_floors_at_zero() {
        assert_eq!(smoothness_index(1.0, 3.0), 0.0);
    }

    #[test]
    fn test_zero_mean_is_smooth() {
        let stats = VibrationStatistics::from_magnitudes(&[0.0, 0.0, 0.0]);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.smoothness_index, 100.0);
        assert!(stats.smoothness_index.is_finite());
    }

    #[test]
    fn test_overflow_is_not_finite() {
        let mut values = vec![0.3; 15];
        values[3] = 1e200;
        let stats = VibrationStatistics::from_magnitudes(&values);
        assert!(stats.mean.is_finite());
        assert!(!stats.is_finite());
        assert!(VibrationStatistics::from_magnitudes(&[0.2, 0.4]).is_finite());
    }

    #[test]
    fn test_autocorrelation_zero_variance() {
        assert_eq!(lag1_autocorrelation(&[1.0, 1.0, 1.0], 1.0, 0.0), 1.0);
    }

    #[test]
    fn test_autocorrelation_alternating() {
        let values = vec![0.0, 2.0, 0.0, 2.0, 0.0, 2.0];
        let m = mean(&values);
        let var = population_variance(&values, m);
        let r = lag1_autocorrelation(&values, m, var);
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_autocorrelation_trend_is_positive() {
        let values: Vec<f64> = (0..20).map(|i| i as f64 * 0.1).collect();
        let m = mean(&values);
        let var = population_variance(&values, m);
        assert!(lag1_autocorrelation(&values, m, var) > 0.8);
    }

    #[test]
    fn test_spike_percentage() {
        let mut values = vec![1.0; 19];
        values.push(10.0);
        let m = mean(&values);
        let sd = population_variance(&values, m).sqrt();
        assert!((spike_percentage(&values, m, sd) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_above_is_strict() {
        let values = vec![0.5, 1.0, 1.5, 2.5];
        assert_eq!(percentage_above(&values, 1.0), 50.0);
        assert_eq!(percentage_above(&values, 2.0), 25.0);
        assert_eq!(percentage_above(&[], 1.0), 0.0);
    }
}
