//! Core scoring for the TVI engine.
//!
//! This module contains:
//! - Descriptive statistics over sample magnitudes
//! - Peak, sustained and pattern sub-scores and the composite index
//! - Safety rating, risk level and recommendation rules
//! - Percentile and baseline comparison against score history

pub mod analysis;
pub mod classification;
pub mod comparison;
pub mod scoring;
pub mod statistics;

// Re-export commonly used types
pub use analysis::{analyze, TviResult, ANALYSIS_VERSION};
pub use classification::{Recommendation, RiskLevel, SafetyRating, DEFAULT_RECOMMENDATIONS};
pub use comparison::{
    baseline_comparison, percentile_rank, HistoricalScore, HistorySummary,
    DEFAULT_BASELINE_COMPARISON, DEFAULT_BASELINE_WINDOW, DEFAULT_PERCENTILE_RANK,
};
pub use scoring::SubScores;
pub use statistics::VibrationStatistics;
