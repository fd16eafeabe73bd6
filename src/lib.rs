//! TVI Engine - Transport Vibration Index scoring for neonatal transport.
//!
//! This library scores the vibration a transport incubator was exposed to
//! during one monitored transport, from the tri-axial accelerometer samples
//! recorded for that session.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         TVI Engine                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │  Session    │──▶│ Statistics  │──▶│ Sub-scores  │       │
//! │  │  Lookup     │   │ (magnitude) │   │ + composite │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │                                             │               │
//! │                                             ▼               │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │   Result    │◀──│ Historical  │◀──│ Rating, risk│       │
//! │  │   Store     │   │ comparison  │   │ + advice    │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tvi_engine::{MemoryStore, TviEngine};
//!
//! # async fn run() -> Result<(), tvi_engine::TviError> {
//! let store = Arc::new(MemoryStore::new());
//! let engine = TviEngine::new(store);
//!
//! let result = engine.calculate_tvi("SESS-1").await?;
//! let record_id = engine
//!     .save_tvi_analysis(&result.session_id, &result, result.unit_id.as_deref())
//!     .await?;
//! println!("{} saved as {record_id}", result.tvi_score);
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod session;
pub mod store;

// Re-export key types at crate root for convenience
pub use audit::{AnalysisLog, AnalysisStats, SharedAnalysisLog};
pub use config::{Config, ConfigError, EngineConfig};
pub use core::{
    analyze, HistoricalScore, HistorySummary, RiskLevel, SafetyRating, SubScores, TviResult,
    VibrationStatistics, ANALYSIS_VERSION,
};
pub use engine::{HistoricalComparison, TviEngine};
pub use error::{StoreError, TviError};
pub use session::{RawReading, Sample, Session, SessionError, SessionRecorder};
pub use store::{
    HistoricalScores, JsonFileStore, MemoryStore, ResultStore, SessionLookup, StoredTviRecord,
    TviRepository,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions() {
        assert!(!VERSION.is_empty());
        assert_eq!(ANALYSIS_VERSION, "1.0");
    }
}
