//! Storage capabilities consumed by the engine.
//!
//! The engine never talks to a database directly. It is handed an
//! implementation of these three traits:
//!
//! - [`SessionLookup`] finds a recorded session by identifier
//! - [`HistoricalScores`] lists previously computed composite scores
//! - [`ResultStore`] persists a finished analysis

pub mod json_file;
pub mod memory;
pub mod record;

use crate::core::{HistoricalScore, TviResult};
use crate::error::StoreError;
use crate::session::Session;
use async_trait::async_trait;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use record::StoredTviRecord;

/// Looks up recorded sessions.
#[async_trait]
pub trait SessionLookup: Send + Sync {
    /// Return the session, or `None` if it does not exist.
    async fn find_session(&self, session_id: &str) -> Result<Option<Session>, StoreError>;
}

/// Lists previously computed scores.
#[async_trait]
pub trait HistoricalScores: Send + Sync {
    /// Scores for one unit, or for every unit when `unit_id` is `None`.
    async fn historical_scores(
        &self,
        unit_id: Option<&str>,
    ) -> Result<Vec<HistoricalScore>, StoreError>;
}

/// Persists finished analyses.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Store a result and return the new record identifier.
    async fn save_result(
        &self,
        session_id: &str,
        result: &TviResult,
        unit_id: Option<&str>,
    ) -> Result<u64, StoreError>;
}

/// A store providing every capability the engine needs.
pub trait TviRepository: SessionLookup + HistoricalScores + ResultStore {}

impl<T> TviRepository for T where T: SessionLookup + HistoricalScores + ResultStore {}
