//! Error types for the TVI engine and its stores.

/// Errors raised by a session, history or result store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Errors raised while computing or saving a TVI analysis.
#[derive(Debug, thiserror::Error)]
pub enum TviError {
    /// No usable samples for the session; no result is produced.
    #[error("insufficient data for session {session_id}: {reason}")]
    InsufficientData { session_id: String, reason: String },
    /// Samples that cannot be scored, such as non-finite magnitudes.
    #[error("invalid data for session {session_id}: {reason}")]
    InvalidData { session_id: String, reason: String },
    #[error("session lookup failed: {0}")]
    SessionLookup(#[source] StoreError),
    #[error("saving analysis failed: {0}")]
    Save(#[source] StoreError),
}

impl TviError {
    pub(crate) fn insufficient(session_id: &str, reason: impl Into<String>) -> Self {
        TviError::InsufficientData {
            session_id: session_id.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(session_id: &str, reason: impl Into<String>) -> Self {
        TviError::InvalidData {
            session_id: session_id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, TviError::InsufficientData { .. })
    }
}
