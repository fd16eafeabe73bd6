//! Accelerometer sample and transport session types.
//!
//! A session is one bounded capture interval recorded during a transport. It
//! is read-only to the engine: sessions are produced by the capture side
//! (see [`SessionRecorder`](crate::session::SessionRecorder)) and looked up
//! by identifier when scoring.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tri-axial accelerometer reading, in g.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Timestamp when the reading was taken
    pub timestamp: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Precomputed vector magnitude of (x, y, z)
    pub total: f64,
}

impl Sample {
    /// Create a sample, computing its magnitude from the three components.
    pub fn new(timestamp: DateTime<Utc>, x: f64, y: f64, z: f64) -> Self {
        Self {
            timestamp,
            x,
            y,
            z,
            total: (x * x + y * y + z * z).sqrt(),
        }
    }

    /// Create a sample whose magnitude was already computed upstream.
    pub fn with_total(timestamp: DateTime<Utc>, x: f64, y: f64, z: f64, total: f64) -> Self {
        Self {
            timestamp,
            x,
            y,
            z,
            total,
        }
    }

    /// Whether every component and the magnitude are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.total.is_finite()
    }
}

/// One transport monitoring interval with its ordered samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub device_id: String,
    pub start_time: DateTime<Utc>,
    /// Length of the capture in seconds
    pub duration_secs: f64,
    /// Peak magnitude declared by the capture side
    pub peak_magnitude: f64,
    /// Average magnitude declared by the capture side
    pub average_magnitude: f64,
    /// Transport unit the session was recorded on, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    /// Samples in chronological (insertion) order
    pub samples: Vec<Sample>,
}

impl Session {
    /// Create a session from explicit metadata.
    pub fn new(
        session_id: impl Into<String>,
        device_id: impl Into<String>,
        start_time: DateTime<Utc>,
        duration_secs: f64,
        peak_magnitude: f64,
        average_magnitude: f64,
        samples: Vec<Sample>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            device_id: device_id.into(),
            start_time,
            duration_secs,
            peak_magnitude,
            average_magnitude,
            unit_id: None,
            samples,
        }
    }

    /// Attach the transport unit this session was recorded on.
    pub fn with_unit(mut self, unit_id: impl Into<String>) -> Self {
        self.unit_id = Some(unit_id.into());
        self
    }

    /// Sample magnitudes in chronological order.
    pub fn magnitudes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.total).collect()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
