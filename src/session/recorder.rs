//! Session recording from raw accelerometer readings.
//!
//! Readings are appended in arrival order. When the capture ends the
//! recorder derives the session metadata (start, duration, peak and average
//! magnitude) that the engine later reads as declared values.

use crate::session::types::{Sample, Session};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A raw reading as delivered by a capture device.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawReading {
    pub timestamp: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Errors raised while recording a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no readings were recorded")]
    NoReadings,
    #[error("reading {index} has a non-finite component")]
    InvalidReading { index: usize },
}

/// Accumulates readings for one transport session.
pub struct SessionRecorder {
    session_id: String,
    device_id: String,
    unit_id: Option<String>,
    samples: Vec<Sample>,
}

impl SessionRecorder {
    /// Start recording with a generated session identifier.
    pub fn new(device_id: impl Into<String>) -> Self {
        Self::with_session_id(format!("SESS-{}", Uuid::new_v4()), device_id)
    }

    /// Start recording under a known session identifier.
    pub fn with_session_id(session_id: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            device_id: device_id.into(),
            unit_id: None,
            samples: Vec::new(),
        }
    }

    /// Tag the session with the transport unit it is recorded on.
    pub fn for_unit(mut self, unit_id: impl Into<String>) -> Self {
        self.unit_id = Some(unit_id.into());
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Append one reading.
    pub fn record(&mut self, reading: RawReading) -> Result<(), SessionError> {
        let sample = Sample::new(reading.timestamp, reading.x, reading.y, reading.z);
        if !sample.is_finite() {
            return Err(SessionError::InvalidReading {
                index: self.samples.len(),
            });
        }
        self.samples.push(sample);
        Ok(())
    }

    /// Append a batch of readings, stopping at the first invalid one.
    pub fn record_all<I>(&mut self, readings: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = RawReading>,
    {
        for reading in readings {
            self.record(reading)?;
        }
        Ok(())
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Finish the capture and build the session.
    pub fn finish(self) -> Result<Session, SessionError> {
        let first = self.samples.first().ok_or(SessionError::NoReadings)?;
        let start_time = first.timestamp;
        let end_time = self
            .samples
            .iter()
            .map(|s| s.timestamp)
            .max()
            .unwrap_or(start_time);

        let duration_secs = (end_time - start_time).num_milliseconds() as f64 / 1000.0;
        let peak_magnitude = self.samples.iter().map(|s| s.total).fold(0.0, f64::max);
        let average_magnitude =
            self.samples.iter().map(|s| s.total).sum::<f64>() / self.samples.len() as f64;

        let mut session = Session::new(
            self.session_id,
            self.device_id,
            start_time,
            duration_secs,
            peak_magnitude,
            average_magnitude,
            self.samples,
        );
        session.unit_id = self.unit_id;
        Ok(session)
    }
}
