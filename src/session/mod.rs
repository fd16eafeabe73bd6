//! Transport sessions and their accelerometer samples.

pub mod recorder;
pub mod types;

pub use recorder::{RawReading, SessionError, SessionRecorder};
pub use types::{Sample, Session};
