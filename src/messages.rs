use std::path::PathBuf;
use std::time::Duration;

/// How a session that did not fail ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Source closed the connection
    Eof { path: PathBuf, bytes: u64 },
    /// Rotation was requested while streaming
    Rotated { path: PathBuf, bytes: u64 },
}

impl SessionOutcome {
    pub fn path(&self) -> &PathBuf {
        match self {
            SessionOutcome::Eof { path, .. } | SessionOutcome::Rotated { path, .. } => path,
        }
    }

    pub fn bytes(&self) -> u64 {
        match self {
            SessionOutcome::Eof { bytes, .. } | SessionOutcome::Rotated { bytes, .. } => *bytes,
        }
    }
}

/// Lifecycle of one recording session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Streaming,
    Closed,
}

/// Supervisor progress (observable via channel)
#[derive(Clone, Debug, PartialEq)]
pub enum RecorderEvent {
    SessionStarted { attempt: u64 },
    SessionEnded { attempt: u64, outcome: SessionOutcome },
    SessionFailed { attempt: u64, error: String },
    RetryScheduled { delay: Duration },
}
