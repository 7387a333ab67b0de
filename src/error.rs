use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while turning a rotation time-of-day into a file name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    /// The value has no `:` between hour and minute.
    #[error("split-at {value:?} is not in HH:MM form")]
    MissingSeparator { value: String },

    /// The hour part is not an integer.
    #[error("split-at {value:?} has a non-numeric hour")]
    InvalidHour { value: String },

    /// The minute part is not an integer.
    #[error("split-at {value:?} has a non-numeric minute")]
    InvalidMinute { value: String },

    /// Hour or minute is numeric but not a valid time of day.
    #[error("split-at {value:?} is not a valid time of day")]
    OutOfRange { value: String },
}

/// Reasons a recording session ends in failure.
///
/// Rotation is not one of them; see [`crate::messages::SessionOutcome::Rotated`].
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to connect to source {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open {path:?} for writing: {source}")]
    SinkOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy: {0}")]
    Transfer(#[source] std::io::Error),
}
