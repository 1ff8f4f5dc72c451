use thiserror::Error;

/// Error type for controller state and registry operations.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Dead zone threshold outside of `[0.0, 1.0]`.
    #[error("Dead zone out of range: {0} (expected 0.0..=1.0)")]
    DeadZoneOutOfRange(f32),
    /// Button name is not part of the mapping table.
    #[error("Unknown button: {0}")]
    UnknownButton(String),
    /// Event name does not match any supported event kind.
    #[error("Unknown event: {0}")]
    UnknownEvent(String),
    /// Vibration preset name is not known.
    #[error("Unknown vibration preset: {0}")]
    UnknownPreset(String),
    /// Operation is not supported on the current device.
    #[error("Operation unsupported")]
    Unsupported,
    /// Vibration requested with a zero duration.
    #[error("Vibration duration must be greater than zero")]
    InvalidDuration,
    /// A generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Convenient result alias for controller operations.
pub type Result<T> = std::result::Result<T, Error>;
