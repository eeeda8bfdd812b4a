use std::path::PathBuf;

use thiserror::Error;

/// A reading failed precondition checks before touching any device state.
///
/// The engine validates before mutating, so a rejected reading leaves the
/// device windows exactly as they were.
#[derive(Debug, Error, PartialEq)]
pub enum ReadingError {
    #[error("device id must not be empty")]
    EmptyDeviceId,

    #[error("motion must be 0 or 1, got {0}")]
    MotionOutOfRange(u8),

    #[error("power must be finite and non-negative, got {0}")]
    InvalidPower(f64),

    #[error("brightness override must be at most 100, got {0}")]
    OverrideOutOfRange(u8),
}

/// Errors loading or validating an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("{field} must be at least 1")]
    WindowTooSmall { field: &'static str },

    #[error("analog thresholds must satisfy day_below < night_above (got day_below={day_below}, night_above={night_above})")]
    ThresholdsInverted { night_above: f64, day_below: f64 },

    #[error("{field} must be a finite value > 0, got {value}")]
    NonPositiveWatts { field: &'static str, value: f64 },

    #[error("max_devices must be at least 1 when set")]
    DeviceCapTooSmall,
}
