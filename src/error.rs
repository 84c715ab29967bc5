//! Error types for the ventilation controller.
//!
//! Each subsystem gets a small `Clone + PartialEq` enum so that failures can
//! be logged, compared in tests, and passed across the thread boundary
//! between the control loop and the status interface.

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Failure to acquire a reading from a hardware sensor device.
///
/// Never escapes the sensor adapter: the adapter substitutes a fallback
/// reading and records the degraded condition instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// No device is attached or it did not answer.
    NotConnected,
    /// The bus transaction started but returned an error.
    ReadFailed,
    /// The device answered with a physically implausible value.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "sensor not connected"),
            Self::ReadFailed => write!(f, "sensor read failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl std::error::Error for SensorError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from loading, validating, patching, or persisting settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No settings document in durable storage (first start).
    NotFound,
    /// Stored document could not be parsed.
    Corrupted(String),
    /// A patch body was not a valid partial settings document.
    MalformedPatch(String),
    /// A settings field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage I/O failed.
    Io(std::io::ErrorKind),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "settings not found"),
            Self::Corrupted(msg) => write!(f, "settings corrupted: {msg}"),
            Self::MalformedPatch(msg) => write!(f, "malformed settings patch: {msg}"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Io(kind) => write!(f, "I/O error: {kind}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(e.kind())
        }
    }
}

impl ConfigError {
    /// Whether the error was caused by the caller's input rather than by
    /// storage. Used by the status interface to pick a response code.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MalformedPatch(_) | Self::ValidationFailed(_))
    }
}
