//! Platform error types
//!
//! This module defines error types for platform operations.
//!
//! Pin writes and register accesses are fire-and-forget on every supported
//! family, so the only platform errors are configuration errors detected
//! before any signal is emitted.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// Pin number outside the range the platform can address
    InvalidPin(u8),
    /// Two control lines were assigned the same pin
    PinConflict(u8),
    /// Invalid configuration provided
    InvalidConfig,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::InvalidPin(pin) => write!(f, "Invalid pin: {}", pin),
            PlatformError::PinConflict(pin) => write!(f, "Pin {} assigned twice", pin),
            PlatformError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}
