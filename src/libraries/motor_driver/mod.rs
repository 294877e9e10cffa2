//! Motor shield driver
//!
//! Drives up to four DC motors through the 74HC595 latch and L293D bridges of
//! an Adafruit-style motor shield. Direction lives in the latch (two bits per
//! motor); speed is a PWM duty on the motor's enable pin.
//!
//! ## Example
//!
//! ```ignore
//! use motor_shield::libraries::motor_driver::{Direction, MotorChannel, MotorShield};
//! use motor_shield::parameters::ChannelConfig;
//!
//! let mut shield = MotorShield::new(gpio, timer);
//! let mut left = MotorChannel::new(&mut shield, 1, ChannelConfig::default());
//!
//! left.set_direction(&mut shield, Direction::Forward);
//! left.set_speed(&mut shield, 200);
//!
//! // Several direction changes, one latch transmission
//! shield.batch(|shield| {
//!     left.set_direction(shield, Direction::Release);
//! });
//! ```

pub mod channel;
pub mod group;
pub mod latch;
pub mod shield;

use core::fmt;

use crate::platform::PlatformError;

// Re-export main types
pub use channel::{ChannelId, Direction, MotorChannel};
pub use group::MotorGroup;
pub use latch::LatchDriver;
pub use shield::MotorShield;

/// Result type for motor operations
pub type Result<T> = core::result::Result<T, MotorError>;

/// Motor control error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Channel number outside 1-4
    InvalidChannel,
    /// Wiring or layout rejected by the platform layer
    Platform(PlatformError),
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::InvalidChannel => write!(f, "Invalid motor channel"),
            MotorError::Platform(err) => write!(f, "Platform error: {}", err),
        }
    }
}

impl From<PlatformError> for MotorError {
    fn from(err: PlatformError) -> Self {
        MotorError::Platform(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_platform_error_conversion() {
        let err: MotorError = PlatformError::PinConflict(4).into();
        assert_eq!(err, MotorError::Platform(PlatformError::PinConflict(4)));
        assert_eq!(err.to_string(), "Platform error: Pin 4 assigned twice");
    }
}
