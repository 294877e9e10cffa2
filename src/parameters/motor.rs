//! Motor Channel Parameters
//!
//! Per-channel settings fixed when a motor channel is attached.

use crate::platform::traits::FrequencyCode;

/// Settings for one motor channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// PWM prescaler code; `None` selects the backend default
    pub frequency: Option<FrequencyCode>,
    /// Drive the speed pin from a hardware timer (`false`: on/off only)
    pub use_pwm: bool,
    /// Swap the forward and backward terminal patterns
    pub reversed: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            frequency: None,
            use_pwm: true,
            reversed: false,
        }
    }
}

impl ChannelConfig {
    /// Explicit frequency code and PWM flag
    pub const fn new(frequency: FrequencyCode, use_pwm: bool) -> Self {
        Self {
            frequency: Some(frequency),
            use_pwm,
            reversed: false,
        }
    }

    /// On/off speed control through a plain digital pin
    pub const fn digital() -> Self {
        Self {
            frequency: None,
            use_pwm: false,
            reversed: false,
        }
    }

    /// Set the frequency code
    pub const fn with_frequency(mut self, frequency: FrequencyCode) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Set whether the motor is wired backwards
    pub const fn with_reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }
}
