//! Shield Wiring Parameters
//!
//! Pin assignments for the latch control lines and the mapping of motor
//! channels onto the sides of a differential-drive chassis.
//!
//! # Defaults
//!
//! | Line          | Pin |
//! |---------------|-----|
//! | Latch (RCLK)  | 12  |
//! | Clock (SRCLK) | 4   |
//! | Enable (/OE)  | 7   |
//! | Data (SER)    | 8   |

use crate::platform::{PlatformError, Result};

/// Highest board pin number (exclusive) accepted in a layout
pub const MAX_PIN: u8 = 64;

/// Default latch pin
const DEFAULT_LATCH: u8 = 12;

/// Default shift clock pin
const DEFAULT_CLOCK: u8 = 4;

/// Default output-enable pin (active low)
const DEFAULT_ENABLE: u8 = 7;

/// Default serial data pin
const DEFAULT_DATA: u8 = 8;

/// Pins wired to the shield's 74HC595
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LatchPins {
    /// Storage register clock; rising edge commits the shifted byte
    pub latch: u8,
    /// Shift register clock; rising edge samples `data`
    pub clock: u8,
    /// Output enable, active low
    pub enable: u8,
    /// Serial data input
    pub data: u8,
}

impl Default for LatchPins {
    fn default() -> Self {
        Self {
            latch: DEFAULT_LATCH,
            clock: DEFAULT_CLOCK,
            enable: DEFAULT_ENABLE,
            data: DEFAULT_DATA,
        }
    }
}

impl LatchPins {
    /// Control lines in configuration order
    pub fn as_array(&self) -> [u8; 4] {
        [self.latch, self.enable, self.data, self.clock]
    }

    /// Check that every line has its own addressable pin
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidPin` for a pin at or above [`MAX_PIN`],
    /// `PlatformError::PinConflict` when two lines share a pin.
    pub fn validate(&self) -> Result<()> {
        let pins = self.as_array();
        for (i, &pin) in pins.iter().enumerate() {
            if pin >= MAX_PIN {
                return Err(PlatformError::InvalidPin(pin));
            }
            if pins[i + 1..].contains(&pin) {
                return Err(PlatformError::PinConflict(pin));
            }
        }
        Ok(())
    }
}

/// Motor channel numbers per wheel position
///
/// Defaults match the shield silkscreen on a four-wheel chassis: front-left 2,
/// front-right 1, rear-left 3, rear-right 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveLayout {
    pub front_left: u8,
    pub front_right: u8,
    pub rear_left: u8,
    pub rear_right: u8,
}

impl Default for DriveLayout {
    fn default() -> Self {
        Self {
            front_left: 2,
            front_right: 1,
            rear_left: 3,
            rear_right: 4,
        }
    }
}

impl DriveLayout {
    /// Channels on the left side
    pub fn left(&self) -> [u8; 2] {
        [self.front_left, self.rear_left]
    }

    /// Channels on the right side
    pub fn right(&self) -> [u8; 2] {
        [self.front_right, self.rear_right]
    }

    /// Check that the layout uses each channel 1-4 exactly once
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidConfig` otherwise.
    pub fn validate(&self) -> Result<()> {
        let mut seen = [false; 4];
        for number in [
            self.front_left,
            self.front_right,
            self.rear_left,
            self.rear_right,
        ] {
            let index = match number {
                1..=4 => (number - 1) as usize,
                _ => return Err(PlatformError::InvalidConfig),
            };
            if seen[index] {
                return Err(PlatformError::InvalidConfig);
            }
            seen[index] = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pins_are_valid() {
        let pins = LatchPins::default();
        assert_eq!(pins.latch, 12);
        assert_eq!(pins.clock, 4);
        assert_eq!(pins.enable, 7);
        assert_eq!(pins.data, 8);
        assert!(pins.validate().is_ok());
    }

    #[test]
    fn test_pin_conflict() {
        let pins = LatchPins {
            data: 4,
            ..LatchPins::default()
        };
        assert_eq!(pins.validate(), Err(PlatformError::PinConflict(4)));
    }

    #[test]
    fn test_pin_out_of_range() {
        let pins = LatchPins {
            latch: 90,
            ..LatchPins::default()
        };
        assert_eq!(pins.validate(), Err(PlatformError::InvalidPin(90)));
    }

    #[test]
    fn test_drive_layout() {
        let layout = DriveLayout::default();
        assert!(layout.validate().is_ok());
        assert_eq!(layout.left(), [2, 3]);
        assert_eq!(layout.right(), [1, 4]);

        let duplicate = DriveLayout {
            rear_left: 1,
            ..layout
        };
        assert_eq!(duplicate.validate(), Err(PlatformError::InvalidConfig));

        let out_of_range = DriveLayout {
            rear_right: 5,
            ..layout
        };
        assert_eq!(out_of_range.validate(), Err(PlatformError::InvalidConfig));
    }
}
