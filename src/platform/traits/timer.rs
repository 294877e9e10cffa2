//! PWM timer backend trait
//!
//! Each supported microcontroller family wires the four motor PWM pins to a
//! different set of hardware timers and compare channels. A [`TimerBackend`]
//! hides that mapping behind one interface so the motor driver never branches
//! on the target family.

use super::GpioInterface;

/// Motor PWM slot, one per shield motor terminal pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmSlot {
    /// Motor 1
    M1,
    /// Motor 2
    M2,
    /// Motor 3
    M3,
    /// Motor 4
    M4,
}

impl PwmSlot {
    /// All slots in motor order
    pub const ALL: [PwmSlot; 4] = [PwmSlot::M1, PwmSlot::M2, PwmSlot::M3, PwmSlot::M4];

    /// Zero-based index of the slot
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// How a slot's speed output ended up being driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveMode {
    /// Hardware timer compare output, linear 0-255 duty
    Timer,
    /// Plain digital output thresholded at the duty midpoint
    Digital,
}

/// Timer prescaler selection code
///
/// The meaning of each code is family specific (see the `MOTOR*` constants
/// exported by each backend). Only the low three bits reach the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrequencyCode(u8);

impl FrequencyCode {
    /// Build a code from its raw value, keeping the three prescaler bits
    #[inline]
    pub const fn new(raw: u8) -> Self {
        Self(raw & 0x07)
    }

    /// Prescaler bits
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Per-family PWM timer configuration
pub trait TimerBackend {
    /// Human-readable family name
    const NAME: &'static str;

    /// Frequency code used when a channel does not request one
    const DEFAULT_FREQUENCY: FrequencyCode;

    /// Board pin carrying the speed signal of `slot`
    ///
    /// This is also the pin driven in digital mode.
    fn output_pin(&self, slot: PwmSlot) -> u8;

    /// Put `slot` into PWM mode with 0% duty
    ///
    /// Shared timebases are programmed only on their first request; later
    /// requests keep the existing period and prescaler. Returns
    /// [`DriveMode::Digital`] when the family has no timer output for the
    /// slot, in which case the pin has been made a low digital output.
    fn configure<G: GpioInterface>(
        &mut self,
        gpio: &mut G,
        slot: PwmSlot,
        frequency: FrequencyCode,
    ) -> DriveMode;

    /// Write `duty` (0 = off, 255 = full) to the slot's compare register
    fn set_duty(&mut self, slot: PwmSlot, duty: u8);

    /// Current compare value of the slot
    fn duty(&self, slot: PwmSlot) -> u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_code_masks_prescaler_bits() {
        assert_eq!(FrequencyCode::new(0x0B).bits(), 0x03);
        assert_eq!(FrequencyCode::new(7).bits(), 7);
    }

    #[test]
    fn test_slot_index() {
        assert_eq!(PwmSlot::M1.index(), 0);
        assert_eq!(PwmSlot::M4.index(), 3);
        assert_eq!(PwmSlot::ALL[2], PwmSlot::M3);
    }
}
