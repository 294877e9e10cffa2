//! GPIO interface trait
//!
//! This module defines the digital I/O capability the motor shield drives: the
//! four latch control lines and any motor PWM pin running in on/off mode.
//! Pins are addressed by board pin number, the same numbering printed on the
//! shield headers.

/// GPIO pin mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioMode {
    /// Input mode (high impedance)
    Input,
    /// Output mode (push-pull)
    Output,
}

/// Logic level of a digital line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0
    #[default]
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// `true` for [`Level::High`]
    #[inline]
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    #[inline]
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

/// GPIO interface trait
///
/// Platform implementations must provide this interface for pin control.
///
/// Writes are fire-and-forget: the shield hardware offers no feedback path, so
/// a write is assumed to have reached the pin once the call returns.
///
/// # Safety Invariants
///
/// - Only one owner of the pin bank at a time
/// - No concurrent access to the same pin from multiple contexts
pub trait GpioInterface {
    /// Set pin direction
    fn set_mode(&mut self, pin: u8, mode: GpioMode);

    /// Drive an output pin to `level`
    fn write(&mut self, pin: u8, level: Level);

    /// Read the current level of a pin
    ///
    /// For output pins this is the last level written.
    fn read(&self, pin: u8) -> Level;

    /// Drive an output pin high
    #[inline]
    fn set_high(&mut self, pin: u8) {
        self.write(pin, Level::High);
    }

    /// Drive an output pin low
    #[inline]
    fn set_low(&mut self, pin: u8) {
        self.write(pin, Level::Low);
    }
}

impl<G: GpioInterface + ?Sized> GpioInterface for &mut G {
    #[inline]
    fn set_mode(&mut self, pin: u8, mode: GpioMode) {
        (**self).set_mode(pin, mode);
    }

    #[inline]
    fn write(&mut self, pin: u8, level: Level) {
        (**self).write(pin, level);
    }

    #[inline]
    fn read(&self, pin: u8) -> Level {
        (**self).read(pin)
    }
}
