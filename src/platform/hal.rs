//! embedded-hal pin bank
//!
//! Adapts a fixed set of `embedded_hal::digital::OutputPin`s to the
//! pin-number addressed [`GpioInterface`] used by the shield. Any HAL whose
//! output pins can be erased to a single type (`AnyPin`, `Output<'_>`,
//! `ErasedPin`, ...) can drive the shield this way.

use embedded_hal::digital::{OutputPin, PinState};

use crate::parameters::MAX_PIN;
use crate::platform::traits::{GpioInterface, GpioMode, Level};
use crate::platform::{PlatformError, Result};

impl From<Level> for PinState {
    #[inline]
    fn from(level: Level) -> Self {
        match level {
            Level::Low => PinState::Low,
            Level::High => PinState::High,
        }
    }
}

/// Bank of HAL output pins addressed by board pin number
pub struct HalGpio<P, const N: usize> {
    pins: [(u8, P); N],
    levels: [Level; N],
}

impl<P: OutputPin, const N: usize> HalGpio<P, N> {
    /// Wrap `(board pin number, HAL pin)` pairs
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidPin` for a number at or above
    /// [`MAX_PIN`], `PlatformError::PinConflict` for a number used twice.
    pub fn new(pins: [(u8, P); N]) -> Result<Self> {
        for (i, (number, _)) in pins.iter().enumerate() {
            if *number >= MAX_PIN {
                return Err(PlatformError::InvalidPin(*number));
            }
            if pins[i + 1..].iter().any(|(other, _)| other == number) {
                return Err(PlatformError::PinConflict(*number));
            }
        }
        Ok(Self {
            pins,
            levels: [Level::Low; N],
        })
    }

    /// Give the HAL pins back
    pub fn release(self) -> [(u8, P); N] {
        self.pins
    }

    fn index(&self, pin: u8) -> Option<usize> {
        self.pins.iter().position(|(number, _)| *number == pin)
    }
}

impl<P: OutputPin, const N: usize> GpioInterface for HalGpio<P, N> {
    fn set_mode(&mut self, pin: u8, mode: GpioMode) {
        // HAL output pins are outputs by type; they cannot be turned around here
        if mode == GpioMode::Input {
            crate::log_warn!("pin {} stays an output", pin);
        }
    }

    fn write(&mut self, pin: u8, level: Level) {
        let Some(i) = self.index(pin) else {
            crate::log_warn!("pin {} is not in the bank", pin);
            return;
        };
        if self.pins[i].1.set_state(level.into()).is_err() {
            crate::log_error!("pin {} write failed", pin);
        }
        self.levels[i] = level;
    }

    fn read(&self, pin: u8) -> Level {
        self.index(pin)
            .map(|i| self.levels[i])
            .unwrap_or_default()
    }
}
