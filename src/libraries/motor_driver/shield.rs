//! Motor shield owner
//!
//! Bundles the latch driver with the PWM timer backend of the target family.
//! Every motor command goes through `&mut MotorShield`, so there is exactly
//! one path to the latch byte and no transmission can interleave another.

use crate::parameters::LatchPins;
use crate::platform::traits::{GpioInterface, TimerBackend};

use super::{LatchDriver, Result};

/// Latch driver plus timer backend
#[derive(Debug)]
pub struct MotorShield<G, T> {
    latch: LatchDriver<G>,
    timer: T,
}

impl<G: GpioInterface, T: TimerBackend> MotorShield<G, T> {
    /// Shield on the default latch pins
    pub fn new(gpio: G, timer: T) -> Self {
        Self {
            latch: LatchDriver::new(gpio),
            timer,
        }
    }

    /// Shield with custom latch control pins
    ///
    /// # Errors
    ///
    /// Returns `MotorError::Platform` when the pins fail validation.
    pub fn with_pins(gpio: G, timer: T, pins: LatchPins) -> Result<Self> {
        Ok(Self {
            latch: LatchDriver::with_pins(gpio, pins)?,
            timer,
        })
    }

    /// Latch driver
    pub fn latch(&self) -> &LatchDriver<G> {
        &self.latch
    }

    /// Mutable latch driver
    pub fn latch_mut(&mut self) -> &mut LatchDriver<G> {
        &mut self.latch
    }

    /// Timer backend
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Mutable timer backend
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Latch driver and timer backend borrowed together
    pub fn parts_mut(&mut self) -> (&mut LatchDriver<G>, &mut T) {
        (&mut self.latch, &mut self.timer)
    }

    /// Take the shield apart
    pub fn into_parts(self) -> (LatchDriver<G>, T) {
        (self.latch, self.timer)
    }

    /// Current latch byte
    pub fn latch_state(&self) -> u8 {
        self.latch.state()
    }

    /// Overwrite and send the latch byte
    pub fn set_latch_state(&mut self, state: u8) {
        self.latch.set_state(state);
    }

    /// Defer latch transmissions
    pub fn hold_latch(&mut self) {
        self.latch.hold();
    }

    /// End a hold started by [`hold_latch`](Self::hold_latch)
    pub fn release_latch(&mut self) {
        self.latch.release();
    }

    /// Run `f` inside a latch hold
    ///
    /// All direction changes made by `f` reach the chip in one transmission
    /// when it returns.
    pub fn batch<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.hold_latch();
        let result = f(self);
        self.release_latch();
        result
    }
}
