//! 74HC595 latch driver
//!
//! The shield's direction lines hang off a single 74HC595 shift register. The
//! driver keeps a copy of the byte the chip is presenting and clocks it out
//! MSB first whenever it changes.
//!
//! ## Signal sequence
//!
//! ```text
//! latch  ‾‾\_____________________ ... ____________/‾‾
//! clock  ‾‾‾‾‾‾\__/‾‾\__/‾‾\__/‾‾ ... \__/‾‾‾‾‾‾‾‾‾‾‾
//! data   ____X b7 X b6 X b5 X     ...  X b0 X________
//! ```
//!
//! Data is set while the clock is low, so it is stable on every rising edge.
//! The latch rising edge copies the shifted byte to the outputs.

use crate::parameters::LatchPins;
use crate::platform::Result;
use crate::platform::traits::{GpioInterface, GpioMode, Level};

/// Owner of the latch byte and its four control lines
#[derive(Debug)]
pub struct LatchDriver<G> {
    gpio: G,
    pins: LatchPins,
    state: u8,
    hold_depth: u8,
    enabled: bool,
    transmissions: u32,
}

impl<G: GpioInterface> LatchDriver<G> {
    /// Create a driver on the default shield pins
    ///
    /// No pin is touched until [`enable`](Self::enable).
    pub fn new(gpio: G) -> Self {
        Self {
            gpio,
            pins: LatchPins::default(),
            state: 0,
            hold_depth: 0,
            enabled: false,
            transmissions: 0,
        }
    }

    /// Create a driver on custom control pins
    ///
    /// # Errors
    ///
    /// Returns the validation error of [`LatchPins::validate`].
    pub fn with_pins(gpio: G, pins: LatchPins) -> Result<Self> {
        pins.validate()?;
        let mut driver = Self::new(gpio);
        driver.pins = pins;
        Ok(driver)
    }

    /// Configure the control lines, clear the outputs and turn them on
    ///
    /// Only the first call has an effect.
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }

        for pin in self.pins.as_array() {
            self.gpio.set_mode(pin, GpioMode::Output);
        }
        self.state = 0;
        self.transmit();
        self.gpio.set_low(self.pins.enable);
        self.enabled = true;

        crate::log_info!(
            "Latch enabled (latch {}, clock {}, data {})",
            self.pins.latch,
            self.pins.clock,
            self.pins.data
        );
    }

    /// Whether [`enable`](Self::enable) has run
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Clear the bits selected by `mask`, then set the bits of `value`
    ///
    /// Nothing is sent.
    #[inline]
    pub fn update_bits(&mut self, mask: u8, value: u8) {
        self.state = (self.state & !mask) | value;
    }

    /// Shift the current byte into the chip and latch it
    ///
    /// Does nothing while held.
    pub fn transmit(&mut self) {
        if self.is_held() {
            crate::log_trace!("Latch held, state {} deferred", self.state);
            return;
        }

        let pins = self.pins;
        self.gpio.set_low(pins.latch);
        self.gpio.set_low(pins.data);
        for i in 0..8 {
            self.gpio.set_low(pins.clock);
            let bit = self.state & (1 << (7 - i)) != 0;
            self.gpio.write(pins.data, Level::from(bit));
            self.gpio.set_high(pins.clock);
        }
        self.gpio.set_high(pins.latch);

        self.transmissions = self.transmissions.wrapping_add(1);
    }

    /// Suppress transmissions until the matching [`release`](Self::release)
    ///
    /// Holds nest; only the outermost release sends.
    pub fn hold(&mut self) {
        self.hold_depth = self.hold_depth.saturating_add(1);
    }

    /// End one hold and send the byte if no hold remains
    ///
    /// A release without a hold still sends.
    pub fn release(&mut self) {
        self.hold_depth = self.hold_depth.saturating_sub(1);
        self.transmit();
    }

    /// Whether transmissions are currently suppressed
    #[inline]
    pub fn is_held(&self) -> bool {
        self.hold_depth > 0
    }

    /// Byte the chip presents (or will present after release)
    #[inline]
    pub fn state(&self) -> u8 {
        self.state
    }

    /// Overwrite the whole byte and send it
    pub fn set_state(&mut self, state: u8) {
        self.state = state;
        self.transmit();
    }

    /// Number of completed transmissions
    pub fn transmissions(&self) -> u32 {
        self.transmissions
    }

    /// Control line assignment
    pub fn pins(&self) -> &LatchPins {
        &self.pins
    }

    /// Pin bank
    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    /// Mutable pin bank, shared with motor speed pins
    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    /// Give the pin bank back
    pub fn into_inner(self) -> G {
        self.gpio
    }
}
