//! Mock platform implementation for testing
//!
//! This module provides mock implementations of the platform traits that can
//! be used for unit testing without a shield attached.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```ignore
//! use motor_shield::parameters::LatchPins;
//! use motor_shield::platform::mock::MockGpio;
//! use motor_shield::platform::traits::GpioInterface;
//!
//! let pins = LatchPins::default();
//! let mut gpio = MockGpio::new();
//! gpio.set_high(pins.latch);
//! assert_eq!(gpio.rising_edges(pins.latch), 1);
//! ```

#![cfg(any(test, feature = "mock"))]

mod gpio;
mod registers;

pub use gpio::{MAX_PINS, MockGpio, PinEvent, TRACE_CAPACITY};
pub use registers::MockRegisters;
