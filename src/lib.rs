#![cfg_attr(not(test), no_std)]

//! motor_shield - Driver for Adafruit-style L293D motor shields
//!
//! Drives up to four DC motors through the shield's 74HC595 latch and the
//! PWM timers of ATmega328P, ATmega1280/2560 and PIC32MX microcontrollers.

// Logging macros
pub mod core;

// Pin assignments and channel settings
pub mod parameters;

// Platform abstraction layer (pins, registers, timer backends)
pub mod platform;

// Latch driver, motor channels and groups
pub mod libraries;

pub use libraries::motor_driver::{
    ChannelId, Direction, LatchDriver, MotorChannel, MotorError, MotorGroup, MotorShield,
};
pub use parameters::{ChannelConfig, DriveLayout, LatchPins};
