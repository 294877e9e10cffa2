//! Shield Configuration
//!
//! Static configuration for the motor shield: which board pins reach the
//! latch chip, how motor channels map onto a chassis, and per-channel drive
//! settings. Everything here is plain data with `Default` values matching the
//! stock shield, validated before any pin is touched.

pub mod motor;
pub mod pins;

pub use motor::ChannelConfig;
pub use pins::{DriveLayout, LatchPins, MAX_PIN};
