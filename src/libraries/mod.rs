//! Driver libraries
//!
//! ## Libraries
//!
//! - `motor_driver`: latch driver, motor channels and motor groups for the
//!   shield

pub mod motor_driver;

// Re-export commonly used types
pub use motor_driver::{
    Direction, LatchDriver, MotorChannel, MotorError, MotorGroup, MotorShield,
};
