//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod gpio;
pub mod register;
pub mod timer;

// Re-export trait interfaces
pub use gpio::{GpioInterface, GpioMode, Level};
pub use register::{Mmio, MmioRegister, RegisterInterface, RegisterWidth};
pub use timer::{DriveMode, FrequencyCode, PwmSlot, TimerBackend};
