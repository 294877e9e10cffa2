//! AVR timer backends
//!
//! Both AVR families program their timers into fast PWM with an 8-bit TOP,
//! so a duty value written to the compare register maps linearly onto
//! 0-100%. Registers live in the data address space and are reached through
//! [`Mmio`](crate::platform::traits::Mmio) on target.

pub mod atmega2560;
pub mod atmega328p;

pub use atmega2560::Atmega2560;
pub use atmega328p::Atmega328p;
