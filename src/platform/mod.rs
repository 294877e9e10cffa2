//! Platform abstraction layer
//!
//! Pin access, register access and the per-family PWM timer backends. All
//! family-specific register knowledge is isolated to this module.
//!
//! # Target selection
//!
//! The `atmega328p` (default), `atmega2560` and `pic32mx` features pick the
//! backend behind [`TargetTimer`]. Building without any of them is an error.
//! When several are enabled the most capable one wins: PIC32MX, then
//! ATmega2560, then ATmega328P.

pub mod avr;
pub mod error;
pub mod hal;
pub mod pic32mx;
pub mod timebase;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use hal::HalGpio;
pub use timebase::SharedTimebase;
pub use traits::{GpioInterface, RegisterInterface, TimerBackend};

#[cfg(not(any(feature = "atmega328p", feature = "atmega2560", feature = "pic32mx")))]
compile_error!(
    "no microcontroller family selected: enable one of the `atmega328p`, `atmega2560` or `pic32mx` features"
);

/// Timer backend of the selected family on real hardware
#[cfg(feature = "pic32mx")]
pub type TargetTimer = pic32mx::Pic32mx<traits::Mmio<pic32mx::Register>>;

/// Timer backend of the selected family on real hardware
#[cfg(all(feature = "atmega2560", not(feature = "pic32mx")))]
pub type TargetTimer = avr::Atmega2560<traits::Mmio<avr::atmega2560::Register>>;

/// Timer backend of the selected family on real hardware
#[cfg(all(
    feature = "atmega328p",
    not(any(feature = "atmega2560", feature = "pic32mx"))
))]
pub type TargetTimer = avr::Atmega328p<traits::Mmio<avr::atmega328p::Register>>;

/// Take the PWM timers of the running microcontroller
///
/// No register is touched until a channel is attached.
///
/// # Safety
///
/// Must run on the family selected at build time, at most once, and nothing
/// else may reprogram the timers the shield uses.
#[cfg(any(feature = "atmega328p", feature = "atmega2560", feature = "pic32mx"))]
pub unsafe fn take_timer() -> TargetTimer {
    // SAFETY: forwarded to the caller
    TargetTimer::new(unsafe { traits::Mmio::steal() })
}
