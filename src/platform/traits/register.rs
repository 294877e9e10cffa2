//! Hardware register access trait
//!
//! Timer backends program their peripherals through this interface instead of
//! touching memory directly. Each family defines its own register enum; the
//! register bank implementation decides whether a write lands in real
//! memory-mapped I/O ([`Mmio`]) or in a recording mock.

use core::marker::PhantomData;

/// Access width of a memory-mapped register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterWidth {
    /// 8-bit register (AVR timer control/compare)
    Bits8,
    /// 16-bit register accessed through the AVR TEMP latch (high byte first)
    Bits16,
    /// 32-bit special function register (PIC32)
    Bits32,
}

/// A register with a fixed memory-mapped address
pub trait MmioRegister: Copy {
    /// Data-space address of the register
    fn address(self) -> usize;

    /// Access width of the register
    fn width(self) -> RegisterWidth;
}

/// Register bank access
///
/// Values are carried as `u32`; narrower registers use the low bits.
pub trait RegisterInterface<R: Copy> {
    /// Read the current register value
    fn read(&self, reg: R) -> u32;

    /// Write a register value
    fn write(&mut self, reg: R, value: u32);

    /// Read-modify-write a register
    #[inline]
    fn modify<F: FnOnce(u32) -> u32>(&mut self, reg: R, f: F) {
        let value = self.read(reg);
        self.write(reg, f(value));
    }
}

/// Volatile memory-mapped register bank
#[derive(Debug)]
pub struct Mmio<R> {
    _registers: PhantomData<R>,
}

impl<R: MmioRegister> Mmio<R> {
    /// Take the register bank of the running microcontroller
    ///
    /// # Safety
    ///
    /// The caller must run on the family `R` describes and must be the only
    /// owner of the timers behind `R` for the lifetime of the returned bank.
    pub const unsafe fn steal() -> Self {
        Self {
            _registers: PhantomData,
        }
    }
}

impl<R: MmioRegister> RegisterInterface<R> for Mmio<R> {
    fn read(&self, reg: R) -> u32 {
        let addr = reg.address();
        // SAFETY: `steal` guarantees `addr` is a valid register of this chip.
        unsafe {
            match reg.width() {
                RegisterWidth::Bits8 => core::ptr::read_volatile(addr as *const u8) as u32,
                RegisterWidth::Bits16 => {
                    let low = core::ptr::read_volatile(addr as *const u8) as u32;
                    let high = core::ptr::read_volatile((addr + 1) as *const u8) as u32;
                    (high << 8) | low
                }
                RegisterWidth::Bits32 => core::ptr::read_volatile(addr as *const u32),
            }
        }
    }

    fn write(&mut self, reg: R, value: u32) {
        let addr = reg.address();
        // SAFETY: `steal` guarantees `addr` is a valid register of this chip.
        unsafe {
            match reg.width() {
                RegisterWidth::Bits8 => core::ptr::write_volatile(addr as *mut u8, value as u8),
                RegisterWidth::Bits16 => {
                    core::ptr::write_volatile((addr + 1) as *mut u8, (value >> 8) as u8);
                    core::ptr::write_volatile(addr as *mut u8, value as u8);
                }
                RegisterWidth::Bits32 => core::ptr::write_volatile(addr as *mut u32, value),
            }
        }
    }
}
