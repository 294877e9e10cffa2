//! ATmega328P family timer backend
//!
//! Covers the ATmega8/48/88/168/328P (Arduino Uno class boards).
//!
//! | Motor | Timer / compare | Pin |
//! |-------|-----------------|-----|
//! | M1    | Timer2 OC2A     | 11  |
//! | M2    | Timer2 OC2B     | 3   |
//! | M3    | Timer0 OC0A     | 6   |
//! | M4    | Timer0 OC0B     | 5   |
//!
//! Timer0 also drives the system tick (`millis()` on Arduino), so its
//! prescaler is never reprogrammed; motors 3 and 4 run at whatever rate the
//! runtime configured (about 1 kHz) and their frequency code is ignored.

use bitflags::bitflags;

use crate::platform::timebase::SharedTimebase;
use crate::platform::traits::{
    DriveMode, FrequencyCode, GpioInterface, GpioMode, MmioRegister, PwmSlot, RegisterInterface,
    RegisterWidth, TimerBackend,
};

/// Timer2 without prescaler (about 64 kHz)
pub const MOTOR12_64KHZ: FrequencyCode = FrequencyCode::new(1);
/// Timer2 prescaler 8 (about 8 kHz)
pub const MOTOR12_8KHZ: FrequencyCode = FrequencyCode::new(2);
/// Timer2 prescaler 32 (about 2 kHz)
pub const MOTOR12_2KHZ: FrequencyCode = FrequencyCode::new(3);
/// Timer2 prescaler 64 (about 1 kHz)
pub const MOTOR12_1KHZ: FrequencyCode = FrequencyCode::new(4);

/// Timer0 without prescaler (about 64 kHz)
pub const MOTOR34_64KHZ: FrequencyCode = FrequencyCode::new(1);
/// Timer0 prescaler 8 (about 8 kHz)
pub const MOTOR34_8KHZ: FrequencyCode = FrequencyCode::new(2);
/// Timer0 prescaler 64 (about 1 kHz)
pub const MOTOR34_1KHZ: FrequencyCode = FrequencyCode::new(3);

/// Timer registers used by the shield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Tccr0a,
    Ocr0a,
    Ocr0b,
    Tccr2a,
    Tccr2b,
    Ocr2a,
    Ocr2b,
}

impl MmioRegister for Register {
    fn address(self) -> usize {
        match self {
            Register::Tccr0a => 0x44,
            Register::Ocr0a => 0x47,
            Register::Ocr0b => 0x48,
            Register::Tccr2a => 0xB0,
            Register::Tccr2b => 0xB1,
            Register::Ocr2a => 0xB3,
            Register::Ocr2b => 0xB4,
        }
    }

    fn width(self) -> RegisterWidth {
        RegisterWidth::Bits8
    }
}

bitflags! {
    /// TCCR0A / TCCR2A (same layout on both 8-bit timers)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Tccra: u8 {
        const WGM0 = 1 << 0;
        const WGM1 = 1 << 1;
        /// Clear OCnB on compare match (non-inverting)
        const COMB1 = 1 << 5;
        /// Clear OCnA on compare match (non-inverting)
        const COMA1 = 1 << 7;
    }
}

/// Fast PWM, TOP = 0xFF
const FAST_PWM: Tccra = Tccra::WGM0.union(Tccra::WGM1);

/// ATmega328P PWM backend
#[derive(Debug)]
pub struct Atmega328p<R> {
    regs: R,
    timer2: SharedTimebase,
}

impl<R: RegisterInterface<Register>> Atmega328p<R> {
    /// Create a backend over a register bank
    pub fn new(regs: R) -> Self {
        Self {
            regs,
            timer2: SharedTimebase::new(),
        }
    }

    /// Underlying register bank
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Timer2 initialization state (shared by M1 and M2)
    pub fn timer2(&self) -> &SharedTimebase {
        &self.timer2
    }

    fn compare_register(slot: PwmSlot) -> Register {
        match slot {
            PwmSlot::M1 => Register::Ocr2a,
            PwmSlot::M2 => Register::Ocr2b,
            PwmSlot::M3 => Register::Ocr0a,
            PwmSlot::M4 => Register::Ocr0b,
        }
    }

    fn enable_output(&mut self, control: Register, output: Tccra) {
        let bits = (output | FAST_PWM).bits() as u32;
        self.regs.modify(control, |value| value | bits);
    }

    fn init_timer2(&mut self, frequency: FrequencyCode) {
        let regs = &mut self.regs;
        self.timer2.init_once("Timer2", frequency, |f| {
            regs.write(Register::Tccr2b, f.bits() as u32);
        });
    }
}

impl<R: RegisterInterface<Register>> TimerBackend for Atmega328p<R> {
    const NAME: &'static str = "ATmega328P";
    const DEFAULT_FREQUENCY: FrequencyCode = MOTOR34_8KHZ;

    fn output_pin(&self, slot: PwmSlot) -> u8 {
        match slot {
            PwmSlot::M1 => 11,
            PwmSlot::M2 => 3,
            PwmSlot::M3 => 6,
            PwmSlot::M4 => 5,
        }
    }

    fn configure<G: GpioInterface>(
        &mut self,
        gpio: &mut G,
        slot: PwmSlot,
        frequency: FrequencyCode,
    ) -> DriveMode {
        match slot {
            PwmSlot::M1 => {
                self.enable_output(Register::Tccr2a, Tccra::COMA1);
                self.init_timer2(frequency);
            }
            PwmSlot::M2 => {
                self.enable_output(Register::Tccr2a, Tccra::COMB1);
                self.init_timer2(frequency);
            }
            PwmSlot::M3 => self.enable_output(Register::Tccr0a, Tccra::COMA1),
            PwmSlot::M4 => self.enable_output(Register::Tccr0a, Tccra::COMB1),
        }
        self.regs.write(Self::compare_register(slot), 0);
        gpio.set_mode(self.output_pin(slot), GpioMode::Output);
        DriveMode::Timer
    }

    fn set_duty(&mut self, slot: PwmSlot, duty: u8) {
        self.regs.write(Self::compare_register(slot), duty as u32);
    }

    fn duty(&self, slot: PwmSlot) -> u8 {
        self.regs.read(Self::compare_register(slot)) as u8
    }
}
