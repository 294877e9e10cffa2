//! ATmega1280/2560 timer backend (Arduino Mega)
//!
//! On the Mega the shield's PWM pins land on the 16-bit timers:
//!
//! | Motor | Timer / compare | Pin |
//! |-------|-----------------|-----|
//! | M1    | Timer1 OC1A     | 11  |
//! | M2    | Timer3 OC3C     | 3   |
//! | M3    | Timer4 OC4A     | 6   |
//! | M4    | Timer3 OC3A     | 5   |
//!
//! All three timers run 8-bit fast PWM (WGM = 0b0101) so duty stays 0-255.
//! Timer3 is shared by motors 2 and 4.

use bitflags::bitflags;

use crate::platform::timebase::SharedTimebase;
use crate::platform::traits::{
    DriveMode, FrequencyCode, GpioInterface, GpioMode, MmioRegister, PwmSlot, RegisterInterface,
    RegisterWidth, TimerBackend,
};

/// No prescaler (about 64 kHz)
pub const MOTOR12_64KHZ: FrequencyCode = FrequencyCode::new(1);
/// Prescaler 8 (about 8 kHz)
pub const MOTOR12_8KHZ: FrequencyCode = FrequencyCode::new(2);
/// Prescaler 64 (about 1 kHz)
pub const MOTOR12_1KHZ: FrequencyCode = FrequencyCode::new(3);

/// No prescaler (about 64 kHz)
pub const MOTOR34_64KHZ: FrequencyCode = FrequencyCode::new(1);
/// Prescaler 8 (about 8 kHz)
pub const MOTOR34_8KHZ: FrequencyCode = FrequencyCode::new(2);
/// Prescaler 64 (about 1 kHz)
pub const MOTOR34_1KHZ: FrequencyCode = FrequencyCode::new(3);

/// Timer registers used by the shield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Tccr1a,
    Tccr1b,
    Ocr1a,
    Tccr3a,
    Tccr3b,
    Ocr3a,
    Ocr3c,
    Tccr4a,
    Tccr4b,
    Ocr4a,
}

impl MmioRegister for Register {
    fn address(self) -> usize {
        match self {
            Register::Tccr1a => 0x80,
            Register::Tccr1b => 0x81,
            Register::Ocr1a => 0x88,
            Register::Tccr3a => 0x90,
            Register::Tccr3b => 0x91,
            Register::Ocr3a => 0x98,
            Register::Ocr3c => 0x9C,
            Register::Tccr4a => 0xA0,
            Register::Tccr4b => 0xA1,
            Register::Ocr4a => 0xA8,
        }
    }

    fn width(self) -> RegisterWidth {
        match self {
            Register::Ocr1a | Register::Ocr3a | Register::Ocr3c | Register::Ocr4a => {
                RegisterWidth::Bits16
            }
            _ => RegisterWidth::Bits8,
        }
    }
}

bitflags! {
    /// TCCRnA of the 16-bit timers
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Tccra: u8 {
        const WGM0 = 1 << 0;
        const COMC1 = 1 << 3;
        const COMB1 = 1 << 5;
        const COMA1 = 1 << 7;
    }
}

bitflags! {
    /// TCCRnB of the 16-bit timers (prescaler bits CS0-CS2 are the low three)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Tccrb: u8 {
        const WGM2 = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    T1,
    T3,
    T4,
}

impl Timer {
    fn name(self) -> &'static str {
        match self {
            Timer::T1 => "Timer1",
            Timer::T3 => "Timer3",
            Timer::T4 => "Timer4",
        }
    }
}

/// Timer, control registers and compare output behind one motor slot
struct Route {
    timer: Timer,
    control_a: Register,
    control_b: Register,
    compare: Register,
    output: Tccra,
}

const fn route(slot: PwmSlot) -> Route {
    match slot {
        PwmSlot::M1 => Route {
            timer: Timer::T1,
            control_a: Register::Tccr1a,
            control_b: Register::Tccr1b,
            compare: Register::Ocr1a,
            output: Tccra::COMA1,
        },
        PwmSlot::M2 => Route {
            timer: Timer::T3,
            control_a: Register::Tccr3a,
            control_b: Register::Tccr3b,
            compare: Register::Ocr3c,
            output: Tccra::COMC1,
        },
        PwmSlot::M3 => Route {
            timer: Timer::T4,
            control_a: Register::Tccr4a,
            control_b: Register::Tccr4b,
            compare: Register::Ocr4a,
            output: Tccra::COMA1,
        },
        PwmSlot::M4 => Route {
            timer: Timer::T3,
            control_a: Register::Tccr3a,
            control_b: Register::Tccr3b,
            compare: Register::Ocr3a,
            output: Tccra::COMA1,
        },
    }
}

/// ATmega2560 PWM backend
#[derive(Debug)]
pub struct Atmega2560<R> {
    regs: R,
    timebases: [SharedTimebase; 3],
}

impl<R: RegisterInterface<Register>> Atmega2560<R> {
    /// Create a backend over a register bank
    pub fn new(regs: R) -> Self {
        Self {
            regs,
            timebases: [SharedTimebase::new(); 3],
        }
    }

    /// Underlying register bank
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Timebase state of the timer driving `slot`
    pub fn timebase(&self, slot: PwmSlot) -> &SharedTimebase {
        &self.timebases[route(slot).timer as usize]
    }
}

impl<R: RegisterInterface<Register>> TimerBackend for Atmega2560<R> {
    const NAME: &'static str = "ATmega2560";
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
        let route = route(slot);

        let output = (route.output | Tccra::WGM0).bits() as u32;
        self.regs.modify(route.control_a, |value| value | output);

        let regs = &mut self.regs;
        self.timebases[route.timer as usize].init_once(route.timer.name(), frequency, |f| {
            regs.write(route.control_b, (f.bits() | Tccrb::WGM2.bits()) as u32);
        });

        self.regs.write(route.compare, 0);
        gpio.set_mode(self.output_pin(slot), GpioMode::Output);
        DriveMode::Timer
    }

    fn set_duty(&mut self, slot: PwmSlot, duty: u8) {
        self.regs.write(route(slot).compare, duty as u32);
    }

    fn duty(&self, slot: PwmSlot) -> u8 {
        self.regs.read(route(slot).compare) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockGpio, MockRegisters};

    fn backend() -> Atmega2560<MockRegisters<Register>> {
        Atmega2560::new(MockRegisters::new())
    }

    #[test]
    fn test_m1_uses_timer1() {
        let mut timer = backend();
        let mut gpio = MockGpio::new();

        timer.configure(&mut gpio, PwmSlot::M1, MOTOR12_64KHZ);

        let regs = timer.registers();
        assert_eq!(regs.value(Register::Tccr1a), 0x81);
        assert_eq!(regs.value(Register::Tccr1b), 0x09);
        assert_eq!(regs.value(Register::Ocr1a), 0);
        assert_eq!(gpio.mode(11), Some(GpioMode::Output));
    }

    #[test]
    fn test_timer3_shared_by_m2_and_m4() {
        let mut timer = backend();
        let mut gpio = MockGpio::new();

        timer.configure(&mut gpio, PwmSlot::M2, MOTOR34_8KHZ);
        timer.configure(&mut gpio, PwmSlot::M4, MOTOR34_1KHZ);

        let regs = timer.registers();
        assert_eq!(regs.write_count(Register::Tccr3b), 1);
        assert_eq!(regs.value(Register::Tccr3b), 0x0A);
        // COM3C1 | COM3A1 | WGM30
        assert_eq!(regs.value(Register::Tccr3a), 0x89);
        assert_eq!(timer.timebase(PwmSlot::M4).frequency(), Some(MOTOR34_8KHZ));
    }

    #[test]
    fn test_m3_independent_timer4() {
        let mut timer = backend();
        let mut gpio = MockGpio::new();

        timer.configure(&mut gpio, PwmSlot::M2, MOTOR12_64KHZ);
        timer.configure(&mut gpio, PwmSlot::M3, MOTOR12_1KHZ);

        assert_eq!(timer.registers().value(Register::Tccr4b), 0x0B);
        assert!(!timer.timebase(PwmSlot::M1).is_initialized());
    }

    #[test]
    fn test_duty_writes_compare_register() {
        let mut timer = backend();
        let mut gpio = MockGpio::new();
        timer.configure(&mut gpio, PwmSlot::M4, MOTOR34_64KHZ);

        timer.set_duty(PwmSlot::M4, 200);
        assert_eq!(timer.registers().value(Register::Ocr3a), 200);
        assert_eq!(timer.duty(PwmSlot::M4), 200);
    }

    #[test]
    fn test_compare_registers_are_16_bit() {
        assert_eq!(Register::Ocr3c.width(), RegisterWidth::Bits16);
        assert_eq!(Register::Tccr3a.width(), RegisterWidth::Bits8);
    }
}
