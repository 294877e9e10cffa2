//! PIC32MX timer backend (chipKIT boards)
//!
//! Every PWM output uses an output-compare module with Timer2 as its
//! timebase, so Timer2 is shared by all four motors and configured by
//! whichever channel is attached first.
//!
//! | Motor | Output compare | Pin |
//! |-------|----------------|-----|
//! | M1    | see [`M1Route`] | 11 (9 or 10 when bridged) |
//! | M2    | OC1            | 3   |
//! | M3    | OC3            | 6   |
//! | M4    | OC2            | 5   |
//!
//! Pin 11 has no output-compare function on chipKIT boards. Motor 1 either
//! runs on/off from pin 11, or pin 9 / pin 10 is wired to pin 11 on the shield
//! and drives it through OC4 / OC5 while pin 11 floats as an input.

use bitflags::bitflags;

use crate::platform::timebase::SharedTimebase;
use crate::platform::traits::{
    DriveMode, FrequencyCode, GpioInterface, GpioMode, Level, MmioRegister, PwmSlot,
    RegisterInterface, RegisterWidth, TimerBackend,
};

/// Timer2 prescaler 1 (about 312 kHz at 80 MHz PBCLK)
pub const MOTOR_312KHZ: FrequencyCode = FrequencyCode::new(0);
/// Prescaler 2 (about 156 kHz)
pub const MOTOR_156KHZ: FrequencyCode = FrequencyCode::new(1);
/// Prescaler 4 (about 78 kHz)
pub const MOTOR_78KHZ: FrequencyCode = FrequencyCode::new(2);
/// Prescaler 8 (about 39 kHz)
pub const MOTOR_39KHZ: FrequencyCode = FrequencyCode::new(3);
/// Prescaler 16 (about 19.5 kHz)
pub const MOTOR_19KHZ: FrequencyCode = FrequencyCode::new(4);
/// Prescaler 32 (about 9.8 kHz)
pub const MOTOR_9_8KHZ: FrequencyCode = FrequencyCode::new(5);
/// Prescaler 64 (about 4.9 kHz)
pub const MOTOR_4_9KHZ: FrequencyCode = FrequencyCode::new(6);
/// Prescaler 256 (about 1.2 kHz)
pub const MOTOR_1_2KHZ: FrequencyCode = FrequencyCode::new(7);

/// Timer2 period: 256 counts, so duty 0-255 spans 0-100%
const TIMER2_PERIOD: u32 = 0x0100;

/// Special function registers used by the shield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    T2con,
    Tmr2,
    Pr2,
    /// OCxCON of output-compare module `x` (1-5)
    OcCon(u8),
    /// OCxR primary compare register
    OcR(u8),
    /// OCxRS secondary compare register (PWM duty)
    OcRs(u8),
}

impl MmioRegister for Register {
    fn address(self) -> usize {
        const OC_BASE: usize = 0xBF80_3000;
        const OC_STRIDE: usize = 0x200;
        let oc = |module: u8, offset: usize| {
            OC_BASE + (module.saturating_sub(1) as usize) * OC_STRIDE + offset
        };
        match self {
            Register::T2con => 0xBF80_0800,
            Register::Tmr2 => 0xBF80_0810,
            Register::Pr2 => 0xBF80_0820,
            Register::OcCon(module) => oc(module, 0x00),
            Register::OcR(module) => oc(module, 0x10),
            Register::OcRs(module) => oc(module, 0x20),
        }
    }

    fn width(self) -> RegisterWidth {
        RegisterWidth::Bits32
    }
}

bitflags! {
    /// TxCON
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TxCon: u32 {
        const ON = 1 << 15;
    }
}

bitflags! {
    /// OCxCON
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OcxCon: u32 {
        const ON = 1 << 15;
        /// OCM = 0b110: PWM mode, fault pin disabled
        const OCM_PWM = 0b110;
    }
}

/// TCKPS field position in T2CON
const TCKPS_SHIFT: u32 = 4;

/// Where motor 1's speed signal comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum M1Route {
    /// OC4 on pin 9, bridged to pin 11
    Pin9,
    /// OC5 on pin 10, bridged to pin 11
    Pin10,
    /// On/off output on pin 11
    Digital,
}

impl M1Route {
    /// Route selected by the `pic32-m1-pin9` / `pic32-m1-pin10` features
    pub const fn from_features() -> Self {
        if cfg!(feature = "pic32-m1-pin9") {
            M1Route::Pin9
        } else if cfg!(feature = "pic32-m1-pin10") {
            M1Route::Pin10
        } else {
            M1Route::Digital
        }
    }
}

/// PIC32MX PWM backend
#[derive(Debug)]
pub struct Pic32mx<R> {
    regs: R,
    m1_route: M1Route,
    timer2: SharedTimebase,
}

impl<R: RegisterInterface<Register>> Pic32mx<R> {
    /// Create a backend with the motor 1 route chosen at build time
    pub fn new(regs: R) -> Self {
        Self::with_m1_route(regs, M1Route::from_features())
    }

    /// Create a backend with an explicit motor 1 route
    pub fn with_m1_route(regs: R, m1_route: M1Route) -> Self {
        Self {
            regs,
            m1_route,
            timer2: SharedTimebase::new(),
        }
    }

    /// Underlying register bank
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Timer2 initialization state
    pub fn timer2(&self) -> &SharedTimebase {
        &self.timer2
    }

    /// Motor 1 route
    pub fn m1_route(&self) -> M1Route {
        self.m1_route
    }

    /// Output-compare module driving `slot`, `None` for digital motor 1
    fn module(&self, slot: PwmSlot) -> Option<u8> {
        match slot {
            PwmSlot::M1 => match self.m1_route {
                M1Route::Pin9 => Some(4),
                M1Route::Pin10 => Some(5),
                M1Route::Digital => None,
            },
            PwmSlot::M2 => Some(1),
            PwmSlot::M3 => Some(3),
            PwmSlot::M4 => Some(2),
        }
    }

    fn init_timer2(&mut self, frequency: FrequencyCode) {
        let regs = &mut self.regs;
        self.timer2.init_once("Timer2", frequency, |f| {
            regs.write(
                Register::T2con,
                TxCon::ON.bits() | ((f.bits() as u32) << TCKPS_SHIFT),
            );
            regs.write(Register::Tmr2, 0);
            regs.write(Register::Pr2, TIMER2_PERIOD);
        });
    }

    fn start_output_compare(&mut self, module: u8) {
        self.regs
            .write(Register::OcCon(module), (OcxCon::ON | OcxCon::OCM_PWM).bits());
        self.regs.write(Register::OcRs(module), 0);
        self.regs.write(Register::OcR(module), 0);
    }
}

impl<R: RegisterInterface<Register>> TimerBackend for Pic32mx<R> {
    const NAME: &'static str = "PIC32MX";
    const DEFAULT_FREQUENCY: FrequencyCode = MOTOR_39KHZ;

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
        let pin = self.output_pin(slot);
        let Some(module) = self.module(slot) else {
            gpio.write(pin, Level::Low);
            gpio.set_mode(pin, GpioMode::Output);
            return DriveMode::Digital;
        };

        if slot == PwmSlot::M1 {
            let bridge = if module == 4 { 9 } else { 10 };
            gpio.set_mode(bridge, GpioMode::Output);
            gpio.set_mode(pin, GpioMode::Input);
        }

        self.init_timer2(frequency);
        self.start_output_compare(module);

        if slot != PwmSlot::M1 {
            gpio.set_mode(pin, GpioMode::Output);
        }
        DriveMode::Timer
    }

    fn set_duty(&mut self, slot: PwmSlot, duty: u8) {
        match self.module(slot) {
            Some(module) => self.regs.write(Register::OcRs(module), duty as u32),
            None => crate::log_trace!("PIC32MX M1 has no compare output, duty {} ignored", duty),
        }
    }

    fn duty(&self, slot: PwmSlot) -> u8 {
        self.module(slot)
            .map(|module| self.regs.read(Register::OcRs(module)) as u8)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockGpio, MockRegisters};

    fn backend(route: M1Route) -> Pic32mx<MockRegisters<Register>> {
        Pic32mx::with_m1_route(MockRegisters::new(), route)
    }

    #[test]
    fn test_timer2_programmed_once_for_all_motors() {
        let mut timer = backend(M1Route::Pin9);
        let mut gpio = MockGpio::new();

        timer.configure(&mut gpio, PwmSlot::M1, MOTOR_39KHZ);
        timer.configure(&mut gpio, PwmSlot::M2, MOTOR_1_2KHZ);
        timer.configure(&mut gpio, PwmSlot::M3, MOTOR_39KHZ);
        timer.configure(&mut gpio, PwmSlot::M4, MOTOR_39KHZ);

        let regs = timer.registers();
        assert_eq!(regs.write_count(Register::T2con), 1);
        assert_eq!(regs.write_count(Register::Pr2), 1);
        assert_eq!(regs.value(Register::T2con), 0x8000 | (3 << 4));
        assert_eq!(regs.value(Register::Pr2), 0x100);
    }

    #[test]
    fn test_output_compare_modules() {
        let mut timer = backend(M1Route::Digital);
        let mut gpio = MockGpio::new();

        timer.configure(&mut gpio, PwmSlot::M2, MOTOR_39KHZ);
        timer.configure(&mut gpio, PwmSlot::M3, MOTOR_39KHZ);
        timer.configure(&mut gpio, PwmSlot::M4, MOTOR_39KHZ);

        let regs = timer.registers();
        for module in [1, 2, 3] {
            assert_eq!(regs.value(Register::OcCon(module)), 0x8006);
        }
        assert_eq!(gpio.mode(3), Some(GpioMode::Output));
        assert_eq!(gpio.mode(6), Some(GpioMode::Output));
        assert_eq!(gpio.mode(5), Some(GpioMode::Output));

        timer.set_duty(PwmSlot::M3, 128);
        assert_eq!(timer.registers().value(Register::OcRs(3)), 128);
    }

    #[test]
    fn test_m1_bridged_to_pin10() {
        let mut timer = backend(M1Route::Pin10);
        let mut gpio = MockGpio::new();

        let mode = timer.configure(&mut gpio, PwmSlot::M1, MOTOR_19KHZ);

        assert_eq!(mode, DriveMode::Timer);
        assert_eq!(gpio.mode(10), Some(GpioMode::Output));
        assert_eq!(gpio.mode(11), Some(GpioMode::Input));
        assert_eq!(timer.registers().value(Register::OcCon(5)), 0x8006);

        timer.set_duty(PwmSlot::M1, 77);
        assert_eq!(timer.duty(PwmSlot::M1), 77);
    }

    #[test]
    fn test_m1_digital_route() {
        let mut timer = backend(M1Route::Digital);
        let mut gpio = MockGpio::new();

        let mode = timer.configure(&mut gpio, PwmSlot::M1, MOTOR_39KHZ);

        assert_eq!(mode, DriveMode::Digital);
        assert_eq!(gpio.mode(11), Some(GpioMode::Output));
        assert_eq!(gpio.read(11), Level::Low);
        assert!(!timer.timer2().is_initialized());
        assert!(timer.registers().writes().is_empty());
    }

    #[test]
    fn test_register_addresses() {
        assert_eq!(Register::OcCon(1).address(), 0xBF80_3000);
        assert_eq!(Register::OcRs(4).address(), 0xBF80_3620);
        assert_eq!(Register::Pr2.address(), 0xBF80_0820);
    }
}
