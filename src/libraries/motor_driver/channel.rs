//! Motor channels
//!
//! A channel owns no hardware; it remembers which latch bits and PWM slot
//! belong to its motor and issues commands through the shield passed to each
//! call. That keeps all four channels usable at once without shared mutable
//! state.
//!
//! ## Latch bits
//!
//! | Motor | A (forward) | B (backward) | PWM slot |
//! |-------|-------------|--------------|----------|
//! | M1    | 2           | 3            | M1       |
//! | M2    | 1           | 4            | M2       |
//! | M3    | 5           | 7            | M3       |
//! | M4    | 0           | 6            | M4       |

use crate::parameters::ChannelConfig;
use crate::platform::traits::{DriveMode, GpioInterface, GpioMode, Level, PwmSlot, TimerBackend};

use super::{MotorError, MotorShield, Result};

/// Duty above which a digital speed pin is driven high
const DIGITAL_THRESHOLD: u8 = 127;

/// Validated motor channel number (1-4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelId(u8);

impl ChannelId {
    /// Channel `number`, `None` outside 1-4
    pub const fn new(number: u8) -> Option<Self> {
        match number {
            1..=4 => Some(Self(number)),
            _ => None,
        }
    }

    /// Channel number as printed on the shield
    #[inline]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Latch bit positions (A, B)
    pub const fn bits(self) -> (u8, u8) {
        match self.0 {
            1 => (2, 3),
            2 => (1, 4),
            3 => (5, 7),
            _ => (0, 6),
        }
    }

    /// Latch mask covering both bits
    #[inline]
    pub const fn mask(self) -> u8 {
        let (a, b) = self.bits();
        (1 << a) | (1 << b)
    }

    /// PWM slot driving the channel's speed pin
    pub const fn slot(self) -> PwmSlot {
        match self.0 {
            1 => PwmSlot::M1,
            2 => PwmSlot::M2,
            3 => PwmSlot::M3,
            _ => PwmSlot::M4,
        }
    }
}

/// Motor direction command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// A high, B low
    Forward,
    /// A low, B high
    Backward,
    /// Both low, motor coasts
    #[default]
    Release,
}

impl Direction {
    /// Direction for a signed speed: positive forward, negative backward
    pub fn from_signed(speed: i16) -> Self {
        match speed {
            0 => Direction::Release,
            s if s > 0 => Direction::Forward,
            _ => Direction::Backward,
        }
    }

    /// Forward and backward swapped
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
            Direction::Release => Direction::Release,
        }
    }
}

/// One motor on the shield
///
/// Built with [`MotorChannel::new`], which never fails: an invalid channel
/// number yields a detached channel whose commands are ignored. Use
/// [`MotorChannel::try_new`] to get the error instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorChannel {
    binding: Option<(ChannelId, DriveMode)>,
    config: ChannelConfig,
    direction: Direction,
    speed: u8,
}

impl MotorChannel {
    /// Attach channel `number` (1-4) of `shield`
    ///
    /// Enables the latch on first use, releases the motor and puts its speed
    /// pin in PWM (or digital) mode at zero.
    pub fn new<G, T>(shield: &mut MotorShield<G, T>, number: u8, config: ChannelConfig) -> Self
    where
        G: GpioInterface,
        T: TimerBackend,
    {
        match ChannelId::new(number) {
            Some(id) => Self::attach(shield, id, config),
            None => {
                crate::log_warn!("Motor channel {} does not exist, commands ignored", number);
                Self {
                    binding: None,
                    config,
                    direction: Direction::Release,
                    speed: 0,
                }
            }
        }
    }

    /// Attach channel `number`, rejecting numbers outside 1-4
    ///
    /// # Errors
    ///
    /// Returns `MotorError::InvalidChannel` without touching the shield.
    pub fn try_new<G, T>(
        shield: &mut MotorShield<G, T>,
        number: u8,
        config: ChannelConfig,
    ) -> Result<Self>
    where
        G: GpioInterface,
        T: TimerBackend,
    {
        let id = ChannelId::new(number).ok_or(MotorError::InvalidChannel)?;
        Ok(Self::attach(shield, id, config))
    }

    fn attach<G, T>(shield: &mut MotorShield<G, T>, id: ChannelId, config: ChannelConfig) -> Self
    where
        G: GpioInterface,
        T: TimerBackend,
    {
        let (latch, timer) = shield.parts_mut();
        latch.enable();
        latch.update_bits(id.mask(), 0);
        latch.transmit();

        let drive = if config.use_pwm {
            let frequency = config.frequency.unwrap_or(T::DEFAULT_FREQUENCY);
            timer.configure(latch.gpio_mut(), id.slot(), frequency)
        } else {
            let pin = timer.output_pin(id.slot());
            let gpio = latch.gpio_mut();
            gpio.set_mode(pin, GpioMode::Output);
            gpio.set_low(pin);
            DriveMode::Digital
        };

        crate::log_debug!("Motor {} attached on {}", id.number(), T::NAME);

        Self {
            binding: Some((id, drive)),
            config,
            direction: Direction::Release,
            speed: 0,
        }
    }

    /// Set the motor direction and send the latch byte
    ///
    /// Only this channel's two bits change. Inside a hold the byte is sent on
    /// release.
    pub fn set_direction<G, T>(&mut self, shield: &mut MotorShield<G, T>, direction: Direction)
    where
        G: GpioInterface,
        T: TimerBackend,
    {
        let Some((id, _)) = self.binding else {
            return;
        };

        let wired = if self.config.reversed {
            direction.reversed()
        } else {
            direction
        };
        let (a, b) = id.bits();
        let value = match wired {
            Direction::Forward => 1 << a,
            Direction::Backward => 1 << b,
            Direction::Release => 0,
        };

        let latch = shield.latch_mut();
        latch.update_bits(id.mask(), value);
        latch.transmit();
        self.direction = direction;
    }

    /// Set the motor speed (0 = stopped, 255 = full)
    ///
    /// Direction bits are left alone. A digital speed pin goes high above
    /// half scale.
    pub fn set_speed<G, T>(&mut self, shield: &mut MotorShield<G, T>, speed: u8)
    where
        G: GpioInterface,
        T: TimerBackend,
    {
        let Some((id, drive)) = self.binding else {
            return;
        };

        let (latch, timer) = shield.parts_mut();
        match drive {
            DriveMode::Timer => timer.set_duty(id.slot(), speed),
            DriveMode::Digital => {
                let pin = timer.output_pin(id.slot());
                latch
                    .gpio_mut()
                    .write(pin, Level::from(speed > DIGITAL_THRESHOLD));
            }
        }
        self.speed = speed;
    }

    /// Channel identity, `None` when detached
    pub fn id(&self) -> Option<ChannelId> {
        self.binding.map(|(id, _)| id)
    }

    /// Whether the channel drives a motor
    pub fn is_attached(&self) -> bool {
        self.binding.is_some()
    }

    /// How the speed pin is driven, `None` when detached
    pub fn drive_mode(&self) -> Option<DriveMode> {
        self.binding.map(|(_, drive)| drive)
    }

    /// Settings the channel was attached with
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Last direction commanded
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Last speed commanded
    pub fn speed(&self) -> u8 {
        self.speed
    }
}
