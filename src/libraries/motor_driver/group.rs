//! Four-motor group
//!
//! Coordinates all four shield channels, typically as a differential drive
//! with two motors per side. Direction changes for the whole group are
//! batched into a single latch transmission.

use crate::parameters::{ChannelConfig, DriveLayout};
use crate::platform::traits::{GpioInterface, TimerBackend};

use super::{Direction, MotorChannel, MotorShield, Result};

/// All four motor channels of a shield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorGroup {
    channels: [MotorChannel; 4],
    layout: DriveLayout,
}

impl MotorGroup {
    /// Attach channels 1-4 with the same settings and the default layout
    pub fn new<G, T>(shield: &mut MotorShield<G, T>, config: ChannelConfig) -> Self
    where
        G: GpioInterface,
        T: TimerBackend,
    {
        Self::attach(shield, DriveLayout::default(), [config; 4])
    }

    /// Attach channels 1-4 with per-channel settings (index 0 is channel 1)
    ///
    /// # Errors
    ///
    /// Returns `MotorError::Platform` when `layout` does not use each channel
    /// exactly once. Nothing is attached in that case.
    pub fn with_layout<G, T>(
        shield: &mut MotorShield<G, T>,
        layout: DriveLayout,
        configs: [ChannelConfig; 4],
    ) -> Result<Self>
    where
        G: GpioInterface,
        T: TimerBackend,
    {
        layout.validate()?;
        Ok(Self::attach(shield, layout, configs))
    }

    fn attach<G, T>(
        shield: &mut MotorShield<G, T>,
        layout: DriveLayout,
        configs: [ChannelConfig; 4],
    ) -> Self
    where
        G: GpioInterface,
        T: TimerBackend,
    {
        let mut number = 0;
        let channels = configs.map(|config| {
            number += 1;
            MotorChannel::new(shield, number, config)
        });
        Self { channels, layout }
    }

    /// Channel `number` (1-4)
    pub fn channel(&self, number: u8) -> Option<&MotorChannel> {
        self.channels.get(usize::from(number).checked_sub(1)?)
    }

    /// Mutable channel `number` (1-4)
    pub fn channel_mut(&mut self, number: u8) -> Option<&mut MotorChannel> {
        self.channels.get_mut(usize::from(number).checked_sub(1)?)
    }

    /// Wheel layout
    pub fn layout(&self) -> &DriveLayout {
        &self.layout
    }

    /// Set every motor to `direction` with one latch transmission
    pub fn set_all_directions<G, T>(&mut self, shield: &mut MotorShield<G, T>, direction: Direction)
    where
        G: GpioInterface,
        T: TimerBackend,
    {
        let channels = &mut self.channels;
        shield.batch(|shield| {
            for channel in channels.iter_mut() {
                channel.set_direction(shield, direction);
            }
        });
    }

    /// Set every motor to `speed`
    pub fn set_all_speeds<G, T>(&mut self, shield: &mut MotorShield<G, T>, speed: u8)
    where
        G: GpioInterface,
        T: TimerBackend,
    {
        for channel in self.channels.iter_mut() {
            channel.set_speed(shield, speed);
        }
    }

    /// Release every motor with one latch transmission
    pub fn release_all<G, T>(&mut self, shield: &mut MotorShield<G, T>)
    where
        G: GpioInterface,
        T: TimerBackend,
    {
        self.set_all_directions(shield, Direction::Release);
    }

    /// Drive each side from a signed speed
    ///
    /// The sign picks the direction and the magnitude, clamped to 255, the
    /// duty. Directions for both sides go out in one transmission.
    pub fn set_movement<G, T>(&mut self, shield: &mut MotorShield<G, T>, left: i16, right: i16)
    where
        G: GpioInterface,
        T: TimerBackend,
    {
        let layout = self.layout;
        let sides = [(layout.left(), left), (layout.right(), right)];

        shield.batch(|shield| {
            for (numbers, speed) in sides {
                for number in numbers {
                    if let Some(channel) = self.channel_mut(number) {
                        channel.set_direction(shield, Direction::from_signed(speed));
                    }
                }
            }
        });

        for (numbers, speed) in sides {
            let duty = speed.unsigned_abs().min(u16::from(u8::MAX)) as u8;
            for number in numbers {
                if let Some(channel) = self.channel_mut(number) {
                    channel.set_speed(shield, duty);
                }
            }
        }

        crate::log_trace!("Movement left {} right {}", left, right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libraries::motor_driver::MotorError;
    use crate::platform::PlatformError;
    use crate::platform::avr::atmega328p::{Atmega328p, Register};
    use crate::platform::mock::{MockGpio, MockRegisters};

    type TestShield = MotorShield<MockGpio, Atmega328p<MockRegisters<Register>>>;

    fn shield() -> TestShield {
        MotorShield::new(MockGpio::new(), Atmega328p::new(MockRegisters::new()))
    }

    #[test]
    fn test_attaches_all_channels() {
        let mut shield = shield();
        let group = MotorGroup::new(&mut shield, ChannelConfig::default());

        for number in 1..=4 {
            let channel = group.channel(number).unwrap();
            assert_eq!(channel.id().unwrap().number(), number);
        }
        assert!(group.channel(0).is_none());
        assert!(group.channel(5).is_none());
    }

    #[test]
    fn test_set_all_directions_single_transmission() {
        let mut shield = shield();
        let mut group = MotorGroup::new(&mut shield, ChannelConfig::default());
        let before = shield.latch().transmissions();

        group.set_all_directions(&mut shield, Direction::Forward);

        assert_eq!(shield.latch().transmissions(), before + 1);
        // A bits: 2, 1, 5, 0
        assert_eq!(shield.latch_state(), 0b0010_0111);
    }

    #[test]
    fn test_release_all() {
        let mut shield = shield();
        let mut group = MotorGroup::new(&mut shield, ChannelConfig::default());
        group.set_all_directions(&mut shield, Direction::Backward);
        assert_eq!(shield.latch_state(), 0b1101_1000);

        group.release_all(&mut shield);

        assert_eq!(shield.latch_state(), 0);
        for number in 1..=4 {
            assert_eq!(
                group.channel(number).unwrap().direction(),
                Direction::Release
            );
        }
    }

    #[test]
    fn test_set_all_speeds() {
        let mut shield = shield();
        let mut group = MotorGroup::new(&mut shield, ChannelConfig::default());

        group.set_all_speeds(&mut shield, 90);

        let regs = shield.timer().registers();
        for reg in [Register::Ocr2a, Register::Ocr2b, Register::Ocr0a, Register::Ocr0b] {
            assert_eq!(regs.value(reg), 90);
        }
    }

    #[test]
    fn test_set_movement_spins_in_place() {
        let mut shield = shield();
        let mut group = MotorGroup::new(&mut shield, ChannelConfig::default());
        let before = shield.latch().transmissions();

        group.set_movement(&mut shield, 300, -120);

        assert_eq!(shield.latch().transmissions(), before + 1);

        // Left side (2, 3) forward at full duty
        for number in [2, 3] {
            let channel = group.channel(number).unwrap();
            assert_eq!(channel.direction(), Direction::Forward);
            assert_eq!(channel.speed(), 255);
        }
        // Right side (1, 4) backward
        for number in [1, 4] {
            let channel = group.channel(number).unwrap();
            assert_eq!(channel.direction(), Direction::Backward);
            assert_eq!(channel.speed(), 120);
        }

        let regs = shield.timer().registers();
        assert_eq!(regs.value(Register::Ocr2b), 255);
        assert_eq!(regs.value(Register::Ocr2a), 120);
    }

    #[test]
    fn test_set_movement_zero_releases() {
        let mut shield = shield();
        let mut group = MotorGroup::new(&mut shield, ChannelConfig::default());
        group.set_movement(&mut shield, 100, 100);

        group.set_movement(&mut shield, 0, 0);

        assert_eq!(shield.latch_state(), 0);
        assert_eq!(group.channel(1).unwrap().speed(), 0);
    }

    #[test]
    fn test_with_layout_validates() {
        let mut shield = shield();
        let layout = DriveLayout {
            front_left: 1,
            front_right: 1,
            rear_left: 3,
            rear_right: 4,
        };

        let result = MotorGroup::with_layout(&mut shield, layout, [ChannelConfig::default(); 4]);

        assert_eq!(
            result,
            Err(MotorError::Platform(PlatformError::InvalidConfig))
        );
        assert!(!shield.latch().is_enabled());
    }

    #[test]
    fn test_with_layout_per_channel_config() {
        let mut shield = shield();
        let mut configs = [ChannelConfig::default(); 4];
        configs[2] = ChannelConfig::digital();

        let group =
            MotorGroup::with_layout(&mut shield, DriveLayout::default(), configs).unwrap();

        assert_eq!(
            group.channel(3).unwrap().drive_mode(),
            Some(crate::platform::traits::DriveMode::Digital)
        );
    }
}
