//! Public API tests over the mock platform
//!
//! Run with `cargo test --features mock`.

use motor_shield::platform::avr::{atmega2560, atmega328p};
use motor_shield::platform::mock::{MockGpio, MockRegisters};
use motor_shield::platform::pic32mx::{self, M1Route, Pic32mx};
use motor_shield::platform::traits::{DriveMode, GpioInterface, GpioMode, Level};
use motor_shield::{ChannelConfig, Direction, LatchPins, MotorChannel, MotorGroup, MotorShield};

type Uno = MotorShield<MockGpio, atmega328p::Atmega328p<MockRegisters<atmega328p::Register>>>;
type Mega = MotorShield<MockGpio, atmega2560::Atmega2560<MockRegisters<atmega2560::Register>>>;
type Chipkit = MotorShield<MockGpio, Pic32mx<MockRegisters<pic32mx::Register>>>;

fn uno() -> Uno {
    MotorShield::new(
        MockGpio::new(),
        atmega328p::Atmega328p::new(MockRegisters::new()),
    )
}

fn mega() -> Mega {
    MotorShield::new(
        MockGpio::new(),
        atmega2560::Atmega2560::new(MockRegisters::new()),
    )
}

fn chipkit(route: M1Route) -> Chipkit {
    MotorShield::new(
        MockGpio::new(),
        Pic32mx::with_m1_route(MockRegisters::new(), route),
    )
}

#[test]
fn forward_at_speed_on_uno() {
    let mut shield = uno();
    let mut motor = MotorChannel::new(&mut shield, 1, ChannelConfig::default());
    shield.latch_mut().gpio_mut().clear_trace();
    let before = shield.latch().transmissions();

    motor.set_direction(&mut shield, Direction::Forward);
    motor.set_speed(&mut shield, 200);

    assert_eq!(shield.latch().transmissions(), before + 1);
    assert_eq!(shield.latch_state(), 0b0000_0100);
    assert_eq!(
        shield
            .timer()
            .registers()
            .value(atmega328p::Register::Ocr2a),
        200
    );

    let pins = LatchPins::default();
    let gpio = shield.latch().gpio();
    assert_eq!(gpio.rising_edges(pins.clock), 8);
    assert_eq!(gpio.latched_bytes(&pins).as_slice(), &[0b0000_0100]);
}

#[test]
fn held_commands_go_out_together() {
    let mut shield = uno();
    let mut m1 = MotorChannel::new(&mut shield, 1, ChannelConfig::default());
    let mut m2 = MotorChannel::new(&mut shield, 2, ChannelConfig::default());
    shield.latch_mut().gpio_mut().clear_trace();

    shield.hold_latch();
    m1.set_direction(&mut shield, Direction::Forward);
    m2.set_direction(&mut shield, Direction::Forward);
    assert!(shield.latch().gpio().trace().is_empty());
    shield.release_latch();

    let pins = LatchPins::default();
    let sent = shield.latch().gpio().latched_bytes(&pins);
    assert_eq!(sent.as_slice(), &[0b0000_0110]);
}

#[test]
fn shared_timer_keeps_first_frequency_on_mega() {
    let mut shield = mega();
    let m2 = ChannelConfig::new(atmega2560::MOTOR34_64KHZ, true);
    let m4 = ChannelConfig::new(atmega2560::MOTOR34_1KHZ, true);

    let mut motor2 = MotorChannel::new(&mut shield, 2, m2);
    let mut motor4 = MotorChannel::new(&mut shield, 4, m4);
    motor2.set_speed(&mut shield, 10);
    motor4.set_speed(&mut shield, 250);

    let regs = shield.timer().registers();
    assert_eq!(regs.write_count(atmega2560::Register::Tccr3b), 1);
    assert_eq!(regs.value(atmega2560::Register::Tccr3b), 0x09);
    assert_eq!(regs.value(atmega2560::Register::Ocr3c), 10);
    assert_eq!(regs.value(atmega2560::Register::Ocr3a), 250);
}

#[test]
fn pic32_digital_motor1_thresholds_speed() {
    let mut shield = chipkit(M1Route::Digital);
    let mut motor = MotorChannel::new(&mut shield, 1, ChannelConfig::default());

    assert_eq!(motor.drive_mode(), Some(DriveMode::Digital));
    assert_eq!(shield.latch().gpio().mode(11), Some(GpioMode::Output));

    motor.set_speed(&mut shield, 200);
    assert_eq!(shield.latch().gpio().read(11), Level::High);
    motor.set_speed(&mut shield, 100);
    assert_eq!(shield.latch().gpio().read(11), Level::Low);
}

#[test]
fn pic32_pin9_route_uses_output_compare() {
    let mut shield = chipkit(M1Route::Pin9);
    let mut motor = MotorChannel::new(&mut shield, 1, ChannelConfig::default());

    assert_eq!(motor.drive_mode(), Some(DriveMode::Timer));
    assert_eq!(shield.latch().gpio().mode(9), Some(GpioMode::Output));
    assert_eq!(shield.latch().gpio().mode(11), Some(GpioMode::Input));

    motor.set_speed(&mut shield, 77);
    assert_eq!(
        shield
            .timer()
            .registers()
            .value(pic32mx::Register::OcRs(4)),
        77
    );
}

#[test]
fn group_drives_differential_chassis() {
    let mut shield = uno();
    let mut group = MotorGroup::new(&mut shield, ChannelConfig::default());

    group.set_movement(&mut shield, 150, 150);
    assert_eq!(shield.latch_state(), 0b0010_0111);

    group.set_movement(&mut shield, -80, 80);
    let left = group.layout().left();
    for number in left {
        assert_eq!(
            group.channel(number).map(|c| c.direction()),
            Some(Direction::Backward)
        );
    }

    group.release_all(&mut shield);
    assert_eq!(shield.latch_state(), 0);
}

#[test]
fn invalid_channel_commands_are_ignored() {
    let mut shield = uno();
    let mut ghost = MotorChannel::new(&mut shield, 9, ChannelConfig::default());

    ghost.set_direction(&mut shield, Direction::Forward);
    ghost.set_speed(&mut shield, 255);

    assert_eq!(shield.latch().transmissions(), 0);
    assert!(shield.latch().gpio().trace().is_empty());
}
