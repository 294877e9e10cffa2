//! Mock GPIO implementation for testing

use crate::parameters::LatchPins;
use crate::platform::traits::{GpioInterface, GpioMode, Level};

/// Highest pin number (exclusive) the mock tracks
pub const MAX_PINS: usize = 64;

/// Number of pin events kept in the trace
pub const TRACE_CAPACITY: usize = 2048;

/// One recorded pin operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinEvent {
    /// `set_mode` call
    Mode { pin: u8, mode: GpioMode },
    /// `write` call
    Write { pin: u8, level: Level },
}

/// Mock GPIO implementation
///
/// Tracks pin modes and levels, and records every call in order so tests can
/// replay the signal trace the shield would have seen.
#[derive(Debug, Clone)]
pub struct MockGpio {
    modes: [Option<GpioMode>; MAX_PINS],
    levels: [Level; MAX_PINS],
    trace_start: [Level; MAX_PINS],
    trace: heapless::Vec<PinEvent, TRACE_CAPACITY>,
    dropped: usize,
}

impl MockGpio {
    /// Create a mock with every pin unconfigured and low
    pub fn new() -> Self {
        Self {
            modes: [None; MAX_PINS],
            levels: [Level::Low; MAX_PINS],
            trace_start: [Level::Low; MAX_PINS],
            trace: heapless::Vec::new(),
            dropped: 0,
        }
    }

    /// Mode last set on `pin`, `None` if never configured
    pub fn mode(&self, pin: u8) -> Option<GpioMode> {
        self.modes.get(pin as usize).copied().flatten()
    }

    /// Recorded events since creation or the last [`clear_trace`](Self::clear_trace)
    pub fn trace(&self) -> &[PinEvent] {
        &self.trace
    }

    /// Number of events that did not fit in the trace
    pub fn dropped_events(&self) -> usize {
        self.dropped
    }

    /// Forget recorded events; current levels become the new starting point
    pub fn clear_trace(&mut self) {
        self.trace.clear();
        self.trace_start = self.levels;
        self.dropped = 0;
    }

    /// Levels written to `pin`, in order
    pub fn writes(&self, pin: u8) -> impl Iterator<Item = Level> + '_ {
        self.trace.iter().filter_map(move |event| match *event {
            PinEvent::Write { pin: p, level } if p == pin => Some(level),
            _ => None,
        })
    }

    /// Number of low-to-high transitions on `pin`
    pub fn rising_edges(&self, pin: u8) -> usize {
        let mut previous = self.start_level(pin);
        let mut edges = 0;
        for level in self.writes(pin) {
            if previous == Level::Low && level == Level::High {
                edges += 1;
            }
            previous = level;
        }
        edges
    }

    /// Bytes a 74HC595 on `pins` would have presented at its outputs
    ///
    /// Replays the trace through a model of the chip: the data line is
    /// sampled on each clock rising edge and shifted in, and the shift register
    /// is copied to the outputs on each latch rising edge.
    pub fn latched_bytes(&self, pins: &LatchPins) -> heapless::Vec<u8, 64> {
        let mut latched = heapless::Vec::new();
        let mut data = self.start_level(pins.data);
        let mut clock = self.start_level(pins.clock);
        let mut latch = self.start_level(pins.latch);
        let mut shift: u8 = 0;

        for event in self.trace.iter() {
            let PinEvent::Write { pin, level } = *event else {
                continue;
            };
            if pin == pins.data {
                data = level;
            } else if pin == pins.clock {
                if clock == Level::Low && level == Level::High {
                    shift = (shift << 1) | data.is_high() as u8;
                }
                clock = level;
            } else if pin == pins.latch {
                if latch == Level::Low && level == Level::High {
                    let _ = latched.push(shift);
                }
                latch = level;
            }
        }
        latched
    }

    fn start_level(&self, pin: u8) -> Level {
        self.trace_start
            .get(pin as usize)
            .copied()
            .unwrap_or_default()
    }

    fn record(&mut self, event: PinEvent) {
        if self.trace.push(event).is_err() {
            self.dropped += 1;
        }
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioInterface for MockGpio {
    fn set_mode(&mut self, pin: u8, mode: GpioMode) {
        if let Some(slot) = self.modes.get_mut(pin as usize) {
            *slot = Some(mode);
        }
        self.record(PinEvent::Mode { pin, mode });
    }

    fn write(&mut self, pin: u8, level: Level) {
        if let Some(slot) = self.levels.get_mut(pin as usize) {
            *slot = level;
        }
        self.record(PinEvent::Write { pin, level });
    }

    fn read(&self, pin: u8) -> Level {
        self.levels.get(pin as usize).copied().unwrap_or_default()
    }
}
