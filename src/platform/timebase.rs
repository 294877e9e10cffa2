//! One-shot timebase initialization
//!
//! Several motor slots can share a single hardware timer (for example both
//! compare channels of ATmega328P Timer2). The timer's period and prescaler
//! must be programmed exactly once; reprogramming it after a channel is live
//! would change the frequency under the other channel.

use crate::platform::traits::FrequencyCode;

/// Initialization state of one shared hardware timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SharedTimebase {
    frequency: Option<FrequencyCode>,
}

impl SharedTimebase {
    /// An uninitialized timebase
    pub const fn new() -> Self {
        Self { frequency: None }
    }

    /// Whether the timer has been programmed
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.frequency.is_some()
    }

    /// Frequency code the timer was programmed with
    #[inline]
    pub fn frequency(&self) -> Option<FrequencyCode> {
        self.frequency
    }

    /// Run `program` if the timer has not been initialized yet
    ///
    /// Returns `true` when `program` ran. A later request for a different
    /// frequency keeps the first one and is only logged.
    pub fn init_once<F: FnOnce(FrequencyCode)>(
        &mut self,
        timer: &'static str,
        frequency: FrequencyCode,
        program: F,
    ) -> bool {
        match self.frequency {
            None => {
                program(frequency);
                self.frequency = Some(frequency);
                crate::log_debug!("{} timebase set, prescaler code {}", timer, frequency.bits());
                true
            }
            Some(current) => {
                if current != frequency {
                    crate::log_warn!(
                        "{} already runs at code {}, ignoring request for {}",
                        timer,
                        current.bits(),
                        frequency.bits()
                    );
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_programs_only_once() {
        let mut timebase = SharedTimebase::new();
        let mut runs = 0;

        assert!(timebase.init_once("T2", FrequencyCode::new(1), |_| runs += 1));
        assert!(!timebase.init_once("T2", FrequencyCode::new(1), |_| runs += 1));
        assert_eq!(runs, 1);
        assert!(timebase.is_initialized());
    }

    #[test]
    fn test_first_frequency_wins() {
        let mut timebase = SharedTimebase::new();
        timebase.init_once("T2", FrequencyCode::new(2), |_| {});

        let mut applied = None;
        timebase.init_once("T2", FrequencyCode::new(4), |f| applied = Some(f));

        assert_eq!(applied, None);
        assert_eq!(timebase.frequency(), Some(FrequencyCode::new(2)));
    }
}
