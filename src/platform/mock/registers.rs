//! Mock register bank for testing timer backends

use crate::platform::traits::RegisterInterface;

/// Distinct registers the mock can hold
const MAX_REGISTERS: usize = 32;

/// Register writes kept in the log
const WRITE_LOG_CAPACITY: usize = 256;

/// Mock register bank
///
/// Registers read as zero until written. Every write is logged so tests can
/// check that a shared timebase was programmed exactly once.
#[derive(Debug, Clone)]
pub struct MockRegisters<R> {
    values: heapless::Vec<(R, u32), MAX_REGISTERS>,
    writes: heapless::Vec<(R, u32), WRITE_LOG_CAPACITY>,
}

impl<R: Copy + PartialEq> MockRegisters<R> {
    /// Create an empty register bank
    pub fn new() -> Self {
        Self {
            values: heapless::Vec::new(),
            writes: heapless::Vec::new(),
        }
    }

    /// Current value of `reg`
    pub fn value(&self, reg: R) -> u32 {
        self.values
            .iter()
            .find(|(r, _)| *r == reg)
            .map(|&(_, value)| value)
            .unwrap_or(0)
    }

    /// All writes in order
    pub fn writes(&self) -> &[(R, u32)] {
        &self.writes
    }

    /// Number of writes that targeted `reg`
    pub fn write_count(&self, reg: R) -> usize {
        self.writes.iter().filter(|(r, _)| *r == reg).count()
    }

    /// Forget the write log, keeping register values
    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

impl<R: Copy + PartialEq> Default for MockRegisters<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Copy + PartialEq> RegisterInterface<R> for MockRegisters<R> {
    fn read(&self, reg: R) -> u32 {
        self.value(reg)
    }

    fn write(&mut self, reg: R, value: u32) {
        match self.values.iter_mut().find(|(r, _)| *r == reg) {
            Some(entry) => entry.1 = value,
            None => {
                let _ = self.values.push((reg, value));
            }
        }
        let _ = self.writes.push((reg, value));
    }
}
