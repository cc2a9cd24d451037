//! Recording test doubles for the hardware traits

use armature_hal::{BlockingDelay, PwmChannel};

/// PWM channel that records every level written
#[derive(Debug, Default)]
pub struct MockPwm {
    pub history: Vec<u16>,
}

impl MockPwm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<u16> {
        self.history.last().copied()
    }
}

impl PwmChannel for MockPwm {
    fn set_level(&mut self, level: u16) {
        self.history.push(level);
    }

    fn level(&self) -> u16 {
        self.last().unwrap_or(0)
    }
}

/// Delay that records requested durations instead of sleeping
#[derive(Debug, Default)]
pub struct MockDelay {
    pub calls: Vec<u32>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_us(&self) -> u64 {
        self.calls.iter().map(|&us| us as u64).sum()
    }
}

impl BlockingDelay for MockDelay {
    fn delay_us(&mut self, us: u32) {
        self.calls.push(us);
    }
}
