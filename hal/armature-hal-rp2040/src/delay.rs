//! Busy-wait delay

use armature_hal::BlockingDelay;
use embassy_time::{block_for, Duration};

/// Blocking delay that spins on the embassy time driver
///
/// Blocks the whole executor while waiting; only use it from a task that
/// owns the core for the duration of a move.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusyDelay;

impl BlockingDelay for BusyDelay {
    fn delay_us(&mut self, us: u32) {
        block_for(Duration::from_micros(us as u64));
    }
}
