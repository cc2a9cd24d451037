//! Blocking time source
//!
//! Every step of a smooth move waits for one servo period before the
//! next command. The wait is expressed through this trait so that tests
//! can record delays instead of sleeping.

/// Blocking delay with microsecond resolution
///
/// The call must not return before the requested time has elapsed.
pub trait BlockingDelay {
    /// Block for `us` microseconds
    fn delay_us(&mut self, us: u32);

    /// Block for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) {
        self.delay_us(ms.saturating_mul(1_000));
    }
}

impl<T: BlockingDelay + ?Sized> BlockingDelay for &mut T {
    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms);
    }
}
