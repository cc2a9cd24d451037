//! PWM output abstractions
//!
//! A servo is driven by a PWM slice whose counter wraps once per servo
//! period. The compare level written to the channel decides how long the
//! output stays high within that period.

/// Counter resolution shared by every servo output on the controller
///
/// The slice counts `0..PWM_WRAP` once per period, so a level of
/// `PWM_WRAP / 2` is a 50% duty cycle regardless of the period.
pub const PWM_WRAP: u16 = 40_000;

/// Maximum fractional clock divider supported by the slice hardware
pub const MAX_CLOCK_DIVIDER: f32 = 255.9375;

/// Minimum clock divider (no division)
pub const MIN_CLOCK_DIVIDER: f32 = 1.0;

/// A single PWM output channel driving one servo
///
/// Implementations must be idempotent and must not block: writing the
/// same level twice leaves the output unchanged, and the call returns as
/// soon as the compare register is updated.
pub trait PwmChannel {
    /// Set the compare level (0..=PWM_WRAP)
    fn set_level(&mut self, level: u16);

    /// Get the last level written
    fn level(&self) -> u16;
}

/// Calculate the slice clock divider for a servo period
///
/// The counter must wrap exactly once per `period_us`, so the counter
/// clock is `PWM_WRAP` ticks per period:
///
/// ```text
/// divider = system_clock_hz / (1e6 / period_us) / PWM_WRAP
/// ```
///
/// The result is clamped to the range the hardware divider can represent.
pub fn clock_divider(system_clock_hz: u32, period_us: u32) -> f32 {
    if period_us == 0 {
        return MIN_CLOCK_DIVIDER;
    }
    let frequency_hz = 1_000_000.0 / period_us as f32;
    let divider = system_clock_hz as f32 / frequency_hz / PWM_WRAP as f32;
    divider.clamp(MIN_CLOCK_DIVIDER, MAX_CLOCK_DIVIDER)
}

/// Counter top value for the slice (the counter wraps after `top`)
pub const fn counter_top() -> u16 {
    PWM_WRAP - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divider_for_standard_servo() {
        // 125 MHz system clock, 50 Hz servo signal
        let div = clock_divider(125_000_000, 20_000);
        assert!((div - 62.5).abs() < 1e-3);
    }

    #[test]
    fn test_divider_scales_with_period() {
        let fast = clock_divider(125_000_000, 10_000);
        let slow = clock_divider(125_000_000, 20_000);
        assert!((slow - fast * 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_divider_clamped() {
        assert_eq!(clock_divider(125_000_000, 0), MIN_CLOCK_DIVIDER);
        assert_eq!(clock_divider(125_000_000, 1), MIN_CLOCK_DIVIDER);
        assert_eq!(clock_divider(125_000_000, 1_000_000), MAX_CLOCK_DIVIDER);
    }

    #[test]
    fn test_counter_top() {
        assert_eq!(counter_top(), 39_999);
    }
}
