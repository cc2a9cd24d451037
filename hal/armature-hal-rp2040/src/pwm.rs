//! Servo PWM outputs
//!
//! Each slice counts from 0 to `counter_top()` once per servo period, so
//! a compare level of N ticks gives a pulse of `N * period / PWM_WRAP`
//! microseconds.

use armature_hal::pwm::{clock_divider, counter_top};
use armature_hal::PwmChannel;
use embassy_rp::pwm::{ChannelAPin, ChannelBPin, Config, Pwm, PwmOutput, Slice};
use embassy_rp::Peri;
use embedded_hal::pwm::SetDutyCycle;
use fixed::types::U12F4;

/// Slice configuration for a servo with the given period
///
/// Both outputs start at level 0 (no pulse) until the first angle is
/// written.
pub fn servo_slice_config(period_us: u32) -> Config {
    let divider = clock_divider(embassy_rp::clocks::clk_sys_freq(), period_us);
    let mut config = Config::default();
    config.top = counter_top();
    config.divider = U12F4::saturating_from_num(divider);
    config.compare_a = 0;
    config.compare_b = 0;
    config.enable = true;
    config
}

/// One servo signal output
pub struct ServoChannel<'d> {
    output: PwmOutput<'d>,
    level: u16,
}

impl<'d> ServoChannel<'d> {
    pub fn new(output: PwmOutput<'d>) -> Self {
        Self { output, level: 0 }
    }
}

impl PwmChannel for ServoChannel<'_> {
    fn set_level(&mut self, level: u16) {
        let level = level.min(self.output.max_duty_cycle());
        // Level is clamped to the slice top, the only failure mode
        let _ = self.output.set_duty_cycle(level);
        self.level = level;
    }

    fn level(&self) -> u16 {
        self.level
    }
}

/// Configure one slice for two servos and return both outputs
///
/// Returns `None` if the slice did not hand out both halves.
pub fn servo_pair<'d, T: Slice>(
    slice: Peri<'d, T>,
    pin_a: Peri<'d, impl ChannelAPin<T>>,
    pin_b: Peri<'d, impl ChannelBPin<T>>,
    period_us: u32,
) -> Option<(ServoChannel<'d>, ServoChannel<'d>)> {
    let pwm = Pwm::new_output_ab(slice, pin_a, pin_b, servo_slice_config(period_us));
    match pwm.split() {
        (Some(a), Some(b)) => Some((ServoChannel::new(a), ServoChannel::new(b))),
        _ => None,
    }
}
