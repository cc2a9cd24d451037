//! Angle to PWM level mapping

use armature_hal::PWM_WRAP;

use crate::config::ServoDatasheet;

/// Pulse width in microseconds for an angle
///
/// Linear between `min_duty_us` at 0 degrees and `max_duty_us` at
/// `angle_range` degrees.
pub fn duty_us(datasheet: &ServoDatasheet, angle: f32) -> f32 {
    let span = datasheet.max_duty_us.saturating_sub(datasheet.min_duty_us) as f32;
    (angle / datasheet.angle_range) * span + datasheet.min_duty_us as f32
}

/// PWM compare level for an angle
///
/// The level is the pulse width expressed in counter ticks of one period
/// (`PWM_WRAP` ticks), rounded to the nearest tick and kept within
/// `0..=PWM_WRAP`.
pub fn duty_level(datasheet: &ServoDatasheet, angle: f32) -> u16 {
    if datasheet.period_us == 0 {
        return 0;
    }
    let ticks = duty_us(datasheet, angle) * PWM_WRAP as f32 / datasheet.period_us as f32;
    let ticks = libm::roundf(ticks);
    if ticks >= PWM_WRAP as f32 {
        PWM_WRAP
    } else if ticks > 0.0 {
        ticks as u16
    } else {
        0
    }
}
