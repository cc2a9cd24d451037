//! Step count and easing curve for smoothed moves

use core::f32::consts::PI;

/// Time budget in milliseconds for a move across the full angle range
///
/// With one step per PWM period, a full sweep on a 20 ms servo takes
/// `5000 / 20 = 250` steps.
pub const MAX_MOVE_MS: u32 = 5_000;

/// Number of intermediate steps for a move of `angle_difference` degrees
///
/// `floor(|difference / range| * MAX_MOVE_MS * 1000 / period_us)`.
/// Non-decreasing in `|angle_difference|` and non-increasing in
/// `period_us`. Returns 0 for a zero period, a non-positive range, or a
/// NaN difference.
pub fn calculate_steps(angle_difference: f32, angle_range: f32, period_us: u32) -> u32 {
    if period_us == 0 || !(angle_range > 0.0) {
        return 0;
    }
    let ratio = libm::fabsf(angle_difference / angle_range);
    let steps = ratio * 1_000.0 * MAX_MOVE_MS as f32 / period_us as f32;
    // float to int casts saturate and map NaN to 0
    steps as u32
}

/// Cosine ease-in/ease-out: `0.5 - cos(pi * progress) / 2`
///
/// Maps 0 to 0 and 1 to 1, and is monotonically non-decreasing on
/// `[0, 1]` with zero slope at both ends.
pub fn calculate_smooth_ratio(progress: f32) -> f32 {
    0.5 - libm::cosf(PI * progress) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_full_sweep_steps() {
        assert_eq!(calculate_steps(180.0, 180.0, 20_000), 250);
        assert_eq!(calculate_steps(-180.0, 180.0, 20_000), 250);
        assert_eq!(calculate_steps(180.0, 180.0, 25_000), 200);
    }

    #[test]
    fn test_partial_steps() {
        assert_eq!(calculate_steps(25.0, 180.0, 20_000), 34);
        assert_eq!(calculate_steps(55.0, 180.0, 20_000), 76);
        assert_eq!(calculate_steps(0.0, 180.0, 20_000), 0);
        // 0.5 deg is under one step
        assert_eq!(calculate_steps(0.5, 180.0, 20_000), 0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(calculate_steps(90.0, 180.0, 0), 0);
        assert_eq!(calculate_steps(90.0, 0.0, 20_000), 0);
        assert_eq!(calculate_steps(f32::NAN, 180.0, 20_000), 0);
    }

    #[test]
    fn test_ratio_endpoints() {
        assert!(calculate_smooth_ratio(0.0).abs() < 1e-6);
        assert!((calculate_smooth_ratio(0.5) - 0.5).abs() < 1e-6);
        assert!((calculate_smooth_ratio(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ratio_monotonic_on_grid() {
        let mut previous = calculate_smooth_ratio(0.0);
        for i in 1..=1_000 {
            let ratio = calculate_smooth_ratio(i as f32 / 1_000.0);
            assert!(ratio >= previous, "ratio decreased at {}", i);
            previous = ratio;
        }
    }

    proptest! {
        #[test]
        fn prop_steps_monotonic_in_difference(a in 0.0f32..360.0, b in 0.0f32..360.0, period in 1_000u32..40_000) {
            let (small, large) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(calculate_steps(small, 180.0, period) <= calculate_steps(large, 180.0, period));
            prop_assert_eq!(calculate_steps(-large, 180.0, period), calculate_steps(large, 180.0, period));
        }

        #[test]
        fn prop_steps_nonincreasing_in_period(diff in -360.0f32..360.0, a in 1u32..60_000, b in 1u32..60_000) {
            let (short, long) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(calculate_steps(diff, 180.0, long) <= calculate_steps(diff, 180.0, short));
        }

        #[test]
        fn prop_ratio_bounded(progress in 0.0f32..=1.0) {
            let ratio = calculate_smooth_ratio(progress);
            prop_assert!(ratio >= -1e-6 && ratio <= 1.0 + 1e-6);
        }

        #[test]
        fn prop_ratio_monotonic(a in 0.0f32..=1.0, gap in 0.001f32..1.0) {
            let b = (a + gap).min(1.0);
            prop_assert!(calculate_smooth_ratio(a) <= calculate_smooth_ratio(b));
        }
    }
}
