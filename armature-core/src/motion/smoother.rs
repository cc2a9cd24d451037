//! Single-joint smoothed move

use armature_hal::{BlockingDelay, PwmChannel};

use super::easing::{calculate_smooth_ratio, calculate_steps};
use crate::joint::Joint;
use crate::traits::StepHook;

/// Move one joint to `target` along the cosine curve
///
/// The target is clamped into the joint limits first, and the step count
/// is taken from the clamped distance, not the requested one. Each
/// intermediate step writes one level and then waits one PWM period. The
/// move always ends with an exact write of the clamped target, so the
/// joint never stops short because of float rounding.
///
/// A move under one step jumps straight to the target without waiting.
/// Returns the number of steps computed for the move.
pub fn smooth<P, D, H>(joint: &mut Joint<P>, target: f32, delay: &mut D, hook: &mut H) -> u32
where
    P: PwmChannel,
    D: BlockingDelay,
    H: StepHook,
{
    let target = joint.limits().clamp(target);
    let start = joint.angle();
    let difference = target - start;
    let datasheet = *joint.datasheet();
    let steps = calculate_steps(difference, datasheet.angle_range, datasheet.period_us);

    for step in 1..steps {
        let ratio = calculate_smooth_ratio(step as f32 / steps as f32);
        joint.set_angle(start + difference * ratio);
        hook.on_step(step, steps);
        delay.delay_us(datasheet.period_us);
    }

    joint.set_angle(target);
    let total = steps.max(1);
    hook.on_step(total, total);
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AngleLimits, JointConfig, ServoDatasheet};
    use crate::mock::{MockDelay, MockPwm};
    use crate::motion::duty_level;
    use crate::traits::NoHook;
    use proptest::prelude::*;

    fn joint_at(angle: f32) -> Joint<MockPwm> {
        let config = JointConfig {
            angle,
            ..JointConfig::default()
        };
        Joint::from_config(&config, MockPwm::new()).unwrap()
    }

    #[test]
    fn test_full_sweep() {
        let mut joint = joint_at(0.0);
        let mut delay = MockDelay::new();

        let steps = smooth(&mut joint, 180.0, &mut delay, &mut NoHook);

        assert_eq!(steps, 250);
        assert_eq!(joint.angle(), 180.0);
        assert_eq!(joint.channel().history.len(), 250);
        assert_eq!(delay.calls.len(), 249);
        assert!(delay.calls.iter().all(|&us| us == 20_000));
        assert_eq!(joint.channel().last(), Some(5_000));
    }

    #[test]
    fn test_levels_are_monotonic() {
        let mut joint = joint_at(0.0);
        let mut delay = MockDelay::new();
        smooth(&mut joint, 180.0, &mut delay, &mut NoHook);

        let history = &joint.channel().history;
        assert!(history.windows(2).all(|w| w[0] <= w[1]));
        // eased: the first step is much smaller than the middle one
        let first = history[1] - history[0];
        let middle = history[125] - history[124];
        assert!(first < middle);
    }

    #[test]
    fn test_small_move_jumps() {
        let mut joint = joint_at(90.0);
        let mut delay = MockDelay::new();

        let steps = smooth(&mut joint, 90.5, &mut delay, &mut NoHook);

        assert_eq!(steps, 0);
        assert_eq!(joint.angle(), 90.5);
        assert_eq!(joint.channel().history.len(), 1);
        assert!(delay.calls.is_empty());
    }

    #[test]
    fn test_zero_move_rewrites_level() {
        let mut joint = joint_at(90.0);
        let mut delay = MockDelay::new();

        smooth(&mut joint, 90.0, &mut delay, &mut NoHook);

        assert_eq!(joint.channel().history, vec![3_000]);
        assert!(delay.calls.is_empty());
    }

    #[test]
    fn test_target_clamped_before_step_count() {
        let mut joint = Joint::new(MockPwm::new(), ServoDatasheet::MG996R);
        joint
            .set_limits(AngleLimits::new(3.0, 177.0, 180.0).unwrap())
            .unwrap();
        let mut delay = MockDelay::new();

        // from the center to the upper limit: 87 degrees, not 90
        let steps = smooth(&mut joint, 180.0, &mut delay, &mut NoHook);

        assert_eq!(steps, calculate_steps(87.0, 180.0, 20_000));
        assert_eq!(joint.angle(), 177.0);
        assert_eq!(
            joint.channel().last(),
            Some(duty_level(&ServoDatasheet::MG996R, 177.0))
        );
    }

    #[test]
    fn test_hook_sees_every_command() {
        let mut joint = joint_at(0.0);
        let mut delay = MockDelay::new();
        let mut seen = Vec::new();

        smooth(&mut joint, 25.0, &mut delay, &mut |step: u32, total: u32| seen.push((step, total)));

        assert_eq!(seen.len(), 34);
        assert_eq!(seen.first(), Some(&(1, 34)));
        assert_eq!(seen.last(), Some(&(34, 34)));
    }

    #[test]
    fn test_nan_target_leaves_joint() {
        let mut joint = joint_at(45.0);
        let mut delay = MockDelay::new();

        smooth(&mut joint, f32::NAN, &mut delay, &mut NoHook);

        assert_eq!(joint.angle(), 45.0);
        assert!(joint.channel().history.is_empty());
        assert!(delay.calls.is_empty());
    }

    proptest! {
        #[test]
        fn prop_converges_exactly(start in 0.0f32..=180.0, target in -90.0f32..=270.0) {
            let mut joint = joint_at(start);
            let mut delay = MockDelay::new();

            let steps = smooth(&mut joint, target, &mut delay, &mut NoHook);
            let clamped = target.max(0.0).min(180.0);

            prop_assert_eq!(joint.angle(), clamped);
            prop_assert_eq!(joint.channel().last(), Some(duty_level(&ServoDatasheet::MG996R, clamped)));
            prop_assert_eq!(joint.channel().history.len() as u32, steps.max(1));
            prop_assert_eq!(delay.calls.len() as u32, steps.saturating_sub(1));
        }
    }
}
