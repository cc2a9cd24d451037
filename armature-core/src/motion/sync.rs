//! Multi-joint synchronized move
//!
//! All joints in one move share a single timeline: the step count is the
//! largest any participant needs, every step applies the same eased ratio
//! to every joint, and the wait between steps is the longest PWM period
//! among them. Joints therefore start and finish together regardless of
//! how far each one travels.

use armature_hal::{BlockingDelay, PwmChannel};

use super::easing::{calculate_smooth_ratio, calculate_steps};
use crate::joint::Joint;
use crate::traits::StepHook;

/// One joint's share of a synchronized move
///
/// Captures the start angle and clamped target when created, and takes
/// the step count from the clamped distance. Build
/// every `SyncMove` before running `smooth_many`.
pub struct SyncMove<'a, P> {
    joint: &'a mut Joint<P>,
    start: f32,
    difference: f32,
    target: f32,
    steps: u32,
}

impl<'a, P: PwmChannel> SyncMove<'a, P> {
    pub fn new(joint: &'a mut Joint<P>, target: f32) -> Self {
        let target = joint.limits().clamp(target);
        let start = joint.angle();
        let difference = target - start;
        let datasheet = joint.datasheet();
        let steps = calculate_steps(difference, datasheet.angle_range, datasheet.period_us);
        Self {
            joint,
            start,
            difference,
            target,
            steps,
        }
    }

    /// Steps this joint would need on its own
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Clamped target angle
    pub fn target(&self) -> f32 {
        self.target
    }
}

/// Run a synchronized move over all `moves`
///
/// Returns the shared step count.
pub fn smooth_many<P, D, H>(moves: &mut [SyncMove<'_, P>], delay: &mut D, hook: &mut H) -> u32
where
    P: PwmChannel,
    D: BlockingDelay,
    H: StepHook,
{
    let max_steps = moves.iter().map(|m| m.steps).max().unwrap_or(0);
    let max_period = moves
        .iter()
        .map(|m| m.joint.datasheet().period_us)
        .max()
        .unwrap_or(0)
        .max(1);

    for step in 1..max_steps {
        let ratio = calculate_smooth_ratio(step as f32 / max_steps as f32);
        for m in moves.iter_mut() {
            m.joint.set_angle(m.start + m.difference * ratio);
        }
        hook.on_step(step, max_steps);
        delay.delay_us(max_period);
    }

    for m in moves.iter_mut() {
        m.joint.set_angle(m.target);
    }
    let total = max_steps.max(1);
    hook.on_step(total, total);
    max_steps
}
