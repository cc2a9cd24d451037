//! Arm aggregate
//!
//! Owns the ordered joints and the blocking delay, validates move
//! requests, and routes them to the single-joint smoother or the
//! synchronizer. Joint order is fixed at construction and equals the
//! index space used by motion signals.

use armature_hal::{BlockingDelay, PwmChannel};
use armature_protocol::{MotionSignal, SignalEntry, MAX_SIGNAL_ENTRIES};
use heapless::Vec;

use crate::config::{AngleLimits, ArmConfig, ServoDatasheet, MAX_JOINTS};
use crate::error::ArmError;
use crate::joint::Joint;
use crate::motion::{smooth, smooth_many, SyncMove};
use crate::traits::{NoHook, StepHook};

/// An ordered set of joints driven as one arm
pub struct Arm<P, D> {
    joints: Vec<Joint<P>, MAX_JOINTS>,
    delay: D,
}

impl<P: PwmChannel, D: BlockingDelay> Arm<P, D> {
    /// Create an arm from already built joints
    pub fn new<I>(joints: I, delay: D) -> Result<Self, ArmError>
    where
        I: IntoIterator<Item = Joint<P>>,
    {
        let mut collected = Vec::new();
        let mut joints = joints.into_iter();
        while let Some(joint) = joints.next() {
            if collected.push(joint).is_err() {
                return Err(ArmError::Capacity {
                    requested: MAX_JOINTS + 1 + joints.count(),
                    max: MAX_JOINTS,
                });
            }
        }
        if collected.is_empty() {
            return Err(ArmError::NoJoints);
        }
        Ok(Self {
            joints: collected,
            delay,
        })
    }

    /// Create an arm from configuration, pairing joints with channels in order
    pub fn from_config<I>(config: &ArmConfig, channels: I, delay: D) -> Result<Self, ArmError>
    where
        I: IntoIterator<Item = P>,
    {
        let expected = config.joints.len();
        let mut collected: Vec<P, MAX_JOINTS> = Vec::new();
        let mut channels = channels.into_iter();
        while let Some(channel) = channels.next() {
            if collected.push(channel).is_err() {
                return Err(ArmError::ChannelCount {
                    expected,
                    provided: MAX_JOINTS + 1 + channels.count(),
                });
            }
        }
        if collected.len() != expected {
            return Err(ArmError::ChannelCount {
                expected,
                provided: collected.len(),
            });
        }

        let mut joints: Vec<Joint<P>, MAX_JOINTS> = Vec::new();
        for (joint_config, channel) in config.joints.iter().zip(collected) {
            joints
                .push(Joint::from_config(joint_config, channel)?)
                .map_err(|_| ArmError::Capacity {
                    requested: expected,
                    max: MAX_JOINTS,
                })?;
        }
        Self::new(joints, delay)
    }

    /// Number of joints
    pub fn number(&self) -> usize {
        self.joints.len()
    }

    pub fn joints(&self) -> &[Joint<P>] {
        &self.joints
    }

    pub fn joint(&self, index: u8) -> Result<&Joint<P>, ArmError> {
        let number = self.number();
        self.joints
            .get(index as usize)
            .ok_or(ArmError::IndexOutOfRange { index, number })
    }

    fn joint_mut(&mut self, index: u8) -> Result<&mut Joint<P>, ArmError> {
        let number = self.number();
        self.joints
            .get_mut(index as usize)
            .ok_or(ArmError::IndexOutOfRange { index, number })
    }

    /// Current angle of every joint, in index order
    pub fn angles(&self) -> impl Iterator<Item = f32> + '_ {
        self.joints.iter().map(|j| j.angle())
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Write every joint's current angle to its channel
    ///
    /// Call once after construction to drive the servos to their initial
    /// positions.
    pub fn start(&mut self) {
        for joint in self.joints.iter_mut() {
            let angle = joint.angle();
            joint.set_angle(angle);
        }
    }

    /// Move one joint immediately, without smoothing
    pub fn set_angle(&mut self, index: u8, angle: f32) -> Result<f32, ArmError> {
        Ok(self.joint_mut(index)?.set_angle(angle))
    }

    /// Replace one joint's limits
    pub fn set_limits(&mut self, index: u8, lower: f32, upper: f32) -> Result<(), ArmError> {
        let joint = self.joint_mut(index)?;
        let limits = AngleLimits::new(lower, upper, joint.datasheet().angle_range)
            .ok_or(ArmError::InvalidLimits)?;
        joint.set_limits(limits)
    }

    /// Replace one joint's datasheet
    pub fn set_datasheet(&mut self, index: u8, datasheet: ServoDatasheet) -> Result<(), ArmError> {
        self.joint_mut(index)?.set_datasheet(datasheet)
    }

    /// Smoothly move one joint
    ///
    /// Returns the number of steps the move took.
    pub fn move_one(&mut self, index: u8, angle: f32) -> Result<u32, ArmError> {
        self.move_one_with(index, angle, &mut NoHook)
    }

    pub fn move_one_with<H: StepHook>(
        &mut self,
        index: u8,
        angle: f32,
        hook: &mut H,
    ) -> Result<u32, ArmError> {
        let number = self.number();
        let Self { joints, delay } = self;
        let joint = joints
            .get_mut(index as usize)
            .ok_or(ArmError::IndexOutOfRange { index, number })?;
        Ok(smooth(joint, angle, delay, hook))
    }

    /// Smoothly move every joint named in `signal`, synchronized
    ///
    /// The whole signal is validated first: if any entry is rejected no
    /// joint moves. A single-entry signal runs as a plain single-joint
    /// move.
    pub fn move_many(&mut self, signal: &MotionSignal) -> Result<u32, ArmError> {
        self.move_many_with(signal, &mut NoHook)
    }

    pub fn move_many_with<H: StepHook>(
        &mut self,
        signal: &MotionSignal,
        hook: &mut H,
    ) -> Result<u32, ArmError> {
        let entries = signal.entries();
        let number = self.number();
        if entries.is_empty() {
            return Err(ArmError::EmptySignal);
        }
        if entries.len() > number {
            return Err(ArmError::TooManyEntries {
                requested: entries.len(),
                number,
            });
        }
        if let [SignalEntry { index, angle }] = entries {
            return self.move_one_with(*index, *angle, hook);
        }

        let indexes: Vec<u8, MAX_SIGNAL_ENTRIES> = signal.indexes().collect();
        let Self { joints, delay } = self;
        let picked = pick(joints, &indexes)?;

        let mut moves: Vec<SyncMove<'_, P>, MAX_JOINTS> = Vec::new();
        for (joint, angle) in picked.into_iter().zip(signal.angles()) {
            let _ = moves.push(SyncMove::new(joint, angle));
        }
        Ok(smooth_many(&mut moves, delay, hook))
    }

    /// Decode `text` as a motion signal and execute it
    ///
    /// A signal that fails to decode moves nothing, even if some of its
    /// entries were well formed.
    pub fn move_by_str(&mut self, text: &str) -> Result<u32, ArmError> {
        let signal = MotionSignal::parse(text)?;
        self.move_many(&signal)
    }

    /// Mutable references to the joints at `indexes`, in the order given
    pub fn pick_mut(&mut self, indexes: &[u8]) -> Result<Vec<&mut Joint<P>, MAX_JOINTS>, ArmError> {
        pick(&mut self.joints, indexes)
    }

    /// Block for `ms` milliseconds using the arm's delay
    pub fn pause_ms(&mut self, ms: u32) {
        if ms > 0 {
            self.delay.delay_ms(ms);
        }
    }
}

fn pick<'a, P>(
    joints: &'a mut [Joint<P>],
    indexes: &[u8],
) -> Result<Vec<&'a mut Joint<P>, MAX_JOINTS>, ArmError> {
    let number = joints.len();
    if indexes.len() > number {
        return Err(ArmError::TooManyEntries {
            requested: indexes.len(),
            number,
        });
    }
    for (position, &index) in indexes.iter().enumerate() {
        if index as usize >= number {
            return Err(ArmError::IndexOutOfRange { index, number });
        }
        if indexes[..position].contains(&index) {
            return Err(ArmError::DuplicateIndex { index });
        }
    }

    let mut slots: Vec<(usize, &'a mut Joint<P>), MAX_JOINTS> = Vec::new();
    for (i, joint) in joints.iter_mut().enumerate() {
        if let Some(position) = indexes.iter().position(|&index| index as usize == i) {
            let _ = slots.push((position, joint));
        }
    }
    slots.sort_unstable_by_key(|(position, _)| *position);

    let mut picked = Vec::new();
    for (_, joint) in slots {
        let _ = picked.push(joint);
    }
    Ok(picked)
}
