//! Arm error types

use armature_protocol::SignalError;

/// Errors reported by the arm aggregate
///
/// Every variant is detected before any joint moves, so a rejected
/// request leaves all joint angles untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArmError {
    /// Joint index is not below the number of joints
    IndexOutOfRange { index: u8, number: usize },
    /// Signal has no entries
    EmptySignal,
    /// Signal has more entries than the arm has joints
    TooManyEntries { requested: usize, number: usize },
    /// The same joint was requested twice
    DuplicateIndex { index: u8 },
    /// More joints than the arm can hold
    Capacity { requested: usize, max: usize },
    /// An arm needs at least one joint
    NoJoints,
    /// PWM channel count does not match the joint configuration
    ChannelCount { expected: usize, provided: usize },
    /// Limits outside `0 <= lower <= upper <= angle_range`
    InvalidLimits,
    /// Datasheet fails validation
    InvalidDatasheet,
    /// Signal text could not be decoded
    Signal(SignalError),
}

impl From<SignalError> for ArmError {
    fn from(e: SignalError) -> Self {
        ArmError::Signal(e)
    }
}
