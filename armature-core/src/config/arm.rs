//! Arm configuration

use armature_protocol::MAX_SIGNAL_ENTRIES;
use heapless::Vec;

use super::servo::ServoDatasheet;
use crate::routine::{Action, Label, Routine, RoutineError, RoutineSet};

/// Maximum number of joints on one arm
pub const MAX_JOINTS: usize = MAX_SIGNAL_ENTRIES;

/// Pause between consecutive routine signals
pub const DEFAULT_PAUSE_MS: u32 = 100;

/// Controller-wide settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// Pause after each signal of a routine, in milliseconds
    pub pause_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            pause_ms: DEFAULT_PAUSE_MS,
        }
    }
}

/// One joint as described in the configuration
#[derive(Debug, Clone, PartialEq)]
pub struct JointConfig {
    pub name: Label,
    /// GPIO the servo signal wire is attached to
    pub pin: u8,
    pub datasheet: ServoDatasheet,
    /// Initial angle, written on startup
    pub angle: f32,
    pub lower: f32,
    pub upper: f32,
}

impl Default for JointConfig {
    fn default() -> Self {
        let datasheet = ServoDatasheet::default();
        Self {
            name: Label::new(),
            pin: 0,
            datasheet,
            angle: datasheet.center(),
            lower: 0.0,
            upper: datasheet.angle_range,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No joints defined
    NoJoints,
    /// Datasheet of joint N fails validation
    InvalidDatasheet { joint: usize },
    /// Limits of joint N outside `0 <= lower <= upper <= range`
    InvalidLimits { joint: usize },
    /// Initial angle of joint N outside its limits
    AngleOutOfLimits { joint: usize },
    /// Two joints on the same pin
    DuplicatePin { pin: u8 },
    /// Action with no signals
    EmptyAction { key: char },
    /// A routine references a joint that does not exist
    IndexOutOfRange { index: u8, joints: usize },
    /// More joints than the board has servo outputs
    TooManyJoints { joints: usize, outputs: usize },
}

/// Complete arm configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArmConfig {
    pub controller: ControllerConfig,
    /// Joints in index order
    pub joints: Vec<JointConfig, MAX_JOINTS>,
    pub routines: RoutineSet,
}

impl ArmConfig {
    /// Check the configuration can drive an arm
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.joints.is_empty() {
            return Err(ConfigError::NoJoints);
        }

        for (i, joint) in self.joints.iter().enumerate() {
            if !joint.datasheet.is_valid() {
                return Err(ConfigError::InvalidDatasheet { joint: i });
            }
            let limits_ok = joint.lower.is_finite()
                && joint.upper.is_finite()
                && joint.lower >= 0.0
                && joint.lower <= joint.upper
                && joint.upper <= joint.datasheet.angle_range;
            if !limits_ok {
                return Err(ConfigError::InvalidLimits { joint: i });
            }
            if !(joint.angle >= joint.lower && joint.angle <= joint.upper) {
                return Err(ConfigError::AngleOutOfLimits { joint: i });
            }
            if self.joints[..i].iter().any(|j| j.pin == joint.pin) {
                return Err(ConfigError::DuplicatePin { pin: joint.pin });
            }
        }

        for action in self.routines.actions() {
            if action.routine.is_empty() {
                return Err(ConfigError::EmptyAction { key: action.key });
            }
        }

        let joints = self.joints.len();
        match self.routines.max_index() {
            Some(index) if index as usize >= joints => {
                Err(ConfigError::IndexOutOfRange { index, joints })
            }
            _ => Ok(()),
        }
    }

    /// `validate`, plus a check that every joint gets one of `outputs`
    /// wired servo outputs
    pub fn validate_for_outputs(&self, outputs: usize) -> Result<(), ConfigError> {
        let joints = self.joints.len();
        if joints > outputs {
            return Err(ConfigError::TooManyJoints { joints, outputs });
        }
        self.validate()
    }

    /// Built-in four-joint MG996R arm on GPIO16-19
    ///
    /// Used when no valid configuration file is available. Joint 1 (the
    /// shoulder) stops 3 degrees short of each end stop.
    pub fn four_axis() -> Self {
        let mut joints = Vec::new();
        for (i, name) in ["base", "shoulder", "elbow", "gripper"].iter().enumerate() {
            let (lower, upper) = if i == 1 { (3.0, 177.0) } else { (0.0, 180.0) };
            let _ = joints.push(JointConfig {
                name: Label::try_from(*name).unwrap_or_default(),
                pin: 16 + i as u8,
                datasheet: ServoDatasheet::MG996R,
                angle: 90.0,
                lower,
                upper,
            });
        }
        Self {
            controller: ControllerConfig::default(),
            joints,
            routines: four_axis_routines().unwrap_or_default(),
        }
    }
}

fn four_axis_routines() -> Result<RoutineSet, RoutineError> {
    let mut set = RoutineSet::new();
    set.before = Routine::from_texts(&["3 0 150 1 40 2 126", "1 3 165", "1 1 90", "1 0 90"])?;
    set.after = Routine::from_texts(&["1 3 90", "3 0 90 1 90 2 90"])?;

    let presets: [(&str, char, &str, bool); 5] = [
        ("drop_a", 'a', "3 0 90 1 65 2 145", true),
        ("drop_m", 'm', "3 0 85 1 25 2 47", true),
        ("drop_g", 'g', "3 0 36 1 65 2 140", true),
        ("drop_p", 'p', "3 0 51 1 30 2 40", true),
        ("reset", 'r', "4 0 90 1 90 2 90 3 90", false),
    ];
    for (name, key, text, bracketed) in presets {
        set.add(Action {
            name: Label::try_from(name).unwrap_or_default(),
            key,
            routine: Routine::from_texts(&[text])?,
            bracketed,
        })?;
    }
    Ok(set)
}
