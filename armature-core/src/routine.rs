//! Routines and key-bound actions
//!
//! A routine is an ordered list of motion signals run one after another
//! with a pause between them. An action binds a routine to a console key
//! and may be wrapped by the shared "before" and "after" routines, e.g.
//! pick up an object, run the action's moves, then return home.

use armature_hal::{BlockingDelay, PwmChannel};
use armature_protocol::{MotionSignal, SignalError};
use heapless::{String, Vec};

use crate::arm::Arm;
use crate::error::ArmError;

/// Maximum signals in one routine
pub const MAX_ROUTINE_SIGNALS: usize = 8;

/// Maximum number of actions
pub const MAX_ACTIONS: usize = 8;

/// Maximum length of a joint or action name
pub const MAX_LABEL_LEN: usize = 16;

/// Short name used for joints, servos and actions
pub type Label = String<MAX_LABEL_LEN>;

/// Routine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RoutineError {
    /// No action is bound to this key
    UnknownKey(char),
    /// Two actions share a key
    DuplicateKey(char),
    /// Action table is full
    TooManyActions,
    /// Routine signal list is full
    TooManySignals,
    /// A routine signal could not be decoded
    Signal(SignalError),
    /// The arm rejected a signal
    Arm(ArmError),
}

impl From<ArmError> for RoutineError {
    fn from(e: ArmError) -> Self {
        RoutineError::Arm(e)
    }
}

impl From<SignalError> for RoutineError {
    fn from(e: SignalError) -> Self {
        RoutineError::Signal(e)
    }
}

/// Ordered list of signals
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Routine {
    signals: Vec<MotionSignal, MAX_ROUTINE_SIGNALS>,
}

impl Routine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a routine from signal texts
    pub fn from_texts(texts: &[&str]) -> Result<Self, RoutineError> {
        let mut routine = Self::new();
        for text in texts {
            routine.push_str(text)?;
        }
        Ok(routine)
    }

    pub fn push(&mut self, signal: MotionSignal) -> Result<(), RoutineError> {
        self.signals
            .push(signal)
            .map_err(|_| RoutineError::TooManySignals)
    }

    /// Decode and append a signal
    pub fn push_str(&mut self, text: &str) -> Result<(), RoutineError> {
        self.push(MotionSignal::parse(text)?)
    }

    pub fn signals(&self) -> &[MotionSignal] {
        &self.signals
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Highest joint index referenced by any signal
    pub fn max_index(&self) -> Option<u8> {
        self.signals.iter().filter_map(|s| s.max_index()).max()
    }

    /// Run every signal in order, pausing `pause_ms` after each
    ///
    /// Stops at the first signal the arm rejects.
    pub fn run<P, D>(&self, arm: &mut Arm<P, D>, pause_ms: u32) -> Result<(), ArmError>
    where
        P: PwmChannel,
        D: BlockingDelay,
    {
        for signal in self.signals.iter() {
            arm.move_many(signal)?;
            arm.pause_ms(pause_ms);
        }
        Ok(())
    }
}

/// A routine bound to a console key
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub name: Label,
    pub key: char,
    pub routine: Routine,
    /// Wrap with the shared before/after routines
    pub bracketed: bool,
}

/// All routines known to the arm
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoutineSet {
    /// Runs before every bracketed action
    pub before: Routine,
    /// Runs after every bracketed action
    pub after: Routine,
    actions: Vec<Action, MAX_ACTIONS>,
}

impl RoutineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action; keys are matched case-insensitively
    pub fn add(&mut self, mut action: Action) -> Result<(), RoutineError> {
        action.key = action.key.to_ascii_lowercase();
        if self.find(action.key).is_some() {
            return Err(RoutineError::DuplicateKey(action.key));
        }
        self.actions
            .push(action)
            .map_err(|_| RoutineError::TooManyActions)
    }

    pub fn find(&self, key: char) -> Option<&Action> {
        self.actions.iter().find(|a| a.key.eq_ignore_ascii_case(&key))
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Highest joint index referenced by any routine
    pub fn max_index(&self) -> Option<u8> {
        let shared = self.before.max_index().max(self.after.max_index());
        self.actions
            .iter()
            .filter_map(|a| a.routine.max_index())
            .max()
            .max(shared)
    }

    /// Run the action bound to `key`
    ///
    /// The key is resolved before anything moves, so an unknown key
    /// leaves the arm untouched.
    pub fn run<P, D>(&self, key: char, arm: &mut Arm<P, D>, pause_ms: u32) -> Result<(), RoutineError>
    where
        P: PwmChannel,
        D: BlockingDelay,
    {
        let action = self.find(key).ok_or(RoutineError::UnknownKey(key))?;
        if action.bracketed {
            self.before.run(arm, pause_ms)?;
        }
        action.routine.run(arm, pause_ms)?;
        if action.bracketed {
            self.after.run(arm, pause_ms)?;
        }
        Ok(())
    }
}
