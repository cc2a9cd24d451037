//! Hardware and observer traits used by the motion core
//!
//! The PWM and delay traits live in `armature-hal` so chip crates can
//! implement them without depending on the core.

pub mod hook;

pub use armature_hal::{BlockingDelay, PwmChannel};
pub use hook::{NoHook, StepHook};
