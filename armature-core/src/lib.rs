//! Board-agnostic motion core for the servo arm firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Angle to PWM level mapping with limit clamping
//! - Step count and cosine easing for smooth moves
//! - Single-joint smoothing and multi-joint synchronized moves
//! - The arm aggregate that validates and routes move requests
//! - Routines (named signal sequences bound to console keys)
//! - Configuration types and the TOML-subset config parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod arm;
pub mod config;
pub mod error;
pub mod joint;
pub mod motion;
pub mod routine;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use arm::Arm;
pub use error::ArmError;
pub use joint::Joint;
