//! Armature Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs. The motion core only ever talks to these traits,
//! so the same motion code drives real PWM slices on the target and
//! recording fakes on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (armature-firmware)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  armature-core (motion, arm, routines)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  armature-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  armature-hal-rp2040                    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`pwm::PwmChannel`] - One servo signal output
//! - [`delay::BlockingDelay`] - Microsecond-resolution blocking wait

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod pwm;

// Re-export key items at crate root for convenience
pub use delay::BlockingDelay;
pub use pwm::{clock_divider, PwmChannel, PWM_WRAP};
