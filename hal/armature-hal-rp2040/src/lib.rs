//! RP2040-specific HAL for the servo arm firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `armature-hal` traits:
//!
//! - Servo PWM outputs on the hardware PWM slices
//! - PWM slot lookup (which slice and channel a GPIO drives)
//! - Busy-wait delay for the blocking motion loop

#![no_std]

pub mod delay;
pub mod pins;
pub mod pwm;

// Re-export shared traits from armature-hal for convenience
pub use armature_hal::{BlockingDelay, PwmChannel};

pub use delay::BusyDelay;
pub use pins::{pwm_slot, PwmHalf, PwmSlot};
pub use pwm::{servo_pair, servo_slice_config, ServoChannel};
