//! Armature control-signal protocol
//!
//! This crate defines the text protocol used to command a servo arm over a
//! serial console. The protocol is designed to be typed by hand or sent by
//! a host program one line at a time.
//!
//! # Protocol Overview
//!
//! A motion signal moves one or more joints together:
//! ```text
//! <count> <index_0> <angle_0> <index_1> <angle_1> ... <index_n> <angle_n>
//!
//! 3 0 90 1 65 2 145     joints 0, 1 and 2 to 90°, 65° and 145°
//! 1 3 165               joint 3 alone to 165°
//! ```
//!
//! Console lines are newline-terminated. Besides raw signals the console
//! accepts single-character action keys and a few words (`status`, `help`).

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod line;
pub mod signal;

pub use command::{Command, CommandError};
pub use line::{Line, LineError, LineParser, MAX_LINE_LEN};
pub use signal::{MotionSignal, SignalEntry, SignalError, MAX_SIGNAL_ENTRIES};
