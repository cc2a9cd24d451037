//! Configuration types
//!
//! Board-agnostic arm description loaded from a TOML file at startup,
//! with a built-in four-joint fallback.

pub mod arm;
pub mod servo;
pub mod toml;

pub use arm::*;
pub use servo::*;
