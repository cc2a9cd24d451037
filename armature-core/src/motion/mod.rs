//! Motion generation
//!
//! Converts angles to PWM levels and turns a target angle into a sequence
//! of eased intermediate commands, either for one joint or for several
//! joints sharing one timeline.

pub mod duty;
pub mod easing;
pub mod smoother;
pub mod sync;

pub use duty::{duty_level, duty_us};
pub use easing::{calculate_smooth_ratio, calculate_steps, MAX_MOVE_MS};
pub use smoother::smooth;
pub use sync::{smooth_many, SyncMove};
