//! Board wiring
//!
//! Servo signal wires go to GPIO16-19. On the RP2040 these map to PWM
//! slice 0 (GPIO16/17) and slice 1 (GPIO18/19), so joints 0/1 and 2/3
//! share a counter and therefore a PWM period.

use defmt::*;
use embassy_rp::peripherals::{PIN_16, PIN_17, PIN_18, PIN_19, PWM_SLICE0, PWM_SLICE1};
use embassy_rp::Peri;
use heapless::Vec;

use armature_core::config::{ArmConfig, ServoDatasheet};
use armature_hal_rp2040::{pwm_slot, servo_pair, ServoChannel};

/// Number of servo outputs wired on the board
pub const SERVO_COUNT: usize = 4;

/// GPIO of each servo output, in joint order
pub const SERVO_PINS: [u8; SERVO_COUNT] = [16, 17, 18, 19];

/// Peripherals reserved for the servo outputs
pub struct ServoPeripherals {
    pub slice0: Peri<'static, PWM_SLICE0>,
    pub pin16: Peri<'static, PIN_16>,
    pub pin17: Peri<'static, PIN_17>,
    pub slice1: Peri<'static, PWM_SLICE1>,
    pub pin18: Peri<'static, PIN_18>,
    pub pin19: Peri<'static, PIN_19>,
}

/// Configure the PWM slices and return one channel per configured joint
///
/// Slice periods come from the first joint on each slice. The loaded
/// config never has more joints than `SERVO_COUNT`.
pub fn servo_channels(p: ServoPeripherals, config: &ArmConfig) -> Vec<ServoChannel<'static>, SERVO_COUNT> {
    check_wiring(config);

    let mut channels = Vec::new();
    let wanted = config.joints.len().min(SERVO_COUNT);

    let period0 = slice_period(config, 0);
    if let Some((a, b)) = servo_pair(p.slice0, p.pin16, p.pin17, period0) {
        let _ = channels.push(a);
        let _ = channels.push(b);
    } else {
        error!("PWM slice 0 did not provide both outputs");
    }

    let period1 = slice_period(config, 2);
    if let Some((a, b)) = servo_pair(p.slice1, p.pin18, p.pin19, period1) {
        let _ = channels.push(a);
        let _ = channels.push(b);
    } else {
        error!("PWM slice 1 did not provide both outputs");
    }

    channels.truncate(wanted);
    info!(
        "Servo PWM ready: {} outputs, periods {}us / {}us",
        channels.len(),
        period0,
        period1
    );
    channels
}

/// Period for the slice whose channel A drives joint `first`
///
/// Warns when the joint on channel B wants a different period, since the
/// hardware cannot honour both.
fn slice_period(config: &ArmConfig, first: usize) -> u32 {
    let period_of = |i: usize| config.joints.get(i).map(|j| j.datasheet.period_us);
    let period = period_of(first).unwrap_or(ServoDatasheet::default().period_us);
    if let Some(other) = period_of(first + 1) {
        if other != period {
            warn!(
                "Joints {} and {} share a PWM slice but want {}us and {}us, using {}us",
                first,
                first + 1,
                period,
                other,
                period
            );
        }
    }
    period
}

/// Warn about configured pins that differ from the board wiring
fn check_wiring(config: &ArmConfig) {
    if config.joints.len() > SERVO_COUNT {
        warn!(
            "{} joints configured but only {} servo outputs wired",
            config.joints.len(),
            SERVO_COUNT
        );
    }
    for (i, (joint, &wired)) in config.joints.iter().zip(SERVO_PINS.iter()).enumerate() {
        if joint.pin != wired {
            let slot = pwm_slot(wired);
            warn!(
                "Joint {} ({}) configured on GPIO{} but wired to GPIO{} ({:?})",
                i,
                joint.name.as_str(),
                joint.pin,
                wired,
                slot
            );
        }
    }
}
