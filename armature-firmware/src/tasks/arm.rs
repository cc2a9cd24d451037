//! Arm task
//!
//! Owns the arm and executes console commands one at a time. Moves are
//! blocking: the executor is held for the whole move, which keeps the
//! step timing exact. Bytes arriving meanwhile wait in the UART buffer.

use core::fmt::Write;

use defmt::*;
use heapless::Vec;

use armature_core::config::ArmConfig;
use armature_core::routine::RoutineError;
use armature_core::Arm;
use armature_hal_rp2040::{BusyDelay, ServoChannel};
use armature_protocol::Command;

use crate::board::SERVO_COUNT;
use crate::channels::{reply, reply_str, Reply, COMMAND_CHANNEL};

/// Arm as wired on this board
pub type BoardArm = Arm<ServoChannel<'static>, BusyDelay>;

/// Arm task - executes motion commands
#[embassy_executor::task]
pub async fn arm_task(
    config: &'static ArmConfig,
    channels: Vec<ServoChannel<'static>, SERVO_COUNT>,
) {
    info!("Arm task started");

    let mut arm: BoardArm = match Arm::from_config(config, channels, BusyDelay) {
        Ok(arm) => arm,
        Err(e) => {
            error!("Cannot build arm: {:?}", e);
            reply_str("err arm unavailable");
            // Keep draining commands so the console does not stall
            loop {
                let _ = COMMAND_CHANNEL.receive().await;
                reply_str("err arm unavailable");
            }
        }
    };

    arm.start();
    info!("Arm ready: {} joints at initial angles", arm.number());
    reply_str("ready");

    loop {
        let command = COMMAND_CHANNEL.receive().await;
        execute(&mut arm, config, command);
    }
}

fn execute(arm: &mut BoardArm, config: &ArmConfig, command: Command) {
    match command {
        Command::Move(signal) => match arm.move_many(&signal) {
            Ok(steps) => {
                debug!("Moved {} joints in {} steps", signal.len(), steps);
                reply_str("ok");
            }
            Err(e) => {
                warn!("Move rejected: {:?}", e);
                let mut text = Reply::new();
                let _ = write!(text, "err {:?}", e);
                reply(text);
            }
        },
        Command::Action(key) => {
            info!("Running action '{}'", key);
            match config.routines.run(key, arm, config.controller.pause_ms) {
                Ok(()) => reply_str("ok"),
                Err(RoutineError::UnknownKey(key)) => {
                    warn!("No action bound to '{}'", key);
                    let mut text = Reply::new();
                    let _ = write!(text, "err no action '{}'", key);
                    reply(text);
                }
                Err(e) => {
                    warn!("Action '{}' stopped: {:?}", key, e);
                    let mut text = Reply::new();
                    let _ = write!(text, "err {:?}", e);
                    reply(text);
                }
            }
        }
        Command::Status => report_status(arm),
        Command::Help => report_help(config),
    }
}

/// One line per joint: index, angle, limits
fn report_status(arm: &BoardArm) {
    for (i, joint) in arm.joints().iter().enumerate() {
        let limits = joint.limits();
        let mut text = Reply::new();
        let _ = write!(
            text,
            "joint {} angle {:.1} limits {:.1}..{:.1}",
            i,
            joint.angle(),
            limits.lower(),
            limits.upper()
        );
        reply(text);
    }
}

fn report_help(config: &ArmConfig) {
    reply_str("<count> <index> <angle> ... move joints");
    reply_str("status  show joint angles");
    for action in config.routines.actions() {
        let mut text = Reply::new();
        let _ = write!(text, "{}  {}", action.key, action.name.as_str());
        reply(text);
    }
}
