//! Configuration loading
//!
//! The arm description is compiled in from `arm.toml` (validated by the
//! build script) and parsed at startup with the no_std parser from
//! `armature-core`. Any parse or validation failure, including more joints
//! than the board has servo outputs, falls back to the built-in four-joint
//! arm so the board always comes up.

use defmt::*;

use armature_core::config::toml::parse_config;
use armature_core::config::ArmConfig;

/// Parse and validate the embedded configuration for a board with
/// `outputs` servo outputs
pub fn load(text: &str, outputs: usize) -> ArmConfig {
    let config = match parse_config(text) {
        Ok(config) => config,
        Err(e) => {
            error!(
                "arm.toml line {}: {:?}, using built-in arm",
                e.line, e.kind
            );
            return ArmConfig::four_axis();
        }
    };

    if let Err(e) = config.validate_for_outputs(outputs) {
        error!("arm.toml rejected: {:?}, using built-in arm", e);
        return ArmConfig::four_axis();
    }

    info!(
        "Loaded arm.toml: {} joints, {} actions, pause {}ms",
        config.joints.len(),
        config.routines.actions().len(),
        config.controller.pause_ms
    );
    config
}
