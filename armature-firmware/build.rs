//! Build script for armature-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates arm.toml at compile time

use std::collections::HashSet;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Servo models the firmware knows without a [servo.*] section
const BUILTIN_SERVOS: [&str; 2] = ["mg996r", "sg90"];

/// Highest GPIO number on the RP2040
const MAX_GPIO: i64 = 29;

/// Servo outputs wired on the board, see `board::SERVO_COUNT`
const SERVO_OUTPUTS: usize = 4;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate arm.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=arm.toml");

    let config_path = Path::new("arm.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: arm.toml not found!                                      ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds an arm.toml configuration file.             ║\n\
            ║  Please create one in the armature-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read arm.toml                                  ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in arm.toml                          ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let joint_count = validate_joints(&config);
    validate_routines(&config, joint_count);

    println!("cargo:warning=arm.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Abort the build with a list of problems
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Read a number that may be written as an integer or a float
fn as_number(value: &toml::Value) -> Option<f64> {
    match value {
        toml::Value::Integer(i) => Some(*i as f64),
        toml::Value::Float(f) => Some(*f),
        _ => None,
    }
}

/// Validate joint sections, returning the number of joints
fn validate_joints(config: &toml::Value) -> usize {
    let joints = match config.get("joint") {
        Some(toml::Value::Table(t)) if !t.is_empty() => t,
        _ => fail(
            "Invalid joint configuration",
            &["Missing [joint.*] section - at least one joint is required".to_string()],
        ),
    };

    let servos: Vec<String> = config
        .get("servo")
        .and_then(|s| s.as_table())
        .map(|t| t.keys().cloned().collect())
        .unwrap_or_default();

    let mut errors = Vec::new();
    let mut pins = HashSet::new();

    if joints.len() > SERVO_OUTPUTS {
        errors.push(format!(
            "{} joints defined, the board wires {} servo outputs",
            joints.len(),
            SERVO_OUTPUTS
        ));
    }

    for (name, joint) in joints {
        let joint = match joint {
            toml::Value::Table(t) => t,
            _ => {
                errors.push(format!("[joint.{}] must be a table", name));
                continue;
            }
        };

        match joint.get("pin") {
            Some(toml::Value::Integer(pin)) if (0..=MAX_GPIO).contains(pin) => {
                if !pins.insert(*pin) {
                    errors.push(format!("[joint.{}] pin {} already used", name, pin));
                }
            }
            Some(_) => errors.push(format!("[joint.{}] pin must be 0-{}", name, MAX_GPIO)),
            None => errors.push(format!("[joint.{}] missing 'pin'", name)),
        }

        if let Some(toml::Value::String(servo)) = joint.get("servo") {
            let known = servos.contains(servo)
                || BUILTIN_SERVOS.contains(&servo.to_ascii_lowercase().as_str());
            if !known {
                errors.push(format!("[joint.{}] references unknown servo '{}'", name, servo));
            }
        }

        let lower = joint.get("lower").and_then(as_number).unwrap_or(0.0);
        let upper = joint.get("upper").and_then(as_number).unwrap_or(180.0);
        if lower < 0.0 || lower > upper {
            errors.push(format!("[joint.{}] needs 0 <= lower <= upper", name));
        }
        if let Some(angle) = joint.get("angle").and_then(as_number) {
            if angle < lower || angle > upper {
                errors.push(format!("[joint.{}] angle must be within lower..upper", name));
            }
        }
    }

    if !errors.is_empty() {
        fail("Invalid joint configuration", &errors);
    }
    joints.len()
}

/// Validate bracket and action signal lists
fn validate_routines(config: &toml::Value, joint_count: usize) {
    let mut errors = Vec::new();

    if let Some(bracket) = config.get("bracket").and_then(|b| b.as_table()) {
        for key in ["before", "after"] {
            if let Some(signals) = bracket.get(key) {
                check_signals(&format!("[bracket].{}", key), signals, joint_count, true, &mut errors);
            }
        }
    }

    let mut keys = HashSet::new();
    if let Some(actions) = config.get("action").and_then(|a| a.as_table()) {
        for (name, action) in actions {
            match action.get("key") {
                Some(toml::Value::String(key)) if key.chars().count() == 1 => {
                    let key = key.to_ascii_lowercase();
                    if !key.chars().all(|c| c.is_ascii_alphabetic()) {
                        errors.push(format!("[action.{}] key must be a letter", name));
                    } else if !keys.insert(key.clone()) {
                        errors.push(format!("[action.{}] key '{}' already used", name, key));
                    }
                }
                Some(_) => errors.push(format!("[action.{}] key must be one letter", name)),
                None => errors.push(format!("[action.{}] missing 'key'", name)),
            }

            match action.get("signals") {
                Some(signals) => {
                    check_signals(&format!("[action.{}]", name), signals, joint_count, false, &mut errors)
                }
                None => errors.push(format!("[action.{}] missing 'signals'", name)),
            }
        }
    }

    if !errors.is_empty() {
        fail("Invalid routine configuration", &errors);
    }
}

/// Check a signal array: "<count> <index> <angle> ..."
fn check_signals(
    context: &str,
    signals: &toml::Value,
    joint_count: usize,
    allow_empty: bool,
    errors: &mut Vec<String>,
) {
    let signals = match signals.as_array() {
        Some(a) if allow_empty || !a.is_empty() => a,
        Some(_) => {
            errors.push(format!("{} signals cannot be empty", context));
            return;
        }
        None => {
            errors.push(format!("{} signals must be an array", context));
            return;
        }
    };

    for (i, signal) in signals.iter().enumerate() {
        let text = match signal.as_str() {
            Some(s) => s,
            None => {
                errors.push(format!("{} signal {} must be a string", context, i));
                continue;
            }
        };
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let count: usize = match tokens.first().and_then(|t| t.parse().ok()) {
            Some(n) if n > 0 => n,
            _ => {
                errors.push(format!("{} signal {} needs a positive count", context, i));
                continue;
            }
        };
        if tokens.len() != 1 + 2 * count {
            errors.push(format!("{} signal {} declares {} entries", context, i, count));
            continue;
        }
        for pair in tokens[1..].chunks(2) {
            match pair[0].parse::<usize>() {
                Ok(index) if index < joint_count => {}
                _ => errors.push(format!("{} signal {} bad joint '{}'", context, i, pair[0])),
            }
            if pair[1].parse::<f32>().map(|a| !a.is_finite()).unwrap_or(true) {
                errors.push(format!("{} signal {} bad angle '{}'", context, i, pair[1]));
            }
        }
    }
}
