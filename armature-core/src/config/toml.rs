//! Simple TOML parser for arm configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! the arm configuration file. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float, boolean)
//! - `[section]` and `[section.name]` headers
//! - Arrays of strings, optionally spread over several lines
//! - Comments (# ...)
//!
//! Recognised sections:
//!
//! ```toml
//! [controller]
//! pause_ms = 100
//!
//! [servo.mg996r]          # optional, built-in models need no section
//! model = "mg996r"        # start from a preset, then override
//! angle_range = 180
//! period_us = 20000
//! min_duty_us = 500
//! max_duty_us = 2500
//!
//! [joint.base]            # joint index = order of appearance
//! pin = 16
//! servo = "mg996r"
//! angle = 90
//! lower = 0
//! upper = 180
//!
//! [bracket]
//! before = ["1 3 165"]
//! after = ["1 3 90"]
//!
//! [action.drop_a]
//! key = "a"
//! signals = ["3 0 90 1 65 2 145"]
//! bracketed = true
//! ```
//!
//! Unknown keys are ignored. Signal strings are decoded while parsing, so
//! a malformed signal is reported with its line number.

use armature_protocol::SignalError;
use heapless::Vec;

use super::arm::{ArmConfig, JointConfig, MAX_JOINTS};
use super::servo::ServoDatasheet;
use crate::routine::{Action, Label, Routine, RoutineError};

/// Maximum number of `[servo.*]` sections
const MAX_SERVOS: usize = 4;

/// Parse error with the 1-based line it was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseErrorKind {
    /// Invalid or unknown section header
    InvalidSection,
    /// Value has the wrong type or format
    InvalidValue,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Section name longer than a label
    LabelTooLong,
    /// Two sections with the same name
    DuplicateName,
    /// Joint references a servo that is neither defined nor built in
    UnknownServo,
    /// Action without a `key`
    MissingKey,
    /// Two actions bound to the same key
    DuplicateKey(char),
    /// Array still open at end of input
    UnterminatedArray,
    /// Signal string could not be decoded
    InvalidSignal(SignalError),
}

impl ParseError {
    fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Root,
    Controller,
    Servo(usize),
    Joint(usize),
    Bracket,
    Action,
}

/// Routine an open array writes into
#[derive(Debug, Clone, Copy, PartialEq)]
enum ArrayTarget {
    Before,
    After,
    Action,
}

/// Joint whose servo and defaults are resolved after all sections are read
struct JointDraft {
    config: JointConfig,
    servo: Option<Label>,
    angle: Option<f32>,
    lower: Option<f32>,
    upper: Option<f32>,
    line: usize,
}

struct Parser {
    config: ArmConfig,
    servos: Vec<(Label, ServoDatasheet), MAX_SERVOS>,
    joints: Vec<JointDraft, MAX_JOINTS>,
    section: Section,
    action: Option<(Action, usize, bool)>,
    array: Option<ArrayTarget>,
}

/// Parse TOML configuration into an `ArmConfig`
///
/// The result is not validated; call `ArmConfig::validate` before use.
pub fn parse_config(input: &str) -> Result<ArmConfig, ParseError> {
    let mut parser = Parser {
        config: ArmConfig::default(),
        servos: Vec::new(),
        joints: Vec::new(),
        section: Section::Root,
        action: None,
        array: None,
    };

    let mut last_line = 0;
    for (n, raw) in input.lines().enumerate() {
        let line_no = n + 1;
        last_line = line_no;
        let line = strip_comment(raw).trim();

        if let Some(target) = parser.array {
            if parser.array_items(target, line, line_no)? {
                parser.array = None;
            }
            continue;
        }

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            parser.save_section()?;
            parser.open_section(&line[1..line.len() - 1], line_no)?;
            continue;
        }

        let (key, value) = parse_key_value(line)
            .ok_or(ParseError::new(line_no, ParseErrorKind::InvalidValue))?;
        parser.apply_value(key, value, line_no)?;
    }

    if parser.array.is_some() {
        return Err(ParseError::new(last_line, ParseErrorKind::UnterminatedArray));
    }
    parser.save_section()?;
    parser.finish()
}

impl Parser {
    fn open_section(&mut self, header: &str, line: usize) -> Result<(), ParseError> {
        let (kind, name) = parse_section_header(header)
            .ok_or(ParseError::new(line, ParseErrorKind::InvalidSection))?;
        let label = || -> Result<Label, ParseError> {
            let name = name.ok_or(ParseError::new(line, ParseErrorKind::InvalidSection))?;
            Label::try_from(name).map_err(|_| ParseError::new(line, ParseErrorKind::LabelTooLong))
        };

        self.section = match kind {
            "controller" if name.is_none() => Section::Controller,
            "bracket" if name.is_none() => Section::Bracket,
            "servo" => {
                let label = label()?;
                if self.servos.iter().any(|(n, _)| *n == label) {
                    return Err(ParseError::new(line, ParseErrorKind::DuplicateName));
                }
                let datasheet = ServoDatasheet::preset(&label).unwrap_or_default();
                self.servos
                    .push((label, datasheet))
                    .map_err(|_| ParseError::new(line, ParseErrorKind::TooManyItems))?;
                Section::Servo(self.servos.len() - 1)
            }
            "joint" => {
                let label = label()?;
                if self.joints.iter().any(|j| j.config.name == label) {
                    return Err(ParseError::new(line, ParseErrorKind::DuplicateName));
                }
                let draft = JointDraft {
                    config: JointConfig {
                        name: label,
                        ..JointConfig::default()
                    },
                    servo: None,
                    angle: None,
                    lower: None,
                    upper: None,
                    line,
                };
                self.joints
                    .push(draft)
                    .map_err(|_| ParseError::new(line, ParseErrorKind::TooManyItems))?;
                Section::Joint(self.joints.len() - 1)
            }
            "action" => {
                let action = Action {
                    name: label()?,
                    key: '\0',
                    routine: Routine::new(),
                    bracketed: true,
                };
                self.action = Some((action, line, false));
                Section::Action
            }
            _ => return Err(ParseError::new(line, ParseErrorKind::InvalidSection)),
        };
        Ok(())
    }

    fn apply_value(&mut self, key: &str, value: &str, line: usize) -> Result<(), ParseError> {
        let invalid = ParseError::new(line, ParseErrorKind::InvalidValue);
        match self.section {
            Section::Root => {}
            Section::Controller => {
                if key == "pause_ms" {
                    self.config.controller.pause_ms = parse_int(value).ok_or(invalid)?;
                }
            }
            Section::Servo(i) => {
                let (_, ds) = &mut self.servos[i];
                match key {
                    "model" => {
                        let model = parse_string(value);
                        *ds = ServoDatasheet::preset(model).ok_or(invalid)?;
                    }
                    "angle_range" => ds.angle_range = parse_float(value).ok_or(invalid)?,
                    "period_us" => ds.period_us = parse_int(value).ok_or(invalid)?,
                    "min_duty_us" => ds.min_duty_us = parse_int(value).ok_or(invalid)?,
                    "max_duty_us" => ds.max_duty_us = parse_int(value).ok_or(invalid)?,
                    _ => {}
                }
            }
            Section::Joint(i) => {
                let draft = &mut self.joints[i];
                match key {
                    "pin" => draft.config.pin = parse_pin(value).ok_or(invalid)?,
                    "servo" => {
                        let servo = Label::try_from(parse_string(value))
                            .map_err(|_| ParseError::new(line, ParseErrorKind::LabelTooLong))?;
                        draft.servo = Some(servo);
                    }
                    "angle" => draft.angle = Some(parse_float(value).ok_or(invalid)?),
                    "lower" => draft.lower = Some(parse_float(value).ok_or(invalid)?),
                    "upper" => draft.upper = Some(parse_float(value).ok_or(invalid)?),
                    _ => {}
                }
            }
            Section::Bracket => match key {
                "before" => self.open_array(ArrayTarget::Before, value, line)?,
                "after" => self.open_array(ArrayTarget::After, value, line)?,
                _ => {}
            },
            Section::Action => match key {
                "key" => {
                    let (action, _, has_key) = self.action.as_mut().ok_or(invalid)?;
                    action.key = parse_key(value).ok_or(invalid)?;
                    *has_key = true;
                }
                "bracketed" => {
                    let (action, _, _) = self.action.as_mut().ok_or(invalid)?;
                    action.bracketed = parse_bool(value).ok_or(invalid)?;
                }
                "signals" => self.open_array(ArrayTarget::Action, value, line)?,
                _ => {}
            },
        }
        Ok(())
    }

    /// Start an array value; it stays open until its closing `]`
    fn open_array(&mut self, target: ArrayTarget, value: &str, line: usize) -> Result<(), ParseError> {
        let items = value
            .strip_prefix('[')
            .ok_or(ParseError::new(line, ParseErrorKind::InvalidValue))?;
        *self.routine_mut(target, line)? = Routine::new();
        if !self.array_items(target, items, line)? {
            self.array = Some(target);
        }
        Ok(())
    }

    /// Consume quoted signal strings from one line of an array
    ///
    /// Returns true once the closing bracket has been seen.
    fn array_items(&mut self, target: ArrayTarget, text: &str, line: usize) -> Result<bool, ParseError> {
        let invalid = ParseError::new(line, ParseErrorKind::InvalidValue);
        let mut rest = text;
        loop {
            rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',');
            if rest.is_empty() {
                return Ok(false);
            }
            if let Some(after) = rest.strip_prefix(']') {
                return if after.trim().is_empty() {
                    Ok(true)
                } else {
                    Err(invalid)
                };
            }
            let body = rest.strip_prefix('"').ok_or(invalid)?;
            let end = body.find('"').ok_or(invalid)?;
            self.routine_mut(target, line)?
                .push_str(&body[..end])
                .map_err(|e| match e {
                    RoutineError::Signal(e) => ParseError::new(line, ParseErrorKind::InvalidSignal(e)),
                    _ => ParseError::new(line, ParseErrorKind::TooManyItems),
                })?;
            rest = &body[end + 1..];
        }
    }

    fn routine_mut(&mut self, target: ArrayTarget, line: usize) -> Result<&mut Routine, ParseError> {
        match target {
            ArrayTarget::Before => Ok(&mut self.config.routines.before),
            ArrayTarget::After => Ok(&mut self.config.routines.after),
            ArrayTarget::Action => self
                .action
                .as_mut()
                .map(|(action, _, _)| &mut action.routine)
                .ok_or(ParseError::new(line, ParseErrorKind::InvalidSection)),
        }
    }

    fn save_section(&mut self) -> Result<(), ParseError> {
        if let Some((action, line, has_key)) = self.action.take() {
            if !has_key {
                return Err(ParseError::new(line, ParseErrorKind::MissingKey));
            }
            self.config.routines.add(action).map_err(|e| {
                let kind = match e {
                    RoutineError::DuplicateKey(key) => ParseErrorKind::DuplicateKey(key),
                    _ => ParseErrorKind::TooManyItems,
                };
                ParseError::new(line, kind)
            })?;
        }
        Ok(())
    }

    /// Resolve servo references and fill in joint defaults
    fn finish(mut self) -> Result<ArmConfig, ParseError> {
        for draft in self.joints {
            let datasheet = match &draft.servo {
                None => ServoDatasheet::default(),
                Some(name) => self
                    .servos
                    .iter()
                    .find(|(n, _)| n == name)
                    .map(|(_, ds)| *ds)
                    .or_else(|| ServoDatasheet::preset(name))
                    .ok_or(ParseError::new(draft.line, ParseErrorKind::UnknownServo))?,
            };
            let mut joint = draft.config;
            joint.datasheet = datasheet;
            joint.lower = draft.lower.unwrap_or(0.0);
            joint.upper = draft.upper.unwrap_or(datasheet.angle_range);
            joint.angle = draft.angle.unwrap_or(datasheet.center());
            self.config
                .joints
                .push(joint)
                .map_err(|_| ParseError::new(draft.line, ParseErrorKind::TooManyItems))?;
        }
        Ok(self.config)
    }
}

/// Split a header like "joint.base" into ("joint", Some("base"))
fn parse_section_header(header: &str) -> Option<(&str, Option<&str>)> {
    let header = header.trim();
    let mut parts = header.splitn(2, '.');
    let kind = parts.next()?.trim();
    if kind.is_empty() {
        return None;
    }
    match parts.next().map(str::trim) {
        None => Some((kind, None)),
        Some(name) if !name.is_empty() && !name.contains('.') => Some((kind, Some(name))),
        Some(_) => None,
    }
}

/// Cut a trailing comment, leaving `#` inside strings alone
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Option<T> {
    value.parse().ok()
}

fn parse_float(value: &str) -> Option<f32> {
    value.parse::<f32>().ok().filter(|v| v.is_finite())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parse a pin as `16` or `"gpio16"`
fn parse_pin(value: &str) -> Option<u8> {
    let value = parse_string(value);
    let number = value.strip_prefix("gpio").unwrap_or(value);
    number.parse().ok()
}

/// Parse a single-letter action key, lowercased
fn parse_key(value: &str) -> Option<char> {
    let mut chars = parse_string(value).chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_lowercase()),
        _ => None,
    }
}
