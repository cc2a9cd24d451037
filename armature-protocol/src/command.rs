//! Console commands
//!
//! Each console line is one command:
//! - a line starting with a digit is a raw [`MotionSignal`]
//! - a single character is an action key (case-insensitive)
//! - `status` reports joint angles, `help` lists the action keys

use crate::signal::{MotionSignal, SignalError};

/// Commands parsed from console lines
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Move joints together to the given angles
    Move(MotionSignal),
    /// Run the action bound to a key (always lowercase)
    Action(char),
    /// Report every joint angle
    Status,
    /// List available action keys
    Help,
}

/// Errors that can occur while parsing a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Line looked like a signal but did not decode
    Signal(SignalError),
    /// Line matches no command
    Unknown,
}

impl From<SignalError> for CommandError {
    fn from(e: SignalError) -> Self {
        CommandError::Signal(e)
    }
}

impl Command {
    /// Parse a command from a console line
    ///
    /// Returns `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        if line.starts_with(|c: char| c.is_ascii_digit()) {
            return Ok(Some(Command::Move(MotionSignal::parse(line)?)));
        }

        if line.eq_ignore_ascii_case("status") {
            return Ok(Some(Command::Status));
        }
        if line.eq_ignore_ascii_case("help") || line == "?" {
            return Ok(Some(Command::Help));
        }

        let mut chars = line.chars();
        match (chars.next(), chars.next()) {
            (Some(key), None) if key.is_ascii_alphabetic() => {
                Ok(Some(Command::Action(key.to_ascii_lowercase())))
            }
            _ => Err(CommandError::Unknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(Command::parse("  \t"), Ok(None));
    }

    #[test]
    fn test_signal_line() {
        let cmd = Command::parse("3 0 90 1 65 2 145").unwrap().unwrap();
        match cmd {
            Command::Move(signal) => assert_eq!(signal.len(), 3),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_signal_line() {
        assert_eq!(
            Command::parse("2 0 90"),
            Err(CommandError::Signal(SignalError::MissingIndex { entry: 1 }))
        );
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(Command::parse("a"), Ok(Some(Command::Action('a'))));
        assert_eq!(Command::parse("R"), Ok(Some(Command::Action('r'))));
        assert_eq!(Command::parse(" m \r"), Ok(Some(Command::Action('m'))));
    }

    #[test]
    fn test_words() {
        assert_eq!(Command::parse("status"), Ok(Some(Command::Status)));
        assert_eq!(Command::parse("STATUS"), Ok(Some(Command::Status)));
        assert_eq!(Command::parse("help"), Ok(Some(Command::Help)));
        assert_eq!(Command::parse("?"), Ok(Some(Command::Help)));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(Command::parse("dance"), Err(CommandError::Unknown));
        assert_eq!(Command::parse("#"), Err(CommandError::Unknown));
    }
}
