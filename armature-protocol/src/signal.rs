//! Motion signal encoding and decoding.
//!
//! Signal format (space-separated ASCII tokens):
//! - COUNT: number of entries that follow (1-8)
//! - INDEX: joint index, unsigned integer
//! - ANGLE: target angle in degrees, decimal float
//!
//! Parsing stops at the first malformed token. Entries decoded before the
//! failure are kept so the caller can report them, but a signal with an
//! error is never meant to be executed.

use core::fmt;

use heapless::Vec;

/// Maximum number of entries in one signal (one per joint)
pub const MAX_SIGNAL_ENTRIES: usize = 8;

/// One joint target inside a signal
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalEntry {
    /// Joint index within the arm
    pub index: u8,
    /// Target angle in degrees
    pub angle: f32,
}

/// Errors that can occur while decoding a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalError {
    /// Empty input, no count token
    MissingCount,
    /// Count is not a positive integer
    InvalidCount,
    /// Count exceeds the signal capacity
    TooManyEntries { declared: usize },
    /// Input ended before the index of an entry
    MissingIndex { entry: usize },
    /// Index token is not an unsigned integer
    InvalidIndex { entry: usize },
    /// Input ended before the angle of an entry
    MissingAngle { entry: usize },
    /// Angle token is not a finite decimal number
    InvalidAngle { entry: usize },
    /// The same joint appears twice in one signal
    DuplicateIndex { index: u8 },
    /// Tokens left over after the declared entries
    TrailingInput,
}

/// A set of (joint index, target angle) pairs moved together
///
/// Indexes are unique within a signal. Whether an index exists on a
/// particular arm is checked by the arm, not by the signal.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionSignal {
    entries: Vec<SignalEntry, MAX_SIGNAL_ENTRIES>,
}

impl MotionSignal {
    /// Create an empty signal
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a signal moving a single joint
    pub fn single(index: u8, angle: f32) -> Result<Self, SignalError> {
        let mut signal = Self::new();
        signal.push(index, angle)?;
        Ok(signal)
    }

    /// Append an entry
    pub fn push(&mut self, index: u8, angle: f32) -> Result<(), SignalError> {
        let entry = self.entries.len();
        if !angle.is_finite() {
            return Err(SignalError::InvalidAngle { entry });
        }
        if self.entries.iter().any(|e| e.index == index) {
            return Err(SignalError::DuplicateIndex { index });
        }
        self.entries
            .push(SignalEntry { index, angle })
            .map_err(|_| SignalError::TooManyEntries { declared: entry + 1 })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the signal has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in the order they were given
    pub fn entries(&self) -> &[SignalEntry] {
        &self.entries
    }

    /// Joint indexes in entry order
    pub fn indexes(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.iter().map(|e| e.index)
    }

    /// Target angles in entry order
    pub fn angles(&self) -> impl Iterator<Item = f32> + '_ {
        self.entries.iter().map(|e| e.angle)
    }

    /// Highest joint index referenced, if any
    pub fn max_index(&self) -> Option<u8> {
        self.indexes().max()
    }

    /// Decode a signal, failing on the first malformed token
    pub fn parse(text: &str) -> Result<Self, SignalError> {
        match Self::parse_partial(text) {
            (signal, None) => Ok(signal),
            (_, Some(err)) => Err(err),
        }
    }

    /// Decode a signal, keeping the entries parsed before any error
    ///
    /// Returns the decoded entries together with the error that stopped
    /// decoding, if there was one.
    pub fn parse_partial(text: &str) -> (Self, Option<SignalError>) {
        let mut signal = Self::new();
        let mut tokens = text.split_ascii_whitespace();

        let declared = match tokens.next() {
            None => return (signal, Some(SignalError::MissingCount)),
            Some(token) => match token.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return (signal, Some(SignalError::InvalidCount)),
            },
        };

        if declared > MAX_SIGNAL_ENTRIES {
            return (signal, Some(SignalError::TooManyEntries { declared }));
        }

        for entry in 0..declared {
            let index = match tokens.next() {
                None => return (signal, Some(SignalError::MissingIndex { entry })),
                Some(token) => match token.parse::<u8>() {
                    Ok(index) => index,
                    Err(_) => return (signal, Some(SignalError::InvalidIndex { entry })),
                },
            };

            let angle = match tokens.next() {
                None => return (signal, Some(SignalError::MissingAngle { entry })),
                Some(token) => match token.parse::<f32>() {
                    Ok(angle) if angle.is_finite() => angle,
                    _ => return (signal, Some(SignalError::InvalidAngle { entry })),
                },
            };

            if let Err(err) = signal.push(index, angle) {
                return (signal, Some(err));
            }
        }

        if tokens.next().is_some() {
            return (signal, Some(SignalError::TrailingInput));
        }

        (signal, None)
    }
}

impl fmt::Display for MotionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entries.len())?;
        for entry in &self.entries {
            write!(f, " {} {}", entry.index, entry.angle)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;
    use proptest::prelude::*;

    #[test]
    fn test_parse_three_entries() {
        let signal = MotionSignal::parse("3 0 90 1 65 2 145").unwrap();
        assert_eq!(signal.len(), 3);
        assert_eq!(
            signal.entries(),
            &[
                SignalEntry { index: 0, angle: 90.0 },
                SignalEntry { index: 1, angle: 65.0 },
                SignalEntry { index: 2, angle: 145.0 },
            ]
        );
    }

    #[test]
    fn test_parse_decimal_angle() {
        let signal = MotionSignal::parse("1 3 12.5").unwrap();
        assert_eq!(signal.entries()[0], SignalEntry { index: 3, angle: 12.5 });
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let signal = MotionSignal::parse("  2 0   10\t1 20 \r").unwrap();
        assert_eq!(signal.len(), 2);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(MotionSignal::parse(""), Err(SignalError::MissingCount));
        assert_eq!(MotionSignal::parse("   "), Err(SignalError::MissingCount));
    }

    #[test]
    fn test_parse_invalid_count() {
        assert_eq!(MotionSignal::parse("0"), Err(SignalError::InvalidCount));
        assert_eq!(MotionSignal::parse("-1 0 90"), Err(SignalError::InvalidCount));
        assert_eq!(MotionSignal::parse("x 0 90"), Err(SignalError::InvalidCount));
    }

    #[test]
    fn test_parse_count_over_capacity() {
        assert_eq!(
            MotionSignal::parse("9 0 1 1 1 2 1 3 1 4 1 5 1 6 1 7 1 8 1"),
            Err(SignalError::TooManyEntries { declared: 9 })
        );
    }

    #[test]
    fn test_parse_incomplete_keeps_parsed_entries() {
        // Declares two entries but only supplies one
        let (signal, err) = MotionSignal::parse_partial("2 0 90");
        assert_eq!(err, Some(SignalError::MissingIndex { entry: 1 }));
        assert_eq!(signal.len(), 1);
        assert_eq!(signal.entries()[0], SignalEntry { index: 0, angle: 90.0 });

        assert_eq!(
            MotionSignal::parse("2 0 90"),
            Err(SignalError::MissingIndex { entry: 1 })
        );
    }

    #[test]
    fn test_parse_missing_angle() {
        assert_eq!(
            MotionSignal::parse("1 0"),
            Err(SignalError::MissingAngle { entry: 0 })
        );
    }

    #[test]
    fn test_parse_invalid_tokens() {
        assert_eq!(
            MotionSignal::parse("1 a 90"),
            Err(SignalError::InvalidIndex { entry: 0 })
        );
        assert_eq!(
            MotionSignal::parse("1 -2 90"),
            Err(SignalError::InvalidIndex { entry: 0 })
        );
        assert_eq!(
            MotionSignal::parse("2 0 90 1 9o"),
            Err(SignalError::InvalidAngle { entry: 1 })
        );
        assert_eq!(
            MotionSignal::parse("1 0 NaN"),
            Err(SignalError::InvalidAngle { entry: 0 })
        );
        assert_eq!(
            MotionSignal::parse("1 0 inf"),
            Err(SignalError::InvalidAngle { entry: 0 })
        );
    }

    #[test]
    fn test_parse_duplicate_index() {
        let (signal, err) = MotionSignal::parse_partial("2 1 90 1 45");
        assert_eq!(err, Some(SignalError::DuplicateIndex { index: 1 }));
        assert_eq!(signal.len(), 1);
    }

    #[test]
    fn test_parse_trailing_tokens() {
        assert_eq!(
            MotionSignal::parse("1 0 90 1 45"),
            Err(SignalError::TrailingInput)
        );
    }

    #[test]
    fn test_push_rejects_non_finite() {
        let mut signal = MotionSignal::new();
        assert_eq!(
            signal.push(0, f32::NAN),
            Err(SignalError::InvalidAngle { entry: 0 })
        );
        assert!(signal.is_empty());
    }

    #[test]
    fn test_push_capacity() {
        let mut signal = MotionSignal::new();
        for i in 0..MAX_SIGNAL_ENTRIES as u8 {
            signal.push(i, 90.0).unwrap();
        }
        assert_eq!(
            signal.push(200, 90.0),
            Err(SignalError::TooManyEntries {
                declared: MAX_SIGNAL_ENTRIES + 1
            })
        );
    }

    #[test]
    fn test_max_index() {
        assert_eq!(MotionSignal::new().max_index(), None);
        let signal = MotionSignal::parse("3 2 10 7 20 4 30").unwrap();
        assert_eq!(signal.max_index(), Some(7));
    }

    #[test]
    fn test_display_format() {
        let signal = MotionSignal::parse("2 0 90 3 12.5").unwrap();
        let mut text = heapless::String::<32>::new();
        write!(text, "{}", signal).unwrap();
        assert_eq!(text.as_str(), "2 0 90 3 12.5");
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(text in "\\PC{0,40}") {
            let _ = MotionSignal::parse_partial(&text);
        }

        #[test]
        fn prop_formatted_signal_parses_back(
            angles in proptest::collection::vec(-720.0f32..720.0, 1..=MAX_SIGNAL_ENTRIES)
        ) {
            let mut signal = MotionSignal::new();
            for (i, angle) in angles.iter().enumerate() {
                signal.push(i as u8, *angle).unwrap();
            }
            let mut text = heapless::String::<256>::new();
            write!(text, "{}", signal).unwrap();
            prop_assert_eq!(MotionSignal::parse(&text), Ok(signal));
        }
    }
}
