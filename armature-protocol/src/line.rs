//! Line assembly for the serial console.
//!
//! Bytes arrive one at a time from the UART. The parser collects them
//! into lines terminated by `\n` or `\r`. Blank lines are skipped and
//! backspace/delete remove the previous byte so the console can be typed
//! into by hand.

use heapless::{String, Vec};

/// Maximum line length in bytes (excluding the terminator)
pub const MAX_LINE_LEN: usize = 128;

/// A complete console line
pub type Line = String<MAX_LINE_LEN>;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// Errors that can occur while assembling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded [`MAX_LINE_LEN`]; the rest of it is discarded
    Overflow,
    /// Line is not valid UTF-8
    InvalidUtf8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    /// Collecting bytes of the current line
    Collecting,
    /// Skipping the remainder of an overlong line
    Discarding,
}

/// State machine for assembling console lines
#[derive(Debug, Clone)]
pub struct LineParser {
    state: LineState,
    buffer: Vec<u8, MAX_LINE_LEN>,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self {
            state: LineState::Collecting,
            buffer: Vec::new(),
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = LineState::Collecting;
        self.buffer.clear();
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(line))` when a non-empty line is complete,
    /// `Ok(None)` when more bytes are needed, or `Err` on overflow or
    /// invalid UTF-8.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        let terminator = byte == b'\n' || byte == b'\r';

        match self.state {
            LineState::Discarding => {
                if terminator {
                    self.reset();
                }
                Ok(None)
            }
            LineState::Collecting if terminator => {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let result = match core::str::from_utf8(&self.buffer) {
                    Ok(text) => {
                        let mut line = Line::new();
                        // Cannot fail: the buffer and the line share a capacity
                        let _ = line.push_str(text);
                        Ok(Some(line))
                    }
                    Err(_) => Err(LineError::InvalidUtf8),
                };
                self.reset();
                result
            }
            LineState::Collecting => {
                if byte == BACKSPACE || byte == DELETE {
                    self.buffer.pop();
                    return Ok(None);
                }
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.state = LineState::Discarding;
                    return Err(LineError::Overflow);
                }
                Ok(None)
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete line found, if any.
    /// Remaining bytes after a complete line are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Line>, LineError> {
        for &byte in bytes {
            if let Some(line) = self.feed(byte)? {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let mut parser = LineParser::new();
        let line = parser.feed_bytes(b"3 0 90 1 65 2 145\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "3 0 90 1 65 2 145");
    }

    #[test]
    fn test_crlf_yields_one_line() {
        let mut parser = LineParser::new();
        let line = parser.feed_bytes(b"a\r").unwrap().unwrap();
        assert_eq!(line.as_str(), "a");
        // The trailing \n is an empty line and is skipped
        assert_eq!(parser.feed(b'\n'), Ok(None));
    }

    #[test]
    fn test_incremental_feed() {
        let mut parser = LineParser::new();
        for &b in b"status" {
            assert_eq!(parser.feed(b), Ok(None));
        }
        let line = parser.feed(b'\n').unwrap().unwrap();
        assert_eq!(line.as_str(), "status");
    }

    #[test]
    fn test_backspace_edits_line() {
        let mut parser = LineParser::new();
        let line = parser.feed_bytes(b"mx\x08\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "m");
    }

    #[test]
    fn test_overflow_discards_until_newline() {
        let mut parser = LineParser::new();
        let long = [b'1'; MAX_LINE_LEN + 1];
        assert_eq!(parser.feed_bytes(&long), Err(LineError::Overflow));
        // Rest of the overlong line is ignored
        assert_eq!(parser.feed_bytes(b"2345"), Ok(None));
        assert_eq!(parser.feed(b'\n'), Ok(None));
        // Parser is usable again
        let line = parser.feed_bytes(b"g\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "g");
    }

    #[test]
    fn test_invalid_utf8() {
        let mut parser = LineParser::new();
        assert_eq!(
            parser.feed_bytes(&[0xFF, 0xFE, b'\n']),
            Err(LineError::InvalidUtf8)
        );
        let line = parser.feed_bytes(b"p\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "p");
    }
}
