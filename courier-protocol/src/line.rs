//! Line assembly for the serial link.
//!
//! Bytes arrive from the Bluetooth module in arbitrary chunks. The
//! assembler collects them until a `\n` terminator and hands out one
//! complete line at a time.
//!
//! - A `\r` right before the terminator is dropped
//! - Blank lines are skipped
//! - A line longer than [`MAX_LINE_LEN`] is discarded up to its terminator
//!   and reported once as [`ProtocolError::LineTooLong`]
//! - A line containing non-ASCII bytes is discarded and reported once as
//!   [`ProtocolError::InvalidEncoding`]

use heapless::{String, Vec};

use crate::request::ProtocolError;

/// Maximum line length in bytes (excluding the terminator)
pub const MAX_LINE_LEN: usize = 64;

/// Line terminator
pub const LINE_END: u8 = b'\n';

/// One complete command line
pub type Line = String<MAX_LINE_LEN>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssembleState {
    /// Collecting bytes of the current line
    Collecting,
    /// Dropping bytes until the next terminator, then reporting the error
    Discarding(ProtocolError),
}

/// State machine for assembling terminated lines
#[derive(Debug, Clone)]
pub struct LineAssembler {
    state: AssembleState,
    /// One spare byte holds the `\r` of a CRLF terminator
    buffer: Vec<u8, { MAX_LINE_LEN + 1 }>,
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl LineAssembler {
    /// Create a new line assembler
    pub const fn new() -> Self {
        Self {
            state: AssembleState::Collecting,
            buffer: Vec::new(),
        }
    }

    /// Drop any partially received line
    pub fn reset(&mut self) {
        self.state = AssembleState::Collecting;
        self.buffer.clear();
    }

    /// Number of bytes buffered for the current line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte to the assembler
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a non-blank
    /// line, `Ok(None)` when more bytes are needed, or `Err` when the line
    /// just terminated had to be discarded.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, ProtocolError> {
        if byte == LINE_END {
            let state = core::mem::replace(&mut self.state, AssembleState::Collecting);
            let result = match state {
                AssembleState::Discarding(err) => Err(err),
                AssembleState::Collecting => self.take_line(),
            };
            self.buffer.clear();
            return result;
        }

        match self.state {
            AssembleState::Discarding(_) => {}
            AssembleState::Collecting => {
                if !byte.is_ascii() {
                    self.state = AssembleState::Discarding(ProtocolError::InvalidEncoding);
                } else if self.buffer.push(byte).is_err() {
                    self.state = AssembleState::Discarding(ProtocolError::LineTooLong);
                }
            }
        }
        Ok(None)
    }

    fn take_line(&mut self) -> Result<Option<Line>, ProtocolError> {
        let mut bytes = self.buffer.as_slice();
        if let [rest @ .., b'\r'] = bytes {
            bytes = rest;
        }

        let text = core::str::from_utf8(bytes).map_err(|_| ProtocolError::InvalidEncoding)?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        Line::try_from(text)
            .map(Some)
            .map_err(|_| ProtocolError::LineTooLong)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(assembler: &mut LineAssembler, bytes: &[u8]) -> std::vec::Vec<Result<Line, ProtocolError>> {
        let mut out = std::vec::Vec::new();
        for &byte in bytes {
            match assembler.feed(byte) {
                Ok(Some(line)) => out.push(Ok(line)),
                Ok(None) => {}
                Err(e) => out.push(Err(e)),
            }
        }
        out
    }

    #[test]
    fn test_single_line() {
        let mut assembler = LineAssembler::new();
        let lines = feed_all(&mut assembler, b"delivery,start,45\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_ref().unwrap().as_str(), "delivery,start,45");
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn test_crlf_and_split_chunks() {
        let mut assembler = LineAssembler::new();
        assert!(feed_all(&mut assembler, b"buzzer,le").is_empty());
        assert_eq!(assembler.pending(), 9);

        let lines = feed_all(&mut assembler, b"vel,2\r\nmotion,,\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].as_ref().unwrap().as_str(), "buzzer,level,2");
        assert_eq!(lines[1].as_ref().unwrap().as_str(), "motion,,");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let mut assembler = LineAssembler::new();
        let lines = feed_all(&mut assembler, b"\n\r\n   \nmotion,,\n");
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_overflow_reported_once_then_recovers() {
        let mut assembler = LineAssembler::new();
        let mut long = std::vec![b'x'; MAX_LINE_LEN + 10];
        long.push(b'\n');
        long.extend_from_slice(b"delivery,end,\n");

        let lines = feed_all(&mut assembler, &long);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], Err(ProtocolError::LineTooLong));
        assert_eq!(lines[1].as_ref().unwrap().as_str(), "delivery,end,");
    }

    #[test]
    fn test_line_at_capacity_is_accepted() {
        let mut assembler = LineAssembler::new();
        let mut exact = std::vec![b'a'; MAX_LINE_LEN];
        exact.push(b'\n');

        let lines = feed_all(&mut assembler, &exact);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_ref().unwrap().len(), MAX_LINE_LEN);
    }

    #[test]
    fn test_crlf_line_at_capacity_is_accepted() {
        let mut assembler = LineAssembler::new();
        let mut exact = std::vec![b'a'; MAX_LINE_LEN];
        exact.extend_from_slice(b"\r\n");

        let lines = feed_all(&mut assembler, &exact);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_ref().unwrap().len(), MAX_LINE_LEN);
    }

    #[test]
    fn test_line_one_past_capacity_is_rejected() {
        let mut assembler = LineAssembler::new();
        let mut long = std::vec![b'a'; MAX_LINE_LEN + 1];
        long.push(b'\n');

        let lines = feed_all(&mut assembler, &long);
        assert_eq!(lines, [Err(ProtocolError::LineTooLong)]);
    }

    #[test]
    fn test_non_ascii_rejected() {
        let mut assembler = LineAssembler::new();
        let lines = feed_all(&mut assembler, b"motion,\xC3\xA9,\nmotion,,\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], Err(ProtocolError::InvalidEncoding));
        assert!(lines[1].is_ok());
    }

    #[test]
    fn test_reset_drops_partial_line() {
        let mut assembler = LineAssembler::new();
        feed_all(&mut assembler, b"garbage");
        assembler.reset();
        let lines = feed_all(&mut assembler, b"motion,,\n");
        assert_eq!(lines[0].as_ref().unwrap().as_str(), "motion,,");
    }
}
