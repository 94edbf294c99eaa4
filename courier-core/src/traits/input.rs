//! Line-oriented command input

use courier_protocol::{Line, ProtocolError};

/// Errors reported by a line source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// The remote end is not connected
    Disconnected,
    /// A received line was discarded
    Protocol(ProtocolError),
}

impl From<ProtocolError> for InputError {
    fn from(e: ProtocolError) -> Self {
        InputError::Protocol(e)
    }
}

/// Trait for sources of complete command lines
pub trait LineSource {
    /// Take the next complete line, if one is available
    ///
    /// Must not block waiting for input.
    fn read_line(&mut self) -> Result<Option<Line>, InputError>;
}
