//! Wall clock source trait

use crate::time::WallClock;

/// Errors that can occur reading or setting the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Clock is not running or not reachable
    Unavailable,
    /// Clock returned a reading outside the valid ranges
    InvalidReading,
    /// Clock cannot be set
    Unsupported,
}

/// Trait for wall clock sources (RTC peripheral, host clock, ...)
pub trait ClockSource {
    /// Read the current date and time
    fn read(&mut self) -> Result<WallClock, ClockError>;

    /// Set the current date and time
    fn set(&mut self, _clock: WallClock) -> Result<(), ClockError> {
        Err(ClockError::Unsupported)
    }
}
