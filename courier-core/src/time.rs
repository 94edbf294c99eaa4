//! Time service
//!
//! Wall clock snapshots, arrival offsets and the display timestamp format.
//!
//! Offset arithmetic carries minutes into hours but never wraps the hour
//! at 24 and never rolls the date. Arrival estimates are same-day and
//! short-horizon, so an arrival past midnight shows as hour 24 or later.

use core::fmt::Write;

use heapless::String;

use courier_protocol::ClockStamp;

use crate::traits::{ClockError, ClockSource};

/// Length of a formatted timestamp, `HH:MM|YYYY-MM-DD`
pub const CLOCK_TEXT_LEN: usize = 16;

/// Formatted timestamp buffer (room for hours past 99)
pub type ClockText = String<24>;

/// Wall clock snapshot
///
/// Readings from a clock source always have `hour < 24` and
/// `minute < 60`. `hour` is wider than a reading needs so that
/// [`WallClock::with_offset_minutes`] can carry past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClock {
    pub hour: u16,
    pub minute: u8,
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl WallClock {
    /// Create a snapshot from date and time fields
    pub const fn new(year: u16, month: u8, day: u8, hour: u16, minute: u8) -> Self {
        Self {
            hour,
            minute,
            day,
            month,
            year,
        }
    }

    /// Check that every field is in range for a clock reading
    pub fn is_valid_reading(&self) -> bool {
        self.hour < 24
            && self.minute < 60
            && (1..=12).contains(&self.month)
            && (1..=31).contains(&self.day)
    }

    /// Render as `HH:MM|YYYY-MM-DD`
    pub fn format(&self) -> ClockText {
        let mut text = ClockText::new();
        let _ = write!(
            text,
            "{:02}:{:02}|{:04}-{:02}-{:02}",
            self.hour, self.minute, self.year, self.month, self.day
        );
        text
    }

    /// Project this time `delta_minutes` into the future
    ///
    /// Minutes wrap at 60 and carry into the hour. The hour is not wrapped
    /// at 24 and the date is passed through unchanged.
    pub fn with_offset_minutes(&self, delta_minutes: u16) -> Self {
        let total = self.minute as u32 + delta_minutes as u32;
        let carry = (total / 60) as u16;
        Self {
            hour: self.hour.saturating_add(carry),
            minute: (total % 60) as u8,
            ..*self
        }
    }
}

impl From<ClockStamp> for WallClock {
    fn from(stamp: ClockStamp) -> Self {
        Self::new(
            stamp.year,
            stamp.month,
            stamp.day,
            stamp.hour as u16,
            stamp.minute,
        )
    }
}

/// Time service wrapping a clock source
pub struct TimeService<C> {
    source: C,
}

impl<C: ClockSource> TimeService<C> {
    /// Create a new time service
    pub fn new(source: C) -> Self {
        Self { source }
    }

    /// Read a fresh snapshot
    ///
    /// Readings with out-of-range fields are rejected.
    pub fn now(&mut self) -> Result<WallClock, ClockError> {
        let clock = self.source.read()?;
        if !clock.is_valid_reading() {
            return Err(ClockError::InvalidReading);
        }
        Ok(clock)
    }

    /// Set the clock source
    pub fn set(&mut self, clock: WallClock) -> Result<(), ClockError> {
        if !clock.is_valid_reading() {
            return Err(ClockError::InvalidReading);
        }
        self.source.set(clock)
    }

    /// Get the underlying clock source
    pub fn source(&self) -> &C {
        &self.source
    }

    /// Get the underlying clock source mutably
    pub fn source_mut(&mut self) -> &mut C {
        &mut self.source
    }
}
