//! RTC-backed clock source

use embassy_rp::peripherals::RTC;
use embassy_rp::rtc::{DateTime, DayOfWeek, Rtc};

use courier_core::time::WallClock;
use courier_core::traits::{ClockError, ClockSource};

/// Clock source on the RP2040 RTC peripheral
pub struct RtcClock {
    rtc: Rtc<'static, RTC>,
}

impl RtcClock {
    /// Wrap the RTC peripheral
    pub fn new(rtc: Rtc<'static, RTC>) -> Self {
        Self { rtc }
    }

    /// Load `start` into the RTC unless it is already counting
    ///
    /// Returns `true` when the RTC was started.
    pub fn start_if_stopped(&mut self, start: WallClock) -> Result<bool, ClockError> {
        if self.rtc.is_running() {
            return Ok(false);
        }
        self.set(start)?;
        Ok(true)
    }
}

impl ClockSource for RtcClock {
    fn read(&mut self) -> Result<WallClock, ClockError> {
        let now = self.rtc.now().map_err(|_| ClockError::Unavailable)?;
        Ok(WallClock::new(
            now.year,
            now.month,
            now.day,
            now.hour as u16,
            now.minute,
        ))
    }

    fn set(&mut self, clock: WallClock) -> Result<(), ClockError> {
        let hour = u8::try_from(clock.hour).map_err(|_| ClockError::InvalidReading)?;
        let datetime = DateTime {
            year: clock.year,
            month: clock.month,
            day: clock.day,
            day_of_week: day_of_week(clock.year, clock.month, clock.day),
            hour,
            minute: clock.minute,
            second: 0,
        };
        self.rtc
            .set_datetime(datetime)
            .map_err(|_| ClockError::InvalidReading)
    }
}

/// Weekday of a Gregorian date (Sakamoto's method)
fn day_of_week(year: u16, month: u8, day: u8) -> DayOfWeek {
    const OFFSETS: [u32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];

    let month = month.clamp(1, 12);
    let y = year as u32 - u32::from(month < 3 && year > 0);
    let index = (y + y / 4 - y / 100 + y / 400 + OFFSETS[month as usize - 1] + day as u32) % 7;

    match index {
        0 => DayOfWeek::Sunday,
        1 => DayOfWeek::Monday,
        2 => DayOfWeek::Tuesday,
        3 => DayOfWeek::Wednesday,
        4 => DayOfWeek::Thursday,
        5 => DayOfWeek::Friday,
        _ => DayOfWeek::Saturday,
    }
}
