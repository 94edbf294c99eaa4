//! Status board rendering

use core::fmt::Write;

use heapless::String;

use super::events::StatusEvent;
use super::{
    DELIVERY_COMPLETE, EXPECTED_PREFIX, LINE_COUNT, LINE_DELIVERY, LINE_EXPECTED, LINE_MOTION,
    LINE_NOW, MOTION_DETECTED, MOTION_WAITING, NOW_PREFIX,
};
use crate::time::WallClock;
use crate::traits::{DisplayError, LineDisplay, LineDisplayExt, MAX_COLUMNS};

/// Text of one line slot
pub type SlotText = String<MAX_COLUMNS>;

/// Status board over a line display
///
/// Each slot holds the text last written to its row. A slot (and the
/// last rendered minute) only changes once the display write succeeded.
pub struct StatusBoard<D> {
    display: D,
    slots: [SlotText; LINE_COUNT],
    last_minute: Option<u8>,
}

impl<D: LineDisplay> StatusBoard<D> {
    /// Create a new status board
    ///
    /// The display is not written until the first event.
    pub fn new(display: D) -> Self {
        Self {
            display,
            slots: [String::new(), String::new(), String::new(), String::new()],
            last_minute: None,
        }
    }

    /// Apply an event
    pub fn handle(&mut self, event: StatusEvent) -> Result<(), DisplayError> {
        match event {
            StatusEvent::Init {
                now,
                offset_minutes,
            } => {
                self.render_now(now)?;
                let arrival = now.with_offset_minutes(offset_minutes);
                self.write_slot(LINE_EXPECTED, &stamped(EXPECTED_PREFIX, &arrival))?;
                self.write_slot(LINE_MOTION, MOTION_WAITING)
            }
            StatusEvent::TimeTick(now) => self.tick(now).map(|_| ()),
            StatusEvent::MotionDetected => self.write_slot(LINE_MOTION, MOTION_DETECTED),
            StatusEvent::DeliveryComplete => self.write_slot(LINE_DELIVERY, DELIVERY_COMPLETE),
        }
    }

    /// Redraw the current time row if the minute changed
    ///
    /// Returns `true` when the row was rewritten.
    pub fn tick(&mut self, now: WallClock) -> Result<bool, DisplayError> {
        if self.last_minute == Some(now.minute) {
            return Ok(false);
        }
        self.render_now(now)?;
        Ok(true)
    }

    /// Redraw the current time row unconditionally
    pub fn redraw_now(&mut self, now: WallClock) -> Result<(), DisplayError> {
        self.render_now(now)
    }

    /// Get the text last written to a row
    pub fn line(&self, row: u8) -> Option<&str> {
        self.slots.get(row as usize).map(|s| s.as_str())
    }

    /// Minute shown on the current time row
    pub fn last_minute(&self) -> Option<u8> {
        self.last_minute
    }

    /// Get the display
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Get the display mutably
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    fn render_now(&mut self, now: WallClock) -> Result<(), DisplayError> {
        self.write_slot(LINE_NOW, &stamped(NOW_PREFIX, &now))?;
        self.last_minute = Some(now.minute);
        Ok(())
    }

    fn write_slot(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        self.display.rewrite_line(row, text)?;

        let width = (self.display.dimensions().0 as usize).min(MAX_COLUMNS);
        let slot = &mut self.slots[row as usize];
        slot.clear();
        for c in text.chars().take(width) {
            let _ = slot.push(c);
        }
        Ok(())
    }
}

/// Prefix followed by a formatted timestamp
fn stamped(prefix: &str, clock: &WallClock) -> SlotText {
    let mut text = SlotText::new();
    let _ = write!(text, "{}{}", prefix, clock.format());
    text
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 20x4 display recording which rows were rewritten
    pub(crate) struct RecordingDisplay {
        pub rows: [std::string::String; 4],
        pub rewrites: std::vec::Vec<u8>,
        pub fail: bool,
        cursor: (u8, u8),
    }

    impl RecordingDisplay {
        pub fn new() -> Self {
            Self {
                rows: Default::default(),
                rewrites: std::vec::Vec::new(),
                fail: false,
                cursor: (0, 0),
            }
        }

        pub fn row(&self, row: u8) -> &str {
            self.rows[row as usize].trim_end()
        }
    }

    impl LineDisplay for RecordingDisplay {
        fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Bus);
            }
            self.cursor = (row, col);
            Ok(())
        }

        fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Bus);
            }
            let (row, col) = self.cursor;
            assert_eq!(col, 0);
            self.rows[row as usize] = text.into();
            self.rewrites.push(row);
            Ok(())
        }

        fn dimensions(&self) -> (u8, u8) {
            (20, 4)
        }
    }

    fn board() -> StatusBoard<RecordingDisplay> {
        StatusBoard::new(RecordingDisplay::new())
    }

    #[test]
    fn test_init_renders_three_rows() {
        let mut board = board();
        let now = WallClock::new(2024, 5, 1, 13, 50);
        board
            .handle(StatusEvent::Init {
                now,
                offset_minutes: 45,
            })
            .unwrap();

        let display = board.display();
        assert_eq!(display.rewrites, [LINE_NOW, LINE_EXPECTED, LINE_MOTION]);
        assert_eq!(display.row(0), "NOW:13:50|2024-05-01");
        assert_eq!(display.row(1), "EXP:14:35|2024-05-01");
        assert_eq!(display.row(2), MOTION_WAITING);
        assert_eq!(board.last_minute(), Some(50));
        assert_eq!(board.line(LINE_DELIVERY), Some(""));
    }

    #[test]
    fn test_slot_holds_visible_text_only() {
        let mut board = board();
        board
            .handle(StatusEvent::Init {
                now: WallClock::new(2024, 5, 1, 13, 50),
                offset_minutes: 6000,
            })
            .unwrap();

        assert_eq!(board.line(LINE_EXPECTED), Some("EXP:113:50|2024-05-0"));
        assert_eq!(board.display().row(LINE_EXPECTED), "EXP:113:50|2024-05-0");
    }

    #[test]
    fn test_time_tick_event_redraws_on_new_minute() {
        let mut board = board();
        board
            .handle(StatusEvent::TimeTick(WallClock::new(2024, 5, 1, 7, 30)))
            .unwrap();
        board
            .handle(StatusEvent::TimeTick(WallClock::new(2024, 5, 1, 7, 30)))
            .unwrap();

        assert_eq!(board.display().rewrites, [LINE_NOW]);
        assert_eq!(board.line(LINE_NOW), Some("NOW:07:30|2024-05-01"));
        assert_eq!(board.last_minute(), Some(30));
    }

    #[test]
    fn test_first_tick_renders() {
        let mut board = board();
        assert_eq!(board.last_minute(), None);
        assert_eq!(board.tick(WallClock::new(2024, 5, 1, 8, 0)), Ok(true));
        assert_eq!(board.line(LINE_NOW), Some("NOW:08:00|2024-05-01"));
    }

    #[test]
    fn test_minute_rollover_rewrites_once() {
        let mut board = board();
        board.tick(WallClock::new(2024, 5, 1, 9, 59)).unwrap();
        board.display_mut().rewrites.clear();

        assert_eq!(board.tick(WallClock::new(2024, 5, 1, 9, 59)), Ok(false));
        assert_eq!(board.tick(WallClock::new(2024, 5, 1, 10, 0)), Ok(true));
        assert_eq!(board.tick(WallClock::new(2024, 5, 1, 10, 0)), Ok(false));

        assert_eq!(board.display().rewrites, [LINE_NOW]);
        assert_eq!(board.last_minute(), Some(0));
    }

    #[test]
    fn test_motion_touches_only_motion_row() {
        let mut board = board();
        board.handle(StatusEvent::MotionDetected).unwrap();
        assert_eq!(board.display().rewrites, [LINE_MOTION]);
        assert_eq!(board.line(LINE_MOTION), Some(MOTION_DETECTED));
    }

    #[test]
    fn test_delivery_complete_is_idempotent() {
        let mut board = board();
        board.handle(StatusEvent::DeliveryComplete).unwrap();
        let first = board.display().rows.clone();
        board.handle(StatusEvent::DeliveryComplete).unwrap();

        assert_eq!(board.display().rows, first);
        assert_eq!(board.display().rewrites, [LINE_DELIVERY, LINE_DELIVERY]);
        assert_eq!(board.line(LINE_DELIVERY), Some(DELIVERY_COMPLETE));
    }

    #[test]
    fn test_redraw_same_minute() {
        let mut board = board();
        board.tick(WallClock::new(2024, 5, 1, 9, 15)).unwrap();
        board.redraw_now(WallClock::new(2024, 5, 1, 21, 15)).unwrap();
        assert_eq!(board.display().rewrites, [LINE_NOW, LINE_NOW]);
        assert_eq!(board.line(LINE_NOW), Some("NOW:21:15|2024-05-01"));
    }

    #[test]
    fn test_failed_write_keeps_state() {
        let mut board = board();
        board.display_mut().fail = true;

        assert_eq!(
            board.tick(WallClock::new(2024, 5, 1, 9, 15)),
            Err(DisplayError::Bus)
        );
        assert_eq!(board.last_minute(), None);
        assert_eq!(board.line(LINE_NOW), Some(""));

        board.display_mut().fail = false;
        assert_eq!(board.tick(WallClock::new(2024, 5, 1, 9, 15)), Ok(true));
    }
}
