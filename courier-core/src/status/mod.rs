//! Status display controller
//!
//! Four independent line slots on a character display:
//!
//! | row | content                      | written on        |
//! |-----|------------------------------|-------------------|
//! | 0   | `NOW:HH:MM\|YYYY-MM-DD`      | init, minute tick |
//! | 1   | `EXP:HH:MM\|YYYY-MM-DD`      | init              |
//! | 2   | motion placeholder / notice  | init, motion      |
//! | 3   | delivery completion notice   | delivery complete |

pub mod board;
pub mod events;

pub use board::StatusBoard;
pub use events::StatusEvent;

/// Row showing the current time
pub const LINE_NOW: u8 = 0;
/// Row showing the expected arrival time
pub const LINE_EXPECTED: u8 = 1;
/// Row showing the motion status
pub const LINE_MOTION: u8 = 2;
/// Row showing the delivery completion notice
pub const LINE_DELIVERY: u8 = 3;

/// Number of line slots
pub const LINE_COUNT: usize = 4;

/// Prefix of the current time row
pub const NOW_PREFIX: &str = "NOW:";
/// Prefix of the expected arrival row
pub const EXPECTED_PREFIX: &str = "EXP:";
/// Motion row before any motion is reported
pub const MOTION_WAITING: &str = "MOTION: WAITING";
/// Motion row after motion is reported
pub const MOTION_DETECTED: &str = "MOTION: DETECTED";
/// Completion row
pub const DELIVERY_COMPLETE: &str = "DELIVERY COMPLETE";
