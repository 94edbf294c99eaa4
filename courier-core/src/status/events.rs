//! Events driving the status display

use crate::time::WallClock;

/// Events that update the status display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusEvent {
    /// Delivery started: render the current and expected time rows and
    /// reset the motion row
    Init { now: WallClock, offset_minutes: u16 },
    /// Periodic clock poll; the current time row is redrawn on a new minute
    TimeTick(WallClock),
    /// Motion reported
    MotionDetected,
    /// Delivery completed
    DeliveryComplete,
}
