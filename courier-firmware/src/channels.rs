//! Inter-task communication channels
//!
//! The serial receive task hands complete lines to the endpoint task.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use courier_protocol::{Line, ProtocolError};

/// Channel capacity for received lines
const LINE_CHANNEL_SIZE: usize = 4;

/// Assembled lines (or the reason a line was discarded)
pub static LINE_CHANNEL: Channel<
    CriticalSectionRawMutex,
    Result<Line, ProtocolError>,
    LINE_CHANNEL_SIZE,
> = Channel::new();

/// Signal that the line channel has something to take
pub static LINE_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();
