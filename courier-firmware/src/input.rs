//! Line source fed by the serial receive task

use embassy_rp::gpio::Input;

use courier_core::traits::{InputError, LineSource};
use courier_protocol::Line;

use crate::channels::LINE_CHANNEL;

/// Line source reading the line channel
///
/// When the SPP module's link-state output is wired, an empty channel
/// with the link down reports [`InputError::Disconnected`].
pub struct ChannelLineSource {
    link_state: Option<Input<'static>>,
    /// If true, link up = pin LOW
    inverted: bool,
}

impl ChannelLineSource {
    /// Create a new line source
    pub fn new(link_state: Option<Input<'static>>, inverted: bool) -> Self {
        Self {
            link_state,
            inverted,
        }
    }

    fn link_up(&self) -> bool {
        match &self.link_state {
            Some(pin) => pin.is_high() != self.inverted,
            None => true,
        }
    }
}

impl LineSource for ChannelLineSource {
    fn read_line(&mut self) -> Result<Option<Line>, InputError> {
        match LINE_CHANNEL.try_receive() {
            Ok(Ok(line)) => Ok(Some(line)),
            Ok(Err(e)) => Err(e.into()),
            Err(_) if !self.link_up() => Err(InputError::Disconnected),
            Err(_) => Ok(None),
        }
    }
}
