//! Events that trigger delivery state transitions

/// Events that can trigger delivery state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeliveryEvent {
    /// Courier reported departure with an arrival estimate
    Started { offset_minutes: u16 },
    /// Motion reported at the drop-off point
    Motion,
    /// Courier reported the delivery done
    Completed,
}
