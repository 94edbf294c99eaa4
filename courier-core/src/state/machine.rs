//! Delivery state definition

use super::events::DeliveryEvent;

/// Delivery states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeliveryState {
    /// No delivery in progress
    #[default]
    Idle,
    /// Delivery started, arrival expected after the offset
    EnRoute { offset_minutes: u16 },
    /// Motion seen while a delivery is in progress
    MotionSeen { offset_minutes: u16 },
    /// Delivery completed
    Delivered,
}

impl DeliveryState {
    /// Arrival offset of the current cycle, if one is in progress
    pub fn offset_minutes(&self) -> Option<u16> {
        match self {
            DeliveryState::EnRoute { offset_minutes }
            | DeliveryState::MotionSeen { offset_minutes } => Some(*offset_minutes),
            _ => None,
        }
    }

    /// Check if a delivery cycle is in progress
    pub fn is_active(&self) -> bool {
        self.offset_minutes().is_some()
    }

    /// Process an event and return the next state
    pub fn transition(self, event: DeliveryEvent) -> Self {
        use DeliveryEvent::*;
        use DeliveryState::*;

        match (self, event) {
            // A new start always opens a fresh cycle
            (_, Started { offset_minutes }) => EnRoute { offset_minutes },

            (EnRoute { offset_minutes }, Motion) => MotionSeen { offset_minutes },

            // Completion is accepted from any state, repeated ends included
            (_, Completed) => Delivered,

            // Motion outside a cycle changes nothing
            _ => self,
        }
    }
}
