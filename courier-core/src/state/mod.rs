//! Delivery state machine
//!
//! Tracks one delivery cycle from start to completion. The state is
//! informational: every command is acted on regardless of state.

pub mod events;
pub mod machine;

pub use events::DeliveryEvent;
pub use machine::DeliveryState;
