//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod endpoint;
pub mod serial_rx;

pub use endpoint::{endpoint_task, EndpointDispatcher};
pub use serial_rx::serial_rx_task;
