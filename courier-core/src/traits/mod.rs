//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod actuator;
pub mod clock;
pub mod display;
pub mod input;

pub use actuator::{Actuator, ActuatorError, ActuatorSink};
pub use clock::{ClockError, ClockSource};
pub use display::{DisplayError, LineDisplay, LineDisplayExt, MAX_COLUMNS};
pub use input::{InputError, LineSource};
