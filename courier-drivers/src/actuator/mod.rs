//! Buzzer actuator drivers

pub mod gpio;

pub use gpio::{GpioActuators, GpioOutput};
