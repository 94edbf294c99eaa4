//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in courier-core on top of `embedded-hal` 1.0:
//!
//! - Buzzer actuators (level relays and tone output on GPIO)
//! - Character LCD (HD44780 behind a PCF8574 I2C backpack)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod actuator;
pub mod lcd;
