//! Board-agnostic core logic for the delivery notification endpoint
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (actuators, line display, clock, line input)
//! - Time service (wall clock snapshots, arrival offsets, display format)
//! - Buzzer level controller
//! - Status display controller (four line slots)
//! - Delivery state machine
//! - Command dispatcher and poll loop
//! - Device configuration types and loader

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod buzzer;
pub mod config;
pub mod dispatch;
pub mod poll;
pub mod state;
pub mod status;
pub mod time;
pub mod traits;

pub use courier_protocol::{Command, Line, Note, ProtocolError, Request};
