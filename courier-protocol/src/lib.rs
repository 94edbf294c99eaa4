//! Courier Serial Command Protocol
//!
//! This crate defines the line-oriented text protocol spoken by the phone
//! app (over a Bluetooth SPP module) to the delivery notification endpoint.
//!
//! # Protocol Overview
//!
//! Every command is one ASCII line of three comma separated fields:
//! ```text
//! <module>,<item>,<value>\n
//!
//! delivery,start,45      begin a delivery, arrival in 45 minutes
//! delivery,end,          delivery complete, sound the buzzer
//! buzzer,on/off,on       force the buzzer on (or off)
//! buzzer,level,2         select buzzer level 0..3
//! buzzer,scale,A4        select the tone note
//! motion,,               motion detected at the door
//! clock,set,2024-05-01 13:45
//! ```
//!
//! Parsing is deliberately tolerant: missing fields become empty strings
//! and numeric values that fail to parse become 0. Whether a command makes
//! sense is decided when it is decoded into a [`Request`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod line;
pub mod request;

pub use command::{lenient_int, Command};
pub use line::{Line, LineAssembler, MAX_LINE_LEN};
pub use request::{ClockStamp, Note, ProtocolError, Request, Switch};
