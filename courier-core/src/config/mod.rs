//! Device configuration
//!
//! Board-agnostic configuration structures, and a loader for the
//! `device.toml` format embedded in the firmware image.

pub mod hardware;
pub mod toml;

pub use hardware::*;
pub use toml::{parse_config, ParseError};
