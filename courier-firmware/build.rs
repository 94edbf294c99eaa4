//! Build script for courier-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml at compile time

use std::collections::HashMap;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const NOTES: [&str; 17] = [
    "C4", "C#4", "CS4", "D4", "D#4", "DS4", "E4", "F4", "F#4", "FS4", "G4", "G#4", "GS4", "A4",
    "A#4", "AS4", "B4",
];

const MAX_GPIO: u8 = 29;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeviceToml {
    version: Option<u8>,
    serial: Option<SerialToml>,
    display: Option<DisplayToml>,
    buzzer: Option<BuzzerToml>,
    clock: Option<ClockToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SerialToml {
    tx_pin: Option<String>,
    rx_pin: Option<String>,
    baud_rate: Option<u32>,
    link_state_pin: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DisplayToml {
    sda_pin: Option<String>,
    scl_pin: Option<String>,
    address: Option<IntOrString>,
    i2c_frequency_hz: Option<u32>,
    columns: Option<u8>,
    rows: Option<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BuzzerToml {
    tone_pin: Option<String>,
    relay_a_pin: Option<String>,
    relay_b_pin: Option<String>,
    default_level: Option<i64>,
    note: Option<String>,
    tone_ms: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClockToml {
    poll_interval_ms: Option<u32>,
    start: Option<String>,
}

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate device.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read device.toml", &[e.to_string()]),
    };

    let config: DeviceToml = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => fail("Invalid device.toml", &[e.message().to_string()]),
    };

    let mut errors = Vec::new();

    if let Some(version) = config.version {
        if version != 1 {
            errors.push(format!("unsupported config version {}", version));
        }
    }

    let mut pins: HashMap<u8, String> = HashMap::new();
    let mut claim = |role: &str, value: Option<&String>, errors: &mut Vec<String>| {
        let Some(value) = value else { return };
        match parse_pin(value) {
            Some(pin) if pin > MAX_GPIO => {
                errors.push(format!("{} uses gpio{}, highest is gpio{}", role, pin, MAX_GPIO))
            }
            Some(pin) => {
                if let Some(other) = pins.insert(pin, role.to_string()) {
                    errors.push(format!("{} and {} both use gpio{}", other, role, pin));
                }
            }
            None => errors.push(format!("{} '{}' is not a gpio pin", role, value)),
        }
    };

    if let Some(serial) = &config.serial {
        claim("serial.tx_pin", serial.tx_pin.as_ref(), &mut errors);
        claim("serial.rx_pin", serial.rx_pin.as_ref(), &mut errors);
        claim("serial.link_state_pin", serial.link_state_pin.as_ref(), &mut errors);
        if serial.baud_rate == Some(0) {
            errors.push("serial.baud_rate must not be 0".to_string());
        }
    }

    if let Some(display) = &config.display {
        claim("display.sda_pin", display.sda_pin.as_ref(), &mut errors);
        claim("display.scl_pin", display.scl_pin.as_ref(), &mut errors);
        match &display.address {
            Some(IntOrString::Int(addr)) if !(0..=0x7F).contains(addr) => {
                errors.push(format!("display.address {} is not a 7-bit address", addr))
            }
            Some(IntOrString::Str(addr)) if parse_hex(addr).map_or(true, |a| a > 0x7F) => {
                errors.push(format!("display.address '{}' is not a 7-bit address", addr))
            }
            _ => {}
        }
        if let Some(rows) = display.rows {
            if rows < 4 {
                errors.push(format!("display.rows {} is below the 4 status rows", rows));
            }
        }
        if let Some(columns) = display.columns {
            if !(20..=40).contains(&columns) {
                errors.push(format!("display.columns {} must be 20-40", columns));
            }
        }
    }

    if let Some(buzzer) = &config.buzzer {
        claim("buzzer.tone_pin", buzzer.tone_pin.as_ref(), &mut errors);
        claim("buzzer.relay_a_pin", buzzer.relay_a_pin.as_ref(), &mut errors);
        claim("buzzer.relay_b_pin", buzzer.relay_b_pin.as_ref(), &mut errors);
        if let Some(level) = buzzer.default_level {
            if !(0..=3).contains(&level) {
                errors.push(format!("buzzer.default_level {} must be 0-3", level));
            }
        }
        if let Some(note) = &buzzer.note {
            let upper = note.to_ascii_uppercase();
            if !NOTES.contains(&upper.as_str()) {
                errors.push(format!("buzzer.note '{}' must be C4-B4", note));
            }
        }
    }

    if let Some(clock) = &config.clock {
        if clock.poll_interval_ms == Some(0) {
            errors.push("clock.poll_interval_ms must not be 0".to_string());
        }
        if let Some(start) = &clock.start {
            if !is_valid_stamp(start) {
                errors.push(format!("clock.start '{}' must be YYYY-MM-DD HH:MM", start));
            }
        }
    }

    if !errors.is_empty() {
        fail("Invalid device configuration", &errors);
    }
}

/// Parse "gpioN" with optional "!" and "^" prefixes
fn parse_pin(value: &str) -> Option<u8> {
    value
        .trim_start_matches(['!', '^'])
        .strip_prefix("gpio")?
        .parse()
        .ok()
}

fn parse_hex(value: &str) -> Option<i64> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

fn is_valid_stamp(value: &str) -> bool {
    let bytes = value.as_bytes();
    let separators = [(4, b'-'), (7, b'-'), (10, b' '), (13, b':')];
    if bytes.len() != 16 || separators.iter().any(|&(i, c)| bytes[i] != c) {
        return false;
    }
    let field = |range: std::ops::Range<usize>| value[range].parse::<u32>().ok();
    matches!(
        (field(0..4), field(5..7), field(8..10), field(11..13), field(14..16)),
        (Some(_), Some(1..=12), Some(1..=31), Some(0..=23), Some(0..=59))
    )
}

fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
