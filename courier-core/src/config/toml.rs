//! Minimal TOML reader for `device.toml`
//!
//! Handles only the subset the device configuration uses. It does NOT
//! support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, hex integer)
//! - `[serial]`, `[display]`, `[buzzer]` and `[clock]` section headers
//! - Comments (# ...)
//!
//! Unknown keys are ignored. Unknown sections are an error.

use courier_protocol::{ClockStamp, Note};

use super::hardware::{DeviceConfig, PinConfig};
use crate::buzzer::BuzzerLevel;
use crate::time::WallClock;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Invalid pin string
    InvalidPin,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Serial,
    Display,
    Buzzer,
    Clock,
}

/// Parse TOML text into a DeviceConfig
///
/// Keys missing from the input keep their defaults. The result is not
/// validated; call [`DeviceConfig::validate`] on it.
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "serial" => Ok(Section::Serial),
        "display" => Ok(Section::Display),
        "buzzer" => Ok(Section::Buzzer),
        "clock" => Ok(Section::Clock),
        _ => Err(ParseError::InvalidSection),
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments outside quotes
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer, allowing `_` digit separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits = heapless::String::<24>::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_hex_u8(value: &str) -> Result<u8, ParseError> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).map_err(|_| ParseError::InvalidValue),
        None => parse_int(value),
    }
}

/// Parse a pin like `"gpio8"`, with `!` for active-low and `^` for pull-up
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let mut s = parse_string(value);
    let mut pin = PinConfig::default();

    loop {
        if let Some(rest) = s.strip_prefix('!') {
            pin.inverted = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('^') {
            pin.pull_up = true;
            s = rest;
        } else {
            break;
        }
    }

    pin.pin = s
        .strip_prefix("gpio")
        .ok_or(ParseError::InvalidPin)?
        .parse()
        .map_err(|_| ParseError::InvalidPin)?;

    Ok(pin)
}

fn parse_optional_pin(value: &str) -> Result<Option<PinConfig>, ParseError> {
    match parse_string(value) {
        "" | "none" => Ok(None),
        _ => parse_pin(value).map(Some),
    }
}

fn parse_level(value: &str) -> Result<BuzzerLevel, ParseError> {
    let index: i32 = parse_int(value)?;
    BuzzerLevel::from_index(index).map_err(|_| ParseError::InvalidValue)
}

fn parse_note(value: &str) -> Result<Note, ParseError> {
    Note::from_name(parse_string(value)).ok_or(ParseError::InvalidValue)
}

fn parse_clock(value: &str) -> Result<WallClock, ParseError> {
    ClockStamp::parse(parse_string(value))
        .map(WallClock::from)
        .ok_or(ParseError::InvalidValue)
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut DeviceConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {
            if key == "version" {
                config.version = parse_int(value)?;
            }
        }
        Section::Serial => {
            let s = &mut config.serial;
            match key {
                "tx_pin" => s.tx_pin = parse_pin(value)?,
                "rx_pin" => s.rx_pin = parse_pin(value)?,
                "baud_rate" => s.baud_rate = parse_int(value)?,
                "link_state_pin" => s.link_state_pin = parse_optional_pin(value)?,
                _ => {} // Ignore unknown keys
            }
        }
        Section::Display => {
            let d = &mut config.display;
            match key {
                "sda_pin" => d.sda_pin = parse_pin(value)?,
                "scl_pin" => d.scl_pin = parse_pin(value)?,
                "address" => d.address = parse_hex_u8(parse_string(value))?,
                "i2c_frequency_hz" => d.i2c_frequency_hz = parse_int(value)?,
                "columns" => d.columns = parse_int(value)?,
                "rows" => d.rows = parse_int(value)?,
                _ => {}
            }
        }
        Section::Buzzer => {
            let b = &mut config.buzzer;
            match key {
                "tone_pin" => b.tone_pin = parse_pin(value)?,
                "relay_a_pin" => b.relay_a_pin = parse_pin(value)?,
                "relay_b_pin" => b.relay_b_pin = parse_pin(value)?,
                "default_level" => b.default_level = parse_level(value)?,
                "note" => b.note = parse_note(value)?,
                "tone_ms" => b.tone_ms = parse_int(value)?,
                _ => {}
            }
        }
        Section::Clock => {
            let c = &mut config.clock;
            match key {
                "poll_interval_ms" => c.poll_interval_ms = parse_int(value)?,
                "start" => c.start = parse_clock(value)?,
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_parse_pin() {
        let pin = parse_pin("gpio8").unwrap();
        assert_eq!(pin.pin, 8);
        assert!(!pin.inverted);
        assert!(!pin.pull_up);

        let pin = parse_pin("!gpio6").unwrap();
        assert_eq!(pin.pin, 6);
        assert!(pin.inverted);

        let pin = parse_pin("\"^!gpio2\"").unwrap();
        assert_eq!(pin.pin, 2);
        assert!(pin.inverted);
        assert!(pin.pull_up);

        assert_eq!(parse_pin("pin8"), Err(ParseError::InvalidPin));
        assert_eq!(parse_pin("gpio"), Err(ParseError::InvalidPin));
    }

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("buzzer"), Ok(Section::Buzzer));
        assert_eq!(parse_section_header(" clock "), Ok(Section::Clock));
        assert_eq!(parse_section_header("stepper"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_parse_hex_address() {
        assert_eq!(parse_hex_u8("0x3F"), Ok(0x3F));
        assert_eq!(parse_hex_u8("39"), Ok(39));
        assert_eq!(parse_hex_u8("0xZZ"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_inline_comment() {
        assert_eq!(parse_key_value("rows = 4 # lines"), Some(("rows", "4")));
        assert_eq!(
            parse_key_value("note = \"C#4\""),
            Some(("note", "\"C#4\""))
        );
        assert_eq!(parse_key_value("rows ="), None);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("# nothing\n"), Ok(DeviceConfig::new()));
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
version = 1

[serial]
tx_pin = "gpio0"
rx_pin = "gpio1"
baud_rate = 9_600
link_state_pin = "gpio2"

[display]
sda_pin = "gpio4"
scl_pin = "gpio5"
address = "0x3F"
columns = 20
rows = 4

[buzzer]
tone_pin = "gpio8"
relay_a_pin = "!gpio6"
relay_b_pin = "!gpio7"
default_level = 2
note = "C#4"
tone_ms = 300

[clock]
poll_interval_ms = 250
start = "2025-06-01 12:00"
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.serial.link_state_pin, Some(PinConfig::new(2)));
        assert_eq!(config.display.address, 0x3F);
        assert!(config.buzzer.relay_a_pin.inverted);
        assert_eq!(config.buzzer.default_level, BuzzerLevel::Medium);
        assert_eq!(config.buzzer.note, Note::Cs4);
        assert_eq!(config.buzzer.tone_ms, 300);
        assert_eq!(config.clock.poll_interval_ms, 250);
        assert_eq!(config.clock.start, WallClock::new(2025, 6, 1, 12, 0));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert_eq!(
            parse_config("[buzzer]\ndefault_level = 7\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[buzzer]\nnote = \"H4\"\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[clock]\nstart = \"yesterday\"\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(parse_config("[motor]\n"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_only_build_checked_keys_apply() {
        let config = parse_config("[serial]\nbaud = 19200\n[buzzer]\ntone_ms = 150\ntone = false\n")
            .unwrap();
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.buzzer.tone_ms, 150);
    }

    #[test]
    fn test_parsed_config_still_validated() {
        let config = parse_config("[buzzer]\nrelay_b_pin = \"gpio6\"\n").unwrap();
        assert_eq!(config.validate(), Err(ConfigError::DuplicatePin(6)));
    }
}
