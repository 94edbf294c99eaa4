//! Hardware configuration types
//!
//! Pin roles, serial link, display geometry, buzzer defaults and clock
//! polling. Defaults match the reference wiring of the endpoint board.

use courier_protocol::Note;

use crate::buzzer::BuzzerLevel;
use crate::status::LINE_COUNT;
use crate::time::WallClock;
use crate::traits::MAX_COLUMNS;

/// Highest GPIO number on the RP2040
pub const MAX_GPIO: u8 = 29;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create a pin with pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: true,
        }
    }

    /// Physical level for a logical state
    pub fn level_for(&self, active: bool) -> bool {
        active != self.inverted
    }
}

/// Serial (Bluetooth SPP module) link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialHwConfig {
    /// UART TX pin (to module RX)
    pub tx_pin: PinConfig,
    /// UART RX pin (from module TX)
    pub rx_pin: PinConfig,
    /// Baud rate
    pub baud_rate: u32,
    /// Module link-state output, high while a peer is connected
    pub link_state_pin: Option<PinConfig>,
}

impl Default for SerialHwConfig {
    fn default() -> Self {
        Self {
            tx_pin: PinConfig::new(0),
            rx_pin: PinConfig::new(1),
            baud_rate: 9600,
            link_state_pin: None,
        }
    }
}

/// Character LCD configuration (HD44780 behind a PCF8574 backpack)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayHwConfig {
    /// I2C SDA pin
    pub sda_pin: PinConfig,
    /// I2C SCL pin
    pub scl_pin: PinConfig,
    /// 7-bit I2C address of the backpack
    pub address: u8,
    /// I2C bus frequency
    pub i2c_frequency_hz: u32,
    /// Characters per row
    pub columns: u8,
    /// Number of rows
    pub rows: u8,
}

impl Default for DisplayHwConfig {
    fn default() -> Self {
        Self {
            sda_pin: PinConfig::new(4),
            scl_pin: PinConfig::new(5),
            address: 0x27,
            i2c_frequency_hz: 100_000,
            columns: 20,
            rows: 4,
        }
    }
}

/// Buzzer and level relay configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BuzzerConfig {
    /// Buzzer drive pin
    pub tone_pin: PinConfig,
    /// First level relay
    pub relay_a_pin: PinConfig,
    /// Second level relay
    pub relay_b_pin: PinConfig,
    /// Level selected at boot
    pub default_level: BuzzerLevel,
    /// Note selected at boot
    pub note: Note,
    /// Duration of a generated tone; 0 drives the pin as a plain output
    pub tone_ms: u32,
}

impl Default for BuzzerConfig {
    fn default() -> Self {
        Self {
            tone_pin: PinConfig::new(8),
            relay_a_pin: PinConfig::new(6),
            relay_b_pin: PinConfig::new(7),
            default_level: BuzzerLevel::Low,
            note: Note::A4,
            tone_ms: 0,
        }
    }
}

/// Clock configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Poll loop period when no line arrives
    pub poll_interval_ms: u32,
    /// Time loaded into a clock that is not running at boot
    pub start: WallClock,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            start: WallClock::new(2024, 1, 1, 0, 0),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// GPIO number does not exist
    InvalidPin(u8),
    /// Same GPIO assigned to two roles
    DuplicatePin(u8),
    /// Baud rate of zero
    InvalidBaudRate,
    /// I2C address outside the 7-bit range
    InvalidAddress,
    /// Display too small for the status rows
    DisplayTooSmall,
    /// Display wider than any supported controller
    DisplayTooWide,
    /// Poll interval of zero
    InvalidPollInterval,
    /// Start time out of range
    InvalidStartTime,
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Config format version
    pub version: u8,
    pub serial: SerialHwConfig,
    pub display: DisplayHwConfig,
    pub buzzer: BuzzerConfig,
    pub clock: ClockConfig,
}

impl DeviceConfig {
    /// Current config format version
    pub const VERSION: u8 = 1;

    /// Create the default configuration
    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            ..Default::default()
        }
    }

    /// Check the configuration for inconsistencies
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut pins = heapless::Vec::<u8, 8>::new();
        let roles = [
            Some(self.serial.tx_pin),
            Some(self.serial.rx_pin),
            self.serial.link_state_pin,
            Some(self.display.sda_pin),
            Some(self.display.scl_pin),
            Some(self.buzzer.tone_pin),
            Some(self.buzzer.relay_a_pin),
            Some(self.buzzer.relay_b_pin),
        ];
        for pin in roles.into_iter().flatten() {
            if pin.pin > MAX_GPIO {
                return Err(ConfigError::InvalidPin(pin.pin));
            }
            if pins.contains(&pin.pin) {
                return Err(ConfigError::DuplicatePin(pin.pin));
            }
            let _ = pins.push(pin.pin);
        }

        if self.serial.baud_rate == 0 {
            return Err(ConfigError::InvalidBaudRate);
        }
        if self.display.address > 0x7F {
            return Err(ConfigError::InvalidAddress);
        }
        if (self.display.rows as usize) < LINE_COUNT || self.display.columns < 20 {
            return Err(ConfigError::DisplayTooSmall);
        }
        if self.display.columns as usize > MAX_COLUMNS {
            return Err(ConfigError::DisplayTooWide);
        }
        if self.clock.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidPollInterval);
        }
        if !self.clock.start.is_valid_reading() {
            return Err(ConfigError::InvalidStartTime);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DeviceConfig::new();
        assert_eq!(config.version, DeviceConfig::VERSION);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.display.address, 0x27);
        assert_eq!(config.buzzer.default_level, BuzzerLevel::Low);
    }

    #[test]
    fn test_pin_polarity() {
        assert!(PinConfig::new(3).level_for(true));
        assert!(!PinConfig::inverted(3).level_for(true));
        assert!(PinConfig::inverted(3).level_for(false));
    }

    #[test]
    fn test_duplicate_pin_rejected() {
        let mut config = DeviceConfig::new();
        config.buzzer.relay_b_pin = PinConfig::new(6);
        assert_eq!(config.validate(), Err(ConfigError::DuplicatePin(6)));

        let mut config = DeviceConfig::new();
        config.serial.link_state_pin = Some(PinConfig::new(4));
        assert_eq!(config.validate(), Err(ConfigError::DuplicatePin(4)));
    }

    #[test]
    fn test_invalid_pin_rejected() {
        let mut config = DeviceConfig::new();
        config.buzzer.tone_pin = PinConfig::new(30);
        assert_eq!(config.validate(), Err(ConfigError::InvalidPin(30)));
    }

    #[test]
    fn test_display_geometry() {
        let mut config = DeviceConfig::new();
        config.display.rows = 2;
        assert_eq!(config.validate(), Err(ConfigError::DisplayTooSmall));

        let mut config = DeviceConfig::new();
        config.display.columns = 16;
        assert_eq!(config.validate(), Err(ConfigError::DisplayTooSmall));

        let mut config = DeviceConfig::new();
        config.display.columns = 41;
        assert_eq!(config.validate(), Err(ConfigError::DisplayTooWide));
    }

    #[test]
    fn test_invalid_start_time() {
        let mut config = DeviceConfig::new();
        config.clock.start = WallClock::default();
        assert_eq!(config.validate(), Err(ConfigError::InvalidStartTime));
    }
}
