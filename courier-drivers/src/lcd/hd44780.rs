//! HD44780 character LCD on a PCF8574 I2C backpack
//!
//! The backpack exposes the LCD in 4-bit mode. Each I2C byte maps to the
//! expander outputs:
//!
//! | bit | 7  | 6  | 5  | 4  | 3         | 2  | 1  | 0  |
//! |-----|----|----|----|----|-----------|----|----|----|
//! |     | D7 | D6 | D5 | D4 | backlight | EN | RW | RS |
//!
//! A nibble is latched on the falling edge of EN, so every nibble is sent
//! as two expander writes: EN high, then EN low. At 100 kHz one expander
//! byte takes longer than the controller needs for any command except
//! clear and home, so only those are followed by an explicit delay.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use courier_core::config::DisplayHwConfig;
use courier_core::traits::{DisplayError, LineDisplay};

/// Expander bit assignments
mod bits {
    pub const RS: u8 = 0x01;
    pub const EN: u8 = 0x04;
    pub const BACKLIGHT: u8 = 0x08;
}

/// Controller commands
pub mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const ENTRY_MODE_INCREMENT: u8 = 0x06;
    pub const DISPLAY_ON: u8 = 0x0C;
    pub const FUNCTION_4BIT_2LINE: u8 = 0x28;
    pub const SET_DDRAM_ADDR: u8 = 0x80;
}

/// DDRAM address of the first cell of each row
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Substitute for characters the controller ROM cannot show
const REPLACEMENT: u8 = b'?';

/// HD44780 display driver
pub struct Hd44780<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    columns: u8,
    rows: u8,
    backlight: bool,
    initialized: bool,
}

impl<I2C: I2c, D: DelayNs> Hd44780<I2C, D> {
    /// Create a new driver; call [`init`](Self::init) before use
    pub fn new(i2c: I2C, delay: D, config: &DisplayHwConfig) -> Self {
        Self {
            i2c,
            delay,
            address: config.address,
            columns: config.columns,
            rows: config.rows.min(ROW_OFFSETS.len() as u8),
            backlight: true,
            initialized: false,
        }
    }

    /// Run the 4-bit initialization sequence and clear the display
    pub fn init(&mut self) -> Result<(), DisplayError> {
        // Power-on settle time
        self.delay.delay_ms(50);

        // Force 8-bit mode three times, then switch to 4-bit
        self.write_nibble(0x03, false)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x03, false)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x03, false)?;
        self.delay.delay_us(150);
        self.write_nibble(0x02, false)?;

        self.command(cmd::FUNCTION_4BIT_2LINE)?;
        self.command(cmd::DISPLAY_ON)?;
        self.clear()?;
        self.command(cmd::ENTRY_MODE_INCREMENT)?;

        self.initialized = true;
        Ok(())
    }

    /// Clear all rows
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(cmd::CLEAR)?;
        self.delay.delay_us(2000);
        Ok(())
    }

    /// Switch the backlight
    pub fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        self.backlight = on;
        let byte = if on { bits::BACKLIGHT } else { 0 };
        self.i2c
            .write(self.address, &[byte])
            .map_err(|_| DisplayError::Bus)
    }

    /// Run the init sequence unless it already completed
    ///
    /// Returns `true` when the sequence ran now.
    pub fn ensure_initialized(&mut self) -> Result<bool, DisplayError> {
        if self.initialized {
            return Ok(false);
        }
        self.init()?;
        Ok(true)
    }

    /// Check if the init sequence has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn command(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.write_byte(byte, false)
    }

    fn write_byte(&mut self, byte: u8, data: bool) -> Result<(), DisplayError> {
        self.write_nibble(byte >> 4, data)?;
        self.write_nibble(byte & 0x0F, data)
    }

    fn write_nibble(&mut self, nibble: u8, data: bool) -> Result<(), DisplayError> {
        let mut byte = (nibble & 0x0F) << 4;
        if data {
            byte |= bits::RS;
        }
        if self.backlight {
            byte |= bits::BACKLIGHT;
        }

        self.i2c
            .write(self.address, &[byte | bits::EN, byte])
            .map_err(|_| DisplayError::Bus)
    }
}

impl<I2C: I2c, D: DelayNs> LineDisplay for Hd44780<I2C, D> {
    fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        if row >= self.rows || col >= self.columns {
            return Err(DisplayError::OutOfBounds);
        }
        self.command(cmd::SET_DDRAM_ADDR | (ROW_OFFSETS[row as usize] + col))
    }

    fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        for c in text.chars() {
            let byte = if c.is_ascii() && !c.is_ascii_control() {
                c as u8
            } else {
                REPLACEMENT
            };
            self.write_byte(byte, true)?;
        }
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (self.columns, self.rows)
    }
}
