//! Line-addressed character display trait

use heapless::String;

/// Widest character display supported (HD44780 controllers top out at 40)
pub const MAX_COLUMNS: usize = 40;

/// Errors that can occur with display communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transfer failed
    Bus,
    /// Row or column outside the display
    OutOfBounds,
    /// Display has not been initialized
    NotInitialized,
}

/// Trait for character displays addressed by row
///
/// The display is a grid of `columns` x `rows` character cells. Writing
/// starts at the cursor and advances along the row.
pub trait LineDisplay {
    /// Move the cursor
    ///
    /// - `row`: Row number (0-based)
    /// - `col`: Column number (0-based)
    fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError>;

    /// Write ASCII text at the cursor
    fn write_str(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Get the display dimensions as (columns, rows)
    fn dimensions(&self) -> (u8, u8);
}

/// Helper trait for whole-row updates
pub trait LineDisplayExt: LineDisplay {
    /// Replace the content of one row
    ///
    /// The text is truncated to the display width and padded with spaces,
    /// so whatever was on the row before is cleared. Other rows are not
    /// touched.
    fn rewrite_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        let (columns, rows) = self.dimensions();
        if row >= rows {
            return Err(DisplayError::OutOfBounds);
        }

        let width = (columns as usize).min(MAX_COLUMNS);
        let mut buf = String::<MAX_COLUMNS>::new();
        for c in text.chars().take(width) {
            let _ = buf.push(c);
        }
        while buf.len() < width {
            let _ = buf.push(' ');
        }

        self.set_cursor(row, 0)?;
        self.write_str(&buf)
    }
}

// Blanket implementation for all LineDisplay types
impl<T: LineDisplay> LineDisplayExt for T {}
