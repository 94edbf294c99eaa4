//! Command triplet parsing
//!
//! A command line is split into `module`, `item` and `value`:
//! - `module` is the text before the first comma
//! - `item` is the text between the first and second comma
//! - `value` is everything after the second comma, verbatim
//!
//! Missing fields degrade to empty strings. Parsing never fails; the
//! decision whether a triplet means anything is made by
//! [`Request::from_command`](crate::Request::from_command).

/// A command split into its three fields
///
/// Fields borrow from the input line and are trimmed of whitespace and of
/// stray separator commas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command<'a> {
    /// Subsystem name (`delivery`, `buzzer`, `motion`, ...)
    pub module: &'a str,
    /// Action within the module (`start`, `level`, ...)
    pub item: &'a str,
    /// Free-form payload
    pub value: &'a str,
}

impl<'a> Command<'a> {
    /// Split one line into a command
    pub fn parse(line: &'a str) -> Self {
        let (module, rest) = match line.find(',') {
            Some(first) => (&line[..first], Some(&line[first + 1..])),
            None => (line, None),
        };

        let (item, value) = match rest {
            Some(rest) => match rest.find(',') {
                Some(second) => (&rest[..second], &rest[second + 1..]),
                None => (rest, ""),
            },
            None => ("", ""),
        };

        Self {
            module: clean_field(module),
            item: clean_field(item),
            value: clean_field(value),
        }
    }

    /// Check whether all three fields are empty
    pub fn is_empty(&self) -> bool {
        self.module.is_empty() && self.item.is_empty() && self.value.is_empty()
    }
}

/// Strip whitespace and separators left at the edges of a field
fn clean_field(field: &str) -> &str {
    field.trim().trim_matches(',').trim()
}

/// Convert a value field to an integer the way the sender expects
///
/// Leading whitespace, an optional sign and the leading run of digits are
/// used; anything else is ignored. Text without leading digits yields 0.
/// Out-of-range values saturate.
pub fn lenient_int(value: &str) -> i32 {
    let bytes = value.trim_start().as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };

    let mut result: i32 = 0;
    for &byte in digits.iter().take_while(|b| b.is_ascii_digit()) {
        let digit = (byte - b'0') as i32;
        result = if negative {
            result.saturating_mul(10).saturating_sub(digit)
        } else {
            result.saturating_mul(10).saturating_add(digit)
        };
    }
    result
}
