//! Typed requests decoded from command triplets
//!
//! Routing table:
//! - `delivery` / `start` / minutes  → [`Request::DeliveryStart`]
//! - `delivery` / `end`              → [`Request::DeliveryEnd`]
//! - `buzzer` / `on/off` / `on|off`  → [`Request::BuzzerSwitch`]
//! - `buzzer` / `level` / `0..3`     → [`Request::BuzzerLevel`]
//! - `buzzer` / `scale` / note       → [`Request::BuzzerScale`]
//! - `motion` / any                  → [`Request::Motion`]
//! - `clock` / `set` / timestamp     → [`Request::ClockSet`]
//! - anything else                   → [`Request::Unhandled`]

use crate::command::{lenient_int, Command};

// Module names
pub const MODULE_DELIVERY: &str = "delivery";
pub const MODULE_BUZZER: &str = "buzzer";
pub const MODULE_MOTION: &str = "motion";
pub const MODULE_CLOCK: &str = "clock";

// Item names
pub const ITEM_START: &str = "start";
pub const ITEM_END: &str = "end";
pub const ITEM_ON_OFF: &str = "on/off";
pub const ITEM_LEVEL: &str = "level";
pub const ITEM_SCALE: &str = "scale";
pub const ITEM_SET: &str = "set";

// Switch values
pub const VALUE_ON: &str = "on";
pub const VALUE_OFF: &str = "off";

/// Errors that can occur while receiving or decoding a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Line has no module name
    EmptyModule,
    /// Item is missing or not known for the module
    UnknownItem,
    /// Value cannot be used for the item
    InvalidValue,
    /// Line exceeded the receive buffer
    LineTooLong,
    /// Line contained non-ASCII bytes
    InvalidEncoding,
}

/// Buzzer on/off switch value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Switch {
    On,
    Off,
}

/// Tone notes of the fourth octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Note {
    C4,
    Cs4,
    D4,
    Ds4,
    E4,
    F4,
    Fs4,
    G4,
    Gs4,
    #[default]
    A4,
    As4,
    B4,
}

/// (note, frequency in Hz, name, sharp spelling)
const NOTE_TABLE: [(Note, u16, &str, &str); 12] = [
    (Note::C4, 262, "C4", "C4"),
    (Note::Cs4, 277, "CS4", "C#4"),
    (Note::D4, 294, "D4", "D4"),
    (Note::Ds4, 311, "DS4", "D#4"),
    (Note::E4, 330, "E4", "E4"),
    (Note::F4, 349, "F4", "F4"),
    (Note::Fs4, 370, "FS4", "F#4"),
    (Note::G4, 392, "G4", "G4"),
    (Note::Gs4, 415, "GS4", "G#4"),
    (Note::A4, 440, "A4", "A4"),
    (Note::As4, 466, "AS4", "A#4"),
    (Note::B4, 494, "B4", "B4"),
];

impl Note {
    /// Tone frequency in Hz
    pub fn frequency_hz(self) -> u16 {
        NOTE_TABLE[self as usize].1
    }

    /// Canonical name (`A4`, `CS4`, ...)
    pub fn name(self) -> &'static str {
        NOTE_TABLE[self as usize].2
    }

    /// Look up a note by name, case-insensitive, `#` or `S` for sharps
    pub fn from_name(name: &str) -> Option<Self> {
        NOTE_TABLE
            .iter()
            .find(|(_, _, plain, sharp)| {
                name.eq_ignore_ascii_case(plain) || name.eq_ignore_ascii_case(sharp)
            })
            .map(|(note, ..)| *note)
    }
}

/// Date and time carried by a `clock,set` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockStamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

impl ClockStamp {
    /// Parse `YYYY-MM-DD HH:MM`
    pub fn parse(text: &str) -> Option<Self> {
        let (date, time) = text.trim().split_once(' ')?;
        let mut date_parts = date.split('-');
        let year = date_parts.next()?.parse().ok()?;
        let month: u8 = date_parts.next()?.parse().ok()?;
        let day: u8 = date_parts.next()?.parse().ok()?;
        if date_parts.next().is_some() {
            return None;
        }

        let (hour, minute) = time.trim().split_once(':')?;
        let hour: u8 = hour.parse().ok()?;
        let minute: u8 = minute.parse().ok()?;

        let valid = (1..=12).contains(&month)
            && (1..=31).contains(&day)
            && hour < 24
            && minute < 60;
        valid.then_some(Self {
            year,
            month,
            day,
            hour,
            minute,
        })
    }
}

/// A decoded command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request<'a> {
    /// Begin a delivery cycle, arrival expected in `offset_minutes`
    DeliveryStart { offset_minutes: u16 },
    /// Delivery arrived
    DeliveryEnd,
    /// Force the buzzer on or off
    BuzzerSwitch(Switch),
    /// Select a buzzer level; range is checked by the buzzer controller
    BuzzerLevel(i32),
    /// Select the tone note
    BuzzerScale(Note),
    /// Motion detected at the door
    Motion,
    /// Set the wall clock
    ClockSet(ClockStamp),
    /// Module this endpoint has no handler for
    Unhandled { module: &'a str },
}

impl<'a> Request<'a> {
    /// Decode a parsed command
    ///
    /// Numeric values are converted leniently (see [`lenient_int`]).
    /// Negative arrival offsets clamp to 0.
    pub fn from_command(cmd: &Command<'a>) -> Result<Self, ProtocolError> {
        match cmd.module {
            "" => Err(ProtocolError::EmptyModule),
            MODULE_DELIVERY => match cmd.item {
                ITEM_START => {
                    let minutes = lenient_int(cmd.value).max(0);
                    let offset_minutes = u16::try_from(minutes).unwrap_or(u16::MAX);
                    Ok(Request::DeliveryStart { offset_minutes })
                }
                ITEM_END => Ok(Request::DeliveryEnd),
                _ => Err(ProtocolError::UnknownItem),
            },
            MODULE_BUZZER => match cmd.item {
                ITEM_ON_OFF => match cmd.value {
                    VALUE_ON => Ok(Request::BuzzerSwitch(Switch::On)),
                    VALUE_OFF => Ok(Request::BuzzerSwitch(Switch::Off)),
                    _ => Err(ProtocolError::InvalidValue),
                },
                ITEM_LEVEL => Ok(Request::BuzzerLevel(lenient_int(cmd.value))),
                ITEM_SCALE => Note::from_name(cmd.value)
                    .map(Request::BuzzerScale)
                    .ok_or(ProtocolError::InvalidValue),
                _ => Err(ProtocolError::UnknownItem),
            },
            MODULE_MOTION => Ok(Request::Motion),
            MODULE_CLOCK => match cmd.item {
                ITEM_SET => ClockStamp::parse(cmd.value)
                    .map(Request::ClockSet)
                    .ok_or(ProtocolError::InvalidValue),
                _ => Err(ProtocolError::UnknownItem),
            },
            module => Ok(Request::Unhandled { module }),
        }
    }

    /// Parse and decode a raw line in one step
    pub fn from_line(line: &'a str) -> Result<Self, ProtocolError> {
        Self::from_command(&Command::parse(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_requests() {
        assert_eq!(
            Request::from_line("delivery,start,45"),
            Ok(Request::DeliveryStart { offset_minutes: 45 })
        );
        assert_eq!(Request::from_line("delivery,end,"), Ok(Request::DeliveryEnd));
        assert_eq!(
            Request::from_line("delivery,pause,"),
            Err(ProtocolError::UnknownItem)
        );
        assert_eq!(Request::from_line("delivery"), Err(ProtocolError::UnknownItem));
    }

    #[test]
    fn test_delivery_offset_is_lenient() {
        assert_eq!(
            Request::from_line("delivery,start,soon"),
            Ok(Request::DeliveryStart { offset_minutes: 0 })
        );
        assert_eq!(
            Request::from_line("delivery,start,-10"),
            Ok(Request::DeliveryStart { offset_minutes: 0 })
        );
        assert_eq!(
            Request::from_line("delivery,start,100000"),
            Ok(Request::DeliveryStart {
                offset_minutes: u16::MAX
            })
        );
    }

    #[test]
    fn test_buzzer_requests() {
        assert_eq!(
            Request::from_line("buzzer,on/off,on"),
            Ok(Request::BuzzerSwitch(Switch::On))
        );
        assert_eq!(
            Request::from_line("buzzer,on/off,off"),
            Ok(Request::BuzzerSwitch(Switch::Off))
        );
        assert_eq!(
            Request::from_line("buzzer,on/off,maybe"),
            Err(ProtocolError::InvalidValue)
        );
        assert_eq!(
            Request::from_line("buzzer,level,9"),
            Ok(Request::BuzzerLevel(9))
        );
        assert_eq!(
            Request::from_line("buzzer,volume,3"),
            Err(ProtocolError::UnknownItem)
        );
    }

    #[test]
    fn test_buzzer_scale() {
        assert_eq!(
            Request::from_line("buzzer,scale,c#4"),
            Ok(Request::BuzzerScale(Note::Cs4))
        );
        assert_eq!(
            Request::from_line("buzzer,scale,H4"),
            Err(ProtocolError::InvalidValue)
        );
    }

    #[test]
    fn test_motion_ignores_item_and_value() {
        assert_eq!(Request::from_line("motion,,"), Ok(Request::Motion));
        assert_eq!(Request::from_line("motion,front,1"), Ok(Request::Motion));
    }

    #[test]
    fn test_unhandled_and_empty_module() {
        assert_eq!(
            Request::from_line("lcd,time,"),
            Ok(Request::Unhandled { module: "lcd" })
        );
        assert_eq!(Request::from_line(",start,1"), Err(ProtocolError::EmptyModule));
    }

    #[test]
    fn test_clock_set() {
        assert_eq!(
            Request::from_line("clock,set,2024-05-01 13:45"),
            Ok(Request::ClockSet(ClockStamp {
                year: 2024,
                month: 5,
                day: 1,
                hour: 13,
                minute: 45,
            }))
        );
        assert_eq!(
            Request::from_line("clock,set,2024-13-01 13:45"),
            Err(ProtocolError::InvalidValue)
        );
        assert_eq!(
            Request::from_line("clock,set,13:45"),
            Err(ProtocolError::InvalidValue)
        );
    }

    #[test]
    fn test_note_frequencies() {
        assert_eq!(Note::default(), Note::A4);
        assert_eq!(Note::A4.frequency_hz(), 440);
        assert_eq!(Note::C4.frequency_hz(), 262);
        assert_eq!(Note::B4.frequency_hz(), 494);
        assert_eq!(Note::Fs4.name(), "FS4");
        assert_eq!(Note::from_name("fs4"), Some(Note::Fs4));
    }
}
