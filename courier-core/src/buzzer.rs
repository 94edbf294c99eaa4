//! Buzzer level controller
//!
//! Loudness is selected with two relays in the buzzer supply path. Each
//! level maps to one fixed actuator pattern, looked up by the level's
//! ordinal:
//!
//! | level  | relay A   | relay B   | tone |
//! |--------|-----------|-----------|------|
//! | Mute   | untouched | untouched | off  |
//! | Low    | on        | untouched | on   |
//! | Medium | off       | on        | on   |
//! | High   | off       | off       | on   |

use courier_protocol::Note;

use crate::config::BuzzerConfig;
use crate::traits::{Actuator, ActuatorError, ActuatorSink};

/// Buzzer loudness levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerLevel {
    Mute = 0,
    #[default]
    Low = 1,
    Medium = 2,
    High = 3,
}

/// A level value outside 0..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangeError {
    /// The rejected value
    pub value: i32,
}

/// Output states for one buzzer level
///
/// `None` leaves that relay as it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorPattern {
    pub relay_a: Option<bool>,
    pub relay_b: Option<bool>,
    pub tone: bool,
}

/// Patterns indexed by level ordinal
const PATTERNS: [ActuatorPattern; 4] = [
    // Mute
    ActuatorPattern {
        relay_a: None,
        relay_b: None,
        tone: false,
    },
    // Low
    ActuatorPattern {
        relay_a: Some(true),
        relay_b: None,
        tone: true,
    },
    // Medium
    ActuatorPattern {
        relay_a: Some(false),
        relay_b: Some(true),
        tone: true,
    },
    // High
    ActuatorPattern {
        relay_a: Some(false),
        relay_b: Some(false),
        tone: true,
    },
];

impl BuzzerLevel {
    /// All levels in ordinal order
    pub const ALL: [BuzzerLevel; 4] = [
        BuzzerLevel::Mute,
        BuzzerLevel::Low,
        BuzzerLevel::Medium,
        BuzzerLevel::High,
    ];

    /// Level ordinal (0-3)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Look up a level by ordinal
    pub fn from_index(value: i32) -> Result<Self, RangeError> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(RangeError { value })
    }

    /// Actuator pattern for this level
    pub fn pattern(self) -> ActuatorPattern {
        PATTERNS[self as usize]
    }
}

impl TryFrom<i32> for BuzzerLevel {
    type Error = RangeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_index(value)
    }
}

/// Buzzer controller
///
/// Holds the selected level and note. Nothing is driven until
/// [`activate`](Self::activate) is called.
pub struct BuzzerController<S> {
    sink: S,
    level: BuzzerLevel,
    note: Note,
    tone_ms: u32,
}

impl<S: ActuatorSink> BuzzerController<S> {
    /// Create a new buzzer controller
    pub fn new(sink: S, config: &BuzzerConfig) -> Self {
        Self {
            sink,
            level: config.default_level,
            note: config.note,
            tone_ms: config.tone_ms,
        }
    }

    /// Get the selected level
    pub fn level(&self) -> BuzzerLevel {
        self.level
    }

    /// Get the selected note
    pub fn note(&self) -> Note {
        self.note
    }

    /// Get the actuator sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get the actuator sink mutably
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Select a level without driving any output
    pub fn set_level(&mut self, level: BuzzerLevel) {
        self.level = level;
    }

    /// Select the tone note without driving any output
    pub fn set_note(&mut self, note: Note) {
        self.note = note;
    }

    /// Drive the outputs for the selected level
    ///
    /// When the pattern turns the tone on and a tone duration is
    /// configured, the tone is played before returning.
    pub fn activate(&mut self) -> Result<(), ActuatorError> {
        let pattern = self.level.pattern();

        if let Some(active) = pattern.relay_a {
            self.sink.set_active(Actuator::RelayA, active)?;
        }
        if let Some(active) = pattern.relay_b {
            self.sink.set_active(Actuator::RelayB, active)?;
        }
        self.sink.set_active(Actuator::Tone, pattern.tone)?;

        if pattern.tone && self.tone_ms > 0 {
            self.sink.play_tone(self.note.frequency_hz(), self.tone_ms)?;
        }

        Ok(())
    }

    /// Select a level, then drive the outputs for it
    pub fn activate_at_level(&mut self, level: BuzzerLevel) -> Result<(), ActuatorError> {
        self.set_level(level);
        self.activate()
    }

    /// Turn the tone output off, keeping the selected level
    pub fn silence(&mut self) -> Result<(), ActuatorError> {
        self.sink.set_active(Actuator::Tone, false)
    }
}
