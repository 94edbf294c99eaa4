//! Buzzer actuator traits

/// Discrete outputs behind the buzzer
///
/// The two relays switch series resistors in and out of the buzzer
/// supply, which is how the loudness levels are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Actuator {
    /// First level relay
    RelayA,
    /// Second level relay
    RelayB,
    /// Buzzer drive output
    Tone,
}

/// Errors that can occur when driving actuators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// The output pin reported a failure
    Pin,
    /// Tone frequency of zero
    InvalidFrequency,
}

/// Trait for the actuator sink driven by the buzzer controller
///
/// Implementations handle pin polarity; `active` is always the logical
/// state.
pub trait ActuatorSink {
    /// Switch one output on or off
    fn set_active(&mut self, actuator: Actuator, active: bool) -> Result<(), ActuatorError>;

    /// Check the logical state of an output
    fn is_active(&self, actuator: Actuator) -> bool;

    /// Generate a tone on the buzzer output
    ///
    /// Blocks for `duration_ms`. Afterwards the output returns to its
    /// logical state.
    fn play_tone(&mut self, frequency_hz: u16, duration_ms: u32) -> Result<(), ActuatorError>;
}
