//! GPIO buzzer actuators
//!
//! Level relays and the buzzer drive output on plain GPIO pins (directly
//! or via transistor/relay boards). The tone is generated by toggling the
//! drive pin, which suits passive piezo buzzers.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use courier_core::config::{BuzzerConfig, PinConfig};
use courier_core::traits::{Actuator, ActuatorError, ActuatorSink};

/// One GPIO output with polarity handling
pub struct GpioOutput<P> {
    pin: P,
    /// If true, active = pin LOW
    inverted: bool,
    /// Current logical state
    active: bool,
}

impl<P: OutputPin> GpioOutput<P> {
    /// Create a new output, driven inactive
    pub fn new(pin: P, inverted: bool) -> Result<Self, ActuatorError> {
        let mut output = Self {
            pin,
            inverted,
            active: false,
        };
        output.set_active(false)?;
        Ok(output)
    }

    /// Create a new output using the polarity from a pin config
    pub fn from_config(pin: P, config: &PinConfig) -> Result<Self, ActuatorError> {
        Self::new(pin, config.inverted)
    }

    /// Set the logical state
    pub fn set_active(&mut self, active: bool) -> Result<(), ActuatorError> {
        self.drive(active)?;
        self.active = active;
        Ok(())
    }

    /// Get the logical state
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Drive the pin without changing the logical state
    fn drive(&mut self, active: bool) -> Result<(), ActuatorError> {
        let result = if active != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| ActuatorError::Pin)
    }
}

/// Buzzer actuators on GPIO
pub struct GpioActuators<A, B, T, D> {
    relay_a: GpioOutput<A>,
    relay_b: GpioOutput<B>,
    tone: GpioOutput<T>,
    delay: D,
}

impl<A, B, T, D> GpioActuators<A, B, T, D>
where
    A: OutputPin,
    B: OutputPin,
    T: OutputPin,
    D: DelayNs,
{
    /// Create the actuators with every output inactive
    pub fn new(
        relay_a: A,
        relay_b: B,
        tone: T,
        delay: D,
        config: &BuzzerConfig,
    ) -> Result<Self, ActuatorError> {
        Ok(Self {
            relay_a: GpioOutput::from_config(relay_a, &config.relay_a_pin)?,
            relay_b: GpioOutput::from_config(relay_b, &config.relay_b_pin)?,
            tone: GpioOutput::from_config(tone, &config.tone_pin)?,
            delay,
        })
    }
}

impl<A, B, T, D> ActuatorSink for GpioActuators<A, B, T, D>
where
    A: OutputPin,
    B: OutputPin,
    T: OutputPin,
    D: DelayNs,
{
    fn set_active(&mut self, actuator: Actuator, active: bool) -> Result<(), ActuatorError> {
        match actuator {
            Actuator::RelayA => self.relay_a.set_active(active),
            Actuator::RelayB => self.relay_b.set_active(active),
            Actuator::Tone => self.tone.set_active(active),
        }
    }

    fn is_active(&self, actuator: Actuator) -> bool {
        match actuator {
            Actuator::RelayA => self.relay_a.is_active(),
            Actuator::RelayB => self.relay_b.is_active(),
            Actuator::Tone => self.tone.is_active(),
        }
    }

    fn play_tone(&mut self, frequency_hz: u16, duration_ms: u32) -> Result<(), ActuatorError> {
        if frequency_hz == 0 {
            return Err(ActuatorError::InvalidFrequency);
        }

        let half_period_us = 500_000 / frequency_hz as u32;
        let cycles = duration_ms as u64 * frequency_hz as u64 / 1000;

        for _ in 0..cycles {
            self.tone.drive(true)?;
            self.delay.delay_us(half_period_us);
            self.tone.drive(false)?;
            self.delay.delay_us(half_period_us);
        }

        // Back to the logical state
        let active = self.tone.is_active();
        self.tone.drive(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Mock GPIO pin counting edges
    #[derive(Default)]
    struct MockPin {
        high: bool,
        rising_edges: u32,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            if !self.high {
                self.rising_edges += 1;
            }
            self.high = true;
            Ok(())
        }
    }

    /// Mock delay accumulating the requested time
    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    type TestActuators = GpioActuators<MockPin, MockPin, MockPin, MockDelay>;

    fn actuators(config: &BuzzerConfig) -> TestActuators {
        GpioActuators::new(
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
            MockDelay::default(),
            config,
        )
        .unwrap()
    }

    #[test]
    fn test_active_high_output() {
        let mut output = GpioOutput::new(MockPin::default(), false).unwrap();
        assert!(!output.is_active());
        assert!(!output.pin.high);

        output.set_active(true).unwrap();
        assert!(output.is_active());
        assert!(output.pin.high);
    }

    #[test]
    fn test_active_low_output() {
        let mut output = GpioOutput::new(MockPin::default(), true).unwrap();
        // Inactive drives the pin high
        assert!(output.pin.high);

        output.set_active(true).unwrap();
        assert!(output.is_active());
        assert!(!output.pin.high);
    }

    #[test]
    fn test_relay_polarity_from_config() {
        let config = BuzzerConfig {
            relay_a_pin: PinConfig::inverted(6),
            ..Default::default()
        };
        let mut act = actuators(&config);
        assert!(act.relay_a.pin.high);

        act.set_active(Actuator::RelayA, true).unwrap();
        assert!(act.is_active(Actuator::RelayA));
        assert!(!act.relay_a.pin.high);
        assert!(!act.is_active(Actuator::RelayB));
    }

    #[test]
    fn test_tone_cycles_and_duration() {
        let mut act = actuators(&BuzzerConfig::default());
        act.play_tone(440, 500).unwrap();

        assert_eq!(act.tone.pin.rising_edges, 220);
        // 220 cycles of two 1136 us half periods
        assert_eq!(act.delay.total_ns, 220 * 2 * 1136 * 1000);
        assert!(!act.tone.pin.high);
    }

    #[test]
    fn test_tone_restores_logical_state() {
        let mut act = actuators(&BuzzerConfig::default());
        act.set_active(Actuator::Tone, true).unwrap();
        act.play_tone(262, 100).unwrap();
        assert!(act.tone.pin.high);
        assert!(act.is_active(Actuator::Tone));
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let mut act = actuators(&BuzzerConfig::default());
        assert_eq!(act.play_tone(0, 100), Err(ActuatorError::InvalidFrequency));
        assert_eq!(act.delay.total_ns, 0);
    }
}
