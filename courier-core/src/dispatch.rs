//! Command dispatcher
//!
//! Owns every piece of mutable endpoint state (buzzer level and note,
//! display slots, delivery cycle) and routes decoded requests to it.
//!
//! | request              | effect                                         |
//! |----------------------|------------------------------------------------|
//! | delivery start       | new cycle, silence buzzer, render time rows    |
//! | delivery end         | completion row, sound buzzer at current level  |
//! | buzzer on / off      | activate at current level / silence            |
//! | buzzer level         | select level only                              |
//! | buzzer scale         | select note only                               |
//! | motion               | motion row                                     |
//! | clock set            | set clock source, redraw current time row      |

use courier_protocol::{Command, Note, ProtocolError, Request, Switch};

use crate::buzzer::{BuzzerController, BuzzerLevel, RangeError};
use crate::config::BuzzerConfig;
use crate::state::{DeliveryEvent, DeliveryState};
use crate::status::{StatusBoard, StatusEvent};
use crate::time::{TimeService, WallClock};
use crate::traits::{
    ActuatorError, ActuatorSink, ClockError, ClockSource, DisplayError, LineDisplay,
};

/// Result of a successfully handled command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Delivery cycle started
    DeliveryStarted {
        offset_minutes: u16,
        expected: WallClock,
    },
    /// Delivery completed and buzzer sounded
    DeliveryCompleted,
    /// Buzzer driven at the given level
    BuzzerActivated(BuzzerLevel),
    /// Buzzer tone turned off
    BuzzerSilenced,
    /// Level stored for the next activation
    LevelSelected(BuzzerLevel),
    /// Note stored for the next activation
    NoteSelected(Note),
    /// Motion shown on the display
    MotionRecorded,
    /// Clock source set
    ClockSet(WallClock),
    /// Command for a module this endpoint does not handle
    Ignored,
}

/// Errors from handling one command or clock tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// Malformed or unknown command
    Protocol(ProtocolError),
    /// Buzzer level out of range
    Range(RangeError),
    /// Display write failed
    Display(DisplayError),
    /// Clock read or set failed
    Clock(ClockError),
    /// Actuator output failed
    Actuator(ActuatorError),
}

impl From<ProtocolError> for DispatchError {
    fn from(e: ProtocolError) -> Self {
        DispatchError::Protocol(e)
    }
}

impl From<RangeError> for DispatchError {
    fn from(e: RangeError) -> Self {
        DispatchError::Range(e)
    }
}

impl From<DisplayError> for DispatchError {
    fn from(e: DisplayError) -> Self {
        DispatchError::Display(e)
    }
}

impl From<ClockError> for DispatchError {
    fn from(e: ClockError) -> Self {
        DispatchError::Clock(e)
    }
}

impl From<ActuatorError> for DispatchError {
    fn from(e: ActuatorError) -> Self {
        DispatchError::Actuator(e)
    }
}

/// Command dispatcher
pub struct Dispatcher<S, D, C> {
    buzzer: BuzzerController<S>,
    status: StatusBoard<D>,
    time: TimeService<C>,
    delivery: DeliveryState,
}

impl<S, D, C> Dispatcher<S, D, C>
where
    S: ActuatorSink,
    D: LineDisplay,
    C: ClockSource,
{
    /// Create a new dispatcher
    pub fn new(sink: S, display: D, clock: C, config: &BuzzerConfig) -> Self {
        Self {
            buzzer: BuzzerController::new(sink, config),
            status: StatusBoard::new(display),
            time: TimeService::new(clock),
            delivery: DeliveryState::Idle,
        }
    }

    /// Decode and handle one parsed command
    pub fn dispatch(&mut self, cmd: &Command<'_>) -> Result<Outcome, DispatchError> {
        let request = Request::from_command(cmd)?;
        self.handle(request)
    }

    /// Handle one decoded request
    pub fn handle(&mut self, request: Request<'_>) -> Result<Outcome, DispatchError> {
        match request {
            Request::DeliveryStart { offset_minutes } => {
                let now = self.time.now()?;
                self.buzzer.silence()?;
                self.delivery = self
                    .delivery
                    .transition(DeliveryEvent::Started { offset_minutes });

                self.status.handle(StatusEvent::Init {
                    now,
                    offset_minutes,
                })?;

                Ok(Outcome::DeliveryStarted {
                    offset_minutes,
                    expected: now.with_offset_minutes(offset_minutes),
                })
            }
            Request::DeliveryEnd => {
                // The buzzer sounds even when the display write fails
                let shown = self.status.handle(StatusEvent::DeliveryComplete);
                self.delivery = self.delivery.transition(DeliveryEvent::Completed);
                self.buzzer.activate()?;
                shown?;
                Ok(Outcome::DeliveryCompleted)
            }
            Request::BuzzerSwitch(Switch::On) => {
                self.buzzer.activate()?;
                Ok(Outcome::BuzzerActivated(self.buzzer.level()))
            }
            Request::BuzzerSwitch(Switch::Off) => {
                self.buzzer.silence()?;
                Ok(Outcome::BuzzerSilenced)
            }
            Request::BuzzerLevel(raw) => {
                let level = BuzzerLevel::try_from(raw)?;
                self.buzzer.set_level(level);
                Ok(Outcome::LevelSelected(level))
            }
            Request::BuzzerScale(note) => {
                self.buzzer.set_note(note);
                Ok(Outcome::NoteSelected(note))
            }
            Request::Motion => {
                self.delivery = self.delivery.transition(DeliveryEvent::Motion);
                self.status.handle(StatusEvent::MotionDetected)?;
                Ok(Outcome::MotionRecorded)
            }
            Request::ClockSet(stamp) => {
                let clock = WallClock::from(stamp);
                self.time.set(clock)?;
                self.status.redraw_now(clock)?;
                Ok(Outcome::ClockSet(clock))
            }
            Request::Unhandled { .. } => Ok(Outcome::Ignored),
        }
    }

    /// Read the clock source
    pub fn now(&mut self) -> Result<WallClock, ClockError> {
        self.time.now()
    }

    /// Redraw the current time row if the minute changed
    ///
    /// Returns `true` when the row was rewritten.
    pub fn tick(&mut self, now: WallClock) -> Result<bool, DispatchError> {
        let shown = self.status.last_minute();
        self.status.handle(StatusEvent::TimeTick(now))?;
        Ok(self.status.last_minute() != shown)
    }

    /// Arrival offset of the delivery in progress
    pub fn arrival_offset(&self) -> Option<u16> {
        self.delivery.offset_minutes()
    }

    /// Current delivery state
    pub fn delivery(&self) -> DeliveryState {
        self.delivery
    }

    /// Get the buzzer controller
    pub fn buzzer(&self) -> &BuzzerController<S> {
        &self.buzzer
    }

    /// Get the status board
    pub fn status(&self) -> &StatusBoard<D> {
        &self.status
    }

    /// Get the status board mutably
    pub fn status_mut(&mut self) -> &mut StatusBoard<D> {
        &mut self.status
    }

    /// Get the time service
    pub fn time(&self) -> &TimeService<C> {
        &self.time
    }

    /// Get the time service mutably
    pub fn time_mut(&mut self) -> &mut TimeService<C> {
        &mut self.time
    }
}
