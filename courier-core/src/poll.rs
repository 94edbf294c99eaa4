//! Poll loop
//!
//! One iteration takes at most one line from the input, dispatches it to
//! completion, then reads the clock and refreshes the current time row.
//! The clock step runs whether or not a line arrived, and no error from
//! either step stops the next iteration.

use courier_protocol::{Command, Line};

use crate::dispatch::{DispatchError, Dispatcher, Outcome};
use crate::traits::{ActuatorSink, ClockSource, InputError, LineDisplay, LineSource};

/// What happened during one poll iteration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollReport {
    /// Line taken from the input
    pub line: Option<Line>,
    /// Result of dispatching that line
    pub command: Option<Result<Outcome, DispatchError>>,
    /// Input failure, if the source reported one
    pub input_error: Option<InputError>,
    /// Clock step result; `Ok(true)` when the time row was redrawn
    pub tick: Result<bool, DispatchError>,
}

/// Poll loop over a line source
pub struct PollLoop<L> {
    source: L,
}

impl<L: LineSource> PollLoop<L> {
    /// Create a new poll loop
    pub fn new(source: L) -> Self {
        Self { source }
    }

    /// Get the line source
    pub fn source(&self) -> &L {
        &self.source
    }

    /// Get the line source mutably
    pub fn source_mut(&mut self) -> &mut L {
        &mut self.source
    }

    /// Run one iteration
    pub fn poll_once<S, D, C>(&mut self, dispatcher: &mut Dispatcher<S, D, C>) -> PollReport
    where
        S: ActuatorSink,
        D: LineDisplay,
        C: ClockSource,
    {
        let mut report = PollReport {
            line: None,
            command: None,
            input_error: None,
            tick: Ok(false),
        };

        match self.source.read_line() {
            Ok(Some(line)) => {
                report.command = Some(dispatcher.dispatch(&Command::parse(&line)));
                report.line = Some(line);
            }
            Ok(None) => {}
            Err(e) => report.input_error = Some(e),
        }

        report.tick = dispatcher
            .now()
            .map_err(DispatchError::from)
            .and_then(|now| dispatcher.tick(now));

        report
    }
}
