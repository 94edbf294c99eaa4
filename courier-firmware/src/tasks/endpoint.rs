//! Endpoint task
//!
//! Owns the dispatcher and runs the poll loop, waking on a received line
//! or the poll interval, whichever comes first.

use defmt::*;
use embassy_futures::select::select;
use embassy_rp::gpio::Output;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Delay, Duration, Ticker};

use courier_core::dispatch::{DispatchError, Dispatcher, Outcome};
use courier_core::poll::{PollLoop, PollReport};
use courier_core::traits::{DisplayError, InputError};
use courier_drivers::actuator::GpioActuators;
use courier_drivers::lcd::Hd44780;

use crate::channels::LINE_READY;
use crate::clock::RtcClock;
use crate::input::ChannelLineSource;

/// Relay and buzzer outputs
pub type Actuators = GpioActuators<Output<'static>, Output<'static>, Output<'static>, Delay>;

/// Status LCD
pub type Lcd = Hd44780<I2c<'static, I2C0, Blocking>, Delay>;

/// Dispatcher on the board peripherals
pub type EndpointDispatcher = Dispatcher<Actuators, Lcd, RtcClock>;

/// Endpoint task - command dispatch and clock refresh
#[embassy_executor::task]
pub async fn endpoint_task(
    mut dispatcher: EndpointDispatcher,
    mut poll: PollLoop<ChannelLineSource>,
    poll_interval_ms: u32,
) {
    info!("Endpoint task started");

    let mut ticker = Ticker::every(Duration::from_millis(poll_interval_ms as u64));
    let mut link_down = false;

    loop {
        let report = poll.poll_once(&mut dispatcher);
        link_down = log_report(&report, link_down);

        if lcd_needs_init(&report) {
            match dispatcher.status_mut().display_mut().ensure_initialized() {
                Ok(true) => info!("LCD initialized"),
                Ok(false) => {}
                Err(e) => debug!("LCD init retry failed: {}", e),
            }
        }

        // Keep draining while the channel has items
        let took_item =
            report.line.is_some() || matches!(report.input_error, Some(InputError::Protocol(_)));
        if took_item {
            continue;
        }

        select(LINE_READY.wait(), ticker.next()).await;
    }
}

/// Whether a display write in this report hit an uninitialized LCD
fn lcd_needs_init(report: &PollReport) -> bool {
    report.command.as_ref().map_or(false, uninitialized) || uninitialized(&report.tick)
}

fn uninitialized<T>(result: &Result<T, DispatchError>) -> bool {
    matches!(result, Err(DispatchError::Display(DisplayError::NotInitialized)))
}

/// Log one poll report; returns whether the link is down
fn log_report(report: &PollReport, link_down: bool) -> bool {
    if let (Some(line), Some(result)) = (&report.line, &report.command) {
        match result {
            Ok(Outcome::Ignored) => debug!("Ignored '{=str}'", line.as_str()),
            Ok(outcome) => info!("'{=str}' -> {}", line.as_str(), outcome),
            Err(e) => warn!("'{=str}' rejected: {}", line.as_str(), e),
        }
    }

    let disconnected = match report.input_error {
        Some(InputError::Disconnected) => true,
        Some(InputError::Protocol(e)) => {
            warn!("Discarded input line: {}", e);
            link_down
        }
        None => false,
    };
    if disconnected != link_down {
        if disconnected {
            warn!("Serial link down");
        } else {
            info!("Serial link up");
        }
    }

    match report.tick {
        Ok(true) => trace!("Clock row refreshed"),
        Ok(false) => {}
        Err(e) => warn!("Clock refresh failed: {}", e),
    }

    disconnected
}
