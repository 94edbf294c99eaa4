//! Courier - Delivery Notification Endpoint Firmware
//!
//! Main firmware binary for the RP2040 endpoint board. A phone app sends
//! short command lines over a Bluetooth SPP module; the endpoint shows
//! delivery status on a 20x4 LCD and sounds a relay-switched buzzer.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::rtc::Rtc;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use courier_core::config::{parse_config, DeviceConfig};
use courier_core::dispatch::Dispatcher;
use courier_core::poll::PollLoop;
use courier_drivers::actuator::GpioActuators;
use courier_drivers::lcd::Hd44780;

use crate::clock::RtcClock;
use crate::input::ChannelLineSource;

/// Embedded configuration (compiled into firmware)
/// Edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

mod channels;
mod clock;
mod input;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Courier endpoint starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    check_wiring(&config);

    // UART0 to the SPP module
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.serial.baud_rate;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();

    let link_state = config.serial.link_state_pin.map(|pin| {
        let pull = if pin.pull_up { Pull::Up } else { Pull::None };
        Input::new(p.PIN_2, pull)
    });
    let inverted = config
        .serial
        .link_state_pin
        .map_or(false, |pin| pin.inverted);

    info!("UART initialized at {} baud", config.serial.baud_rate);

    // I2C0 to the LCD backpack
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = config.display.i2c_frequency_hz;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);

    let mut lcd = Hd44780::new(i2c, Delay, &config.display);
    match lcd.init() {
        Ok(()) => info!("LCD initialized at {=u8:#x}", config.display.address),
        Err(e) => error!("LCD init failed: {}, retrying on first write", e),
    }

    // Level relays and buzzer
    let actuators = unwrap!(GpioActuators::new(
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_7, Level::Low),
        Output::new(p.PIN_8, Level::Low),
        Delay,
        &config.buzzer,
    ));

    // Wall clock
    let mut clock = RtcClock::new(Rtc::new(p.RTC));
    match clock.start_if_stopped(config.clock.start) {
        Ok(true) => info!("RTC started at {}", config.clock.start),
        Ok(false) => info!("RTC already running"),
        Err(e) => error!("RTC start failed: {}", e),
    }

    let dispatcher = Dispatcher::new(actuators, lcd, clock, &config.buzzer);
    let poll = PollLoop::new(ChannelLineSource::new(link_state, inverted));

    // Spawn tasks
    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner
        .spawn(tasks::endpoint_task(
            dispatcher,
            poll,
            config.clock.poll_interval_ms,
        ))
        .unwrap();

    info!("All tasks spawned, endpoint running");
}

/// Parse and validate the embedded configuration
///
/// Falls back to built-in defaults if the embedded TOML is broken, which
/// the build script should already have prevented.
fn load_config() -> DeviceConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            return DeviceConfig::new();
        }
    };

    match config.validate() {
        Ok(()) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Invalid embedded config: {}", e);
            error!("Using default configuration");
            DeviceConfig::new()
        }
    }
}

/// Warn when the config names pins other than the board wiring
///
/// Peripherals are bound to fixed pins above; the config supplies
/// polarity, pull-ups and the bus parameters.
fn check_wiring(config: &DeviceConfig) {
    let wiring = [
        ("serial.tx_pin", Some(config.serial.tx_pin), 0),
        ("serial.rx_pin", Some(config.serial.rx_pin), 1),
        ("serial.link_state_pin", config.serial.link_state_pin, 2),
        ("display.sda_pin", Some(config.display.sda_pin), 4),
        ("display.scl_pin", Some(config.display.scl_pin), 5),
        ("buzzer.relay_a_pin", Some(config.buzzer.relay_a_pin), 6),
        ("buzzer.relay_b_pin", Some(config.buzzer.relay_b_pin), 7),
        ("buzzer.tone_pin", Some(config.buzzer.tone_pin), 8),
    ];

    for (role, pin, wired) in wiring {
        if let Some(pin) = pin {
            if pin.pin != wired {
                warn!(
                    "{=str} is gpio{} in config but the board wires gpio{}",
                    role, pin.pin, wired
                );
            }
        }
    }
}
