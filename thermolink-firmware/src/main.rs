//! Thermolink - Heater Controller Endpoint Firmware
//!
//! Main firmware binary for RP2040-based boards. Answers fixed-size
//! command frames from the host on UART0 and drives the heater hardware:
//!
//! - MAX31856 thermocouple front-end (SPI0, CS GPIO17)
//! - MCP41xxx digital potentiometer for heater power (SPI0, CS GPIO21)
//! - Control mode relay (GPIO20, energised = closed-loop control)

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{self, BufferedInterruptHandler, Uart};
use embedded_hal_bus::spi::RefCellDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use thermolink_core::{Endpoint, EndpointConfig, Plant};
use thermolink_drivers::{ControlRelay, Max31856, Mcp41};
use thermolink_hal::{DataBits, Parity, StopBits, UartConfig};
// Named by the generated config initializer
use thermolink_protocol::ThermocoupleType;

mod tasks;

/// Endpoint settings generated from endpoint.toml by build.rs
const ENDPOINT_CONFIG: EndpointConfig = include!(concat!(env!("OUT_DIR"), "/endpoint_config.rs"));

/// SPI clock; the MAX31856 tops out at 5 MHz
const SPI_FREQUENCY_HZ: u32 = 1_000_000;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Thermolink firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = match ENDPOINT_CONFIG.validate() {
        Ok(()) => ENDPOINT_CONFIG,
        Err(e) => {
            warn!("Invalid endpoint config ({:?}), using defaults", e);
            EndpointConfig::default()
        }
    };

    // Host link (UART0: TX=GPIO0, RX=GPIO1)
    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config(&config.uart()));
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", config.baudrate);

    // Shared SPI0 bus (SCK=GPIO18, MOSI=GPIO19, MISO=GPIO16), mode 3
    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    spi_config.polarity = spi::Polarity::IdleHigh;
    spi_config.phase = spi::Phase::CaptureOnSecondTransition;
    let spi = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, spi_config);
    let spi_bus = RefCell::new(spi);

    let tc_cs = Output::new(p.PIN_17, Level::High);
    let pot_cs = Output::new(p.PIN_21, Level::High);
    let tc_spi = RefCellDevice::new_no_delay(&spi_bus, tc_cs).unwrap_or_else(|e| match e {});
    let pot_spi = RefCellDevice::new_no_delay(&spi_bus, pot_cs).unwrap_or_else(|e| match e {});

    let relay = ControlRelay::new_active_high(Output::new(p.PIN_20, Level::Low))
        .unwrap_or_else(|e| match e {});

    let mut plant = Plant::new(Max31856::new(tc_spi), Mcp41::new(pot_spi), relay);
    match plant.apply_config(&config) {
        Ok(()) => info!(
            "Heater configured: thermocouple={:?}, power={}",
            config.thermocouple, config.startup_power
        ),
        Err(e) => warn!("Failed to apply startup config: {:?}", e),
    }

    // Status LED (GPIO25 on the Pico)
    let led = Output::new(p.PIN_25, Level::Low);
    spawner.spawn(tasks::heartbeat_task(led)).unwrap();

    info!("All tasks spawned, serving host link");

    let endpoint = Endpoint::with_config(plant, &config);
    tasks::serve_link(rx, tx, endpoint).await
}

/// Translate the board-agnostic serial settings for the RP2040 UART
fn uart_config(config: &UartConfig) -> uart::Config {
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = config.baudrate;
    uart_config.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    uart_config.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    uart_config.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    uart_config
}
