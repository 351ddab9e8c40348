//! MCP41xxx single-channel digital potentiometer (SPI)
//!
//! The wiper position sets the heater power reference: 0 is off, 255 is
//! full scale. Each access is a command byte followed by one data byte.

use embedded_hal::spi::SpiDevice;
use thermolink_core::traits::{ActuatorError, PowerOutput};

/// Write data to potentiometer 0
const CMD_WRITE_POT0: u8 = 0x11;

/// Put potentiometer 0 in shutdown (terminal A open, wiper to B)
const CMD_SHUTDOWN_POT0: u8 = 0x21;

/// MCP41xxx driver
pub struct Mcp41<SPI> {
    spi: SPI,
    wiper: u8,
    shut_down: bool,
}

impl<SPI: SpiDevice> Mcp41<SPI> {
    /// Create a new driver; the wiper is assumed at zero until written
    pub fn new(spi: SPI) -> Self {
        Self {
            spi,
            wiper: 0,
            shut_down: false,
        }
    }

    /// Move the wiper; also brings the device out of shutdown
    pub fn set_wiper(&mut self, value: u8) -> Result<(), SPI::Error> {
        self.spi.write(&[CMD_WRITE_POT0, value])?;
        self.wiper = value;
        self.shut_down = false;
        Ok(())
    }

    /// Enter hardware shutdown
    pub fn shutdown(&mut self) -> Result<(), SPI::Error> {
        // The data byte is ignored but the device needs all 16 clocks
        self.spi.write(&[CMD_SHUTDOWN_POT0, 0x00])?;
        self.wiper = 0;
        self.shut_down = true;
        Ok(())
    }

    /// Last wiper value written
    pub fn wiper(&self) -> u8 {
        self.wiper
    }

    /// True after [`Mcp41::shutdown`] until the next wiper write
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Release the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiDevice> PowerOutput for Mcp41<SPI> {
    fn set_power(&mut self, level: u8) -> Result<(), ActuatorError> {
        self.set_wiper(level).map_err(|_| ActuatorError::Fault)
    }

    fn power_off(&mut self) -> Result<(), ActuatorError> {
        self.shutdown().map_err(|_| ActuatorError::Fault)
    }
}
