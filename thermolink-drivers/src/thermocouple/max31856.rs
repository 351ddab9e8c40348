//! MAX31856 thermocouple-to-digital converter (SPI)
//!
//! Only the thermocouple type selection is driven from the link. The type
//! lives in the low nibble of CR1; the upper bits (averaging) are left as
//! they are.
//!
//! # SPI Protocol
//!
//! - SPI mode 1 or 3, up to 5 MHz
//! - Address byte first; bit 7 set for a write, clear for a read
//! - Registers auto-increment within one chip-select window

use embedded_hal::spi::{Operation, SpiDevice};
use thermolink_core::traits::{ActuatorError, ThermocoupleConfigurator};
use thermolink_protocol::ThermocoupleType;

/// MAX31856 register addresses (read addresses)
pub mod reg {
    /// Configuration 1 (averaging, thermocouple type)
    pub const CR1: u8 = 0x01;
    /// Fault status
    pub const SR: u8 = 0x0F;
}

/// Set on a register address to make the access a write
const WRITE_BIT: u8 = 0x80;

/// CR1 bits holding the thermocouple type
const TC_TYPE_MASK: u8 = 0x0F;

/// MAX31856 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Max31856Error<E> {
    /// SPI transfer failed
    Spi(E),
    /// CR1 read back differently from what was written (device absent?)
    VerifyFailed { wrote: u8, read: u8 },
}

/// MAX31856 driver
pub struct Max31856<SPI> {
    spi: SPI,
    kind: Option<ThermocoupleType>,
}

impl<SPI: SpiDevice> Max31856<SPI> {
    /// Create a new driver; no bus traffic until the first call
    pub fn new(spi: SPI) -> Self {
        Self { spi, kind: None }
    }

    /// Read one register
    pub fn read_register(&mut self, reg: u8) -> Result<u8, Max31856Error<SPI::Error>> {
        let mut value = [0u8; 1];
        self.spi
            .transaction(&mut [Operation::Write(&[reg]), Operation::Read(&mut value)])
            .map_err(Max31856Error::Spi)?;
        Ok(value[0])
    }

    /// Write one register
    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Max31856Error<SPI::Error>> {
        self.spi
            .write(&[reg | WRITE_BIT, value])
            .map_err(Max31856Error::Spi)
    }

    /// Select the thermocouple type
    ///
    /// Read-modify-write of CR1, followed by a read-back check.
    pub fn set_type(&mut self, kind: ThermocoupleType) -> Result<(), Max31856Error<SPI::Error>> {
        let cr1 = self.read_register(reg::CR1)?;
        let cr1 = (cr1 & !TC_TYPE_MASK) | kind.to_byte();
        self.write_register(reg::CR1, cr1)?;

        let read = self.read_register(reg::CR1)?;
        if read != cr1 {
            return Err(Max31856Error::VerifyFailed { wrote: cr1, read });
        }

        self.kind = Some(kind);
        Ok(())
    }

    /// Thermocouple type last applied successfully
    pub fn thermocouple_type(&self) -> Option<ThermocoupleType> {
        self.kind
    }

    /// Read the fault status register
    pub fn fault_status(&mut self) -> Result<u8, Max31856Error<SPI::Error>> {
        self.read_register(reg::SR)
    }

    /// Release the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiDevice> ThermocoupleConfigurator for Max31856<SPI> {
    fn set_thermocouple_type(&mut self, kind: ThermocoupleType) -> Result<(), ActuatorError> {
        self.set_type(kind).map_err(|_| ActuatorError::Fault)
    }
}
