//! Endpoint configuration
//!
//! Board-agnostic settings applied at startup. The firmware fills this in
//! from its `endpoint.toml`.

use thermolink_hal::UartConfig;
use thermolink_protocol::ThermocoupleType;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lowest baud rate accepted by [`EndpointConfig::validate`]
pub const MIN_BAUDRATE: u32 = 1200;

/// Highest baud rate accepted by [`EndpointConfig::validate`]
pub const MAX_BAUDRATE: u32 = 921_600;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Baud rate outside [`MIN_BAUDRATE`]..=[`MAX_BAUDRATE`]
    InvalidBaudrate(u32),
}

/// Endpoint configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EndpointConfig {
    /// Serial link baud rate
    pub baudrate: u32,
    /// Thermocouple type applied at boot
    pub thermocouple: ThermocoupleType,
    /// Power level applied at boot
    pub startup_power: u8,
    /// Drop a half-received frame when the host (re)connects
    pub reset_on_connect: bool,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            thermocouple: ThermocoupleType::K,
            startup_power: 0,
            reset_on_connect: true,
        }
    }
}

impl EndpointConfig {
    /// Check the settings for values the hardware cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BAUDRATE..=MAX_BAUDRATE).contains(&self.baudrate) {
            return Err(ConfigError::InvalidBaudrate(self.baudrate));
        }
        Ok(())
    }

    /// Serial settings for the transport (8N1 at the configured rate)
    pub fn uart(&self) -> UartConfig {
        UartConfig::with_baudrate(self.baudrate)
    }
}
