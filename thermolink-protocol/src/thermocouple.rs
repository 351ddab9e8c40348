//! Thermocouple type codes
//!
//! Values match the TC TYPE field (low nibble of CR1) of the MAX31856
//! thermocouple-to-digital converter.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Thermocouple type selected with Configure-Thermocouple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ThermocoupleType {
    B,
    E,
    J,
    #[default]
    K,
    N,
    R,
    S,
    T,
    /// Voltage mode, gain 8
    VoltageGain8,
    /// Voltage mode, gain 32
    VoltageGain32,
}

// Wire format values
const TC_TYPE_B: u8 = 0x00;
const TC_TYPE_E: u8 = 0x01;
const TC_TYPE_J: u8 = 0x02;
const TC_TYPE_K: u8 = 0x03;
const TC_TYPE_N: u8 = 0x04;
const TC_TYPE_R: u8 = 0x05;
const TC_TYPE_S: u8 = 0x06;
const TC_TYPE_T: u8 = 0x07;
const TC_VMODE_G8: u8 = 0x08;
const TC_VMODE_G32: u8 = 0x0C;

impl ThermocoupleType {
    /// Parse a type from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            TC_TYPE_B => Some(ThermocoupleType::B),
            TC_TYPE_E => Some(ThermocoupleType::E),
            TC_TYPE_J => Some(ThermocoupleType::J),
            TC_TYPE_K => Some(ThermocoupleType::K),
            TC_TYPE_N => Some(ThermocoupleType::N),
            TC_TYPE_R => Some(ThermocoupleType::R),
            TC_TYPE_S => Some(ThermocoupleType::S),
            TC_TYPE_T => Some(ThermocoupleType::T),
            TC_VMODE_G8 => Some(ThermocoupleType::VoltageGain8),
            TC_VMODE_G32 => Some(ThermocoupleType::VoltageGain32),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            ThermocoupleType::B => TC_TYPE_B,
            ThermocoupleType::E => TC_TYPE_E,
            ThermocoupleType::J => TC_TYPE_J,
            ThermocoupleType::K => TC_TYPE_K,
            ThermocoupleType::N => TC_TYPE_N,
            ThermocoupleType::R => TC_TYPE_R,
            ThermocoupleType::S => TC_TYPE_S,
            ThermocoupleType::T => TC_TYPE_T,
            ThermocoupleType::VoltageGain8 => TC_VMODE_G8,
            ThermocoupleType::VoltageGain32 => TC_VMODE_G32,
        }
    }

    /// Returns true for the voltage measurement modes
    pub fn is_voltage_mode(&self) -> bool {
        matches!(
            self,
            ThermocoupleType::VoltageGain8 | ThermocoupleType::VoltageGain32
        )
    }
}
