//! Message types for the Thermolink protocol
//!
//! Message codes are divided into two categories:
//! - Host → Endpoint: requests
//! - Endpoint → Host: acknowledgements (request code with bit 7 set) and
//!   the rejected acknowledgement

use crate::frame::{Frame, PAYLOAD_SIZE};
use crate::thermocouple::ThermocoupleType;

// Message codes: Host → Endpoint
pub const MSG_CONFIGURE_THERMOCOUPLE: u8 = 0x01;
pub const MSG_SET_POWER: u8 = 0x02;
pub const MSG_ENABLE_AUTOMATIC_CONTROL: u8 = 0x03;
pub const MSG_ENABLE_MANUAL_CONTROL: u8 = 0x04;
pub const MSG_SHUTDOWN: u8 = 0x05;

// Message codes: Endpoint → Host
pub const MSG_THERMOCOUPLE_ACK: u8 = MSG_CONFIGURE_THERMOCOUPLE | ACK_FLAG;
pub const MSG_POWER_ACK: u8 = MSG_SET_POWER | ACK_FLAG;
pub const MSG_AUTOMATIC_CONTROL_ACK: u8 = MSG_ENABLE_AUTOMATIC_CONTROL | ACK_FLAG;
pub const MSG_MANUAL_CONTROL_ACK: u8 = MSG_ENABLE_MANUAL_CONTROL | ACK_FLAG;
pub const MSG_SHUTDOWN_ACK: u8 = MSG_SHUTDOWN | ACK_FLAG;
pub const MSG_REJECTED: u8 = 0xEE;

/// Set on a request code to form its acknowledgement code
pub const ACK_FLAG: u8 = 0x80;

/// Payload index of the thermocouple configuration byte (CR1)
pub const CR1_INDEX: usize = 1;

/// Payload index of the power level byte
pub const POWER_INDEX: usize = 0;

/// Errors raised while interpreting a valid frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Command code is not a known request
    UnknownCommand(u8),
    /// Configure-Thermocouple carried an unsupported type code
    InvalidThermocoupleType(u8),
    /// Frame does not hold an acknowledgement
    NotAnAck(u8),
    /// Rejected acknowledgement carried an unknown reason byte
    UnknownRejectReason(u8),
}

/// Request command codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    ConfigureThermocouple,
    SetPower,
    EnableAutomaticControl,
    EnableManualControl,
    Shutdown,
}

impl Command {
    /// All request commands, in code order
    pub const ALL: [Command; 5] = [
        Command::ConfigureThermocouple,
        Command::SetPower,
        Command::EnableAutomaticControl,
        Command::EnableManualControl,
        Command::Shutdown,
    ];

    /// Parse a command from its wire code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            MSG_CONFIGURE_THERMOCOUPLE => Some(Command::ConfigureThermocouple),
            MSG_SET_POWER => Some(Command::SetPower),
            MSG_ENABLE_AUTOMATIC_CONTROL => Some(Command::EnableAutomaticControl),
            MSG_ENABLE_MANUAL_CONTROL => Some(Command::EnableManualControl),
            MSG_SHUTDOWN => Some(Command::Shutdown),
            _ => None,
        }
    }

    /// Request code
    pub fn code(self) -> u8 {
        match self {
            Command::ConfigureThermocouple => MSG_CONFIGURE_THERMOCOUPLE,
            Command::SetPower => MSG_SET_POWER,
            Command::EnableAutomaticControl => MSG_ENABLE_AUTOMATIC_CONTROL,
            Command::EnableManualControl => MSG_ENABLE_MANUAL_CONTROL,
            Command::Shutdown => MSG_SHUTDOWN,
        }
    }

    /// Code of the matching acknowledgement
    pub fn ack_code(self) -> u8 {
        self.code() | ACK_FLAG
    }
}

/// Host requests parsed from a decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    /// Select the thermocouple type
    ConfigureThermocouple(ThermocoupleType),
    /// Set the heater power level
    SetPower(u8),
    /// Hand heater control to the closed loop
    EnableAutomaticControl,
    /// Hand heater control to the power level set by the host
    EnableManualControl,
    /// Stop heating
    Shutdown,
}

impl Request {
    /// Parse a request from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, MessageError> {
        let command =
            Command::from_code(frame.command).ok_or(MessageError::UnknownCommand(frame.command))?;

        match command {
            Command::ConfigureThermocouple => {
                let byte = frame.payload[CR1_INDEX];
                let kind = ThermocoupleType::from_byte(byte)
                    .ok_or(MessageError::InvalidThermocoupleType(byte))?;
                Ok(Request::ConfigureThermocouple(kind))
            }
            Command::SetPower => Ok(Request::SetPower(frame.payload[POWER_INDEX])),
            Command::EnableAutomaticControl => Ok(Request::EnableAutomaticControl),
            Command::EnableManualControl => Ok(Request::EnableManualControl),
            Command::Shutdown => Ok(Request::Shutdown),
        }
    }

    /// Command this request belongs to
    pub fn command(&self) -> Command {
        match self {
            Request::ConfigureThermocouple(_) => Command::ConfigureThermocouple,
            Request::SetPower(_) => Command::SetPower,
            Request::EnableAutomaticControl => Command::EnableAutomaticControl,
            Request::EnableManualControl => Command::EnableManualControl,
            Request::Shutdown => Command::Shutdown,
        }
    }

    /// Encode this request into a frame (host side, or tests)
    pub fn to_frame(&self) -> Frame {
        let mut payload = [0u8; PAYLOAD_SIZE];
        match self {
            Request::ConfigureThermocouple(kind) => payload[CR1_INDEX] = kind.to_byte(),
            Request::SetPower(level) => payload[POWER_INDEX] = *level,
            _ => {}
        }
        Frame::new(self.command().code(), payload)
    }

    /// The acknowledgement sent back when the request succeeds
    pub fn ack(&self) -> Ack {
        match self {
            Request::ConfigureThermocouple(kind) => Ack::ThermocoupleConfigured(kind.to_byte()),
            Request::SetPower(level) => Ack::PowerSet(*level),
            Request::EnableAutomaticControl => Ack::AutomaticControlEnabled,
            Request::EnableManualControl => Ack::ManualControlEnabled,
            Request::Shutdown => Ack::ShutdownComplete,
        }
    }
}

/// Why a recognized request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RejectReason {
    /// Payload value is out of range for the command
    InvalidArgument,
    /// The actuator reported a failure
    ActuatorFault,
}

const REASON_INVALID_ARGUMENT: u8 = 0x01;
const REASON_ACTUATOR_FAULT: u8 = 0x02;

impl RejectReason {
    /// Parse a reason from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            REASON_INVALID_ARGUMENT => Some(RejectReason::InvalidArgument),
            REASON_ACTUATOR_FAULT => Some(RejectReason::ActuatorFault),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            RejectReason::InvalidArgument => REASON_INVALID_ARGUMENT,
            RejectReason::ActuatorFault => REASON_ACTUATOR_FAULT,
        }
    }
}

/// Acknowledgements sent from the endpoint to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ack {
    /// Echo of the configuration byte that was applied
    ThermocoupleConfigured(u8),
    /// Echo of the power level that was applied
    PowerSet(u8),
    AutomaticControlEnabled,
    ManualControlEnabled,
    ShutdownComplete,
    /// The request was recognized but could not be carried out
    Rejected {
        command: Command,
        reason: RejectReason,
    },
}

impl Ack {
    /// Encode this acknowledgement into a frame
    pub fn to_frame(&self) -> Frame {
        match self {
            Ack::ThermocoupleConfigured(cfg) => {
                let mut payload = [0u8; PAYLOAD_SIZE];
                payload[CR1_INDEX] = *cfg;
                Frame::new(MSG_THERMOCOUPLE_ACK, payload)
            }
            Ack::PowerSet(level) => {
                let mut payload = [0u8; PAYLOAD_SIZE];
                payload[POWER_INDEX] = *level;
                Frame::new(MSG_POWER_ACK, payload)
            }
            Ack::AutomaticControlEnabled => Frame::empty(MSG_AUTOMATIC_CONTROL_ACK),
            Ack::ManualControlEnabled => Frame::empty(MSG_MANUAL_CONTROL_ACK),
            Ack::ShutdownComplete => Frame::empty(MSG_SHUTDOWN_ACK),
            Ack::Rejected { command, reason } => {
                Frame::new(MSG_REJECTED, [command.code(), reason.to_byte(), 0, 0])
            }
        }
    }

    /// Parse an acknowledgement from a frame (host side, or tests)
    pub fn from_frame(frame: &Frame) -> Result<Self, MessageError> {
        match frame.command {
            MSG_THERMOCOUPLE_ACK => Ok(Ack::ThermocoupleConfigured(frame.payload[CR1_INDEX])),
            MSG_POWER_ACK => Ok(Ack::PowerSet(frame.payload[POWER_INDEX])),
            MSG_AUTOMATIC_CONTROL_ACK => Ok(Ack::AutomaticControlEnabled),
            MSG_MANUAL_CONTROL_ACK => Ok(Ack::ManualControlEnabled),
            MSG_SHUTDOWN_ACK => Ok(Ack::ShutdownComplete),
            MSG_REJECTED => {
                let command = Command::from_code(frame.payload[0])
                    .ok_or(MessageError::UnknownCommand(frame.payload[0]))?;
                let reason = RejectReason::from_byte(frame.payload[1])
                    .ok_or(MessageError::UnknownRejectReason(frame.payload[1]))?;
                Ok(Ack::Rejected { command, reason })
            }
            other => Err(MessageError::NotAnAck(other)),
        }
    }
}
