//! Actuator traits
//!
//! Each physical collaborator exposes one synchronous setter. The
//! [`Actuators`] trait is what the dispatcher talks to; [`Plant`](crate::Plant)
//! builds one out of the individual pieces.

use thermolink_protocol::{RejectReason, ThermocoupleType};

/// Errors reported by an actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// The requested value cannot be applied
    InvalidArgument,
    /// The device did not accept the change (bus error, no response)
    Fault,
}

impl From<ActuatorError> for RejectReason {
    fn from(err: ActuatorError) -> Self {
        match err {
            ActuatorError::InvalidArgument => RejectReason::InvalidArgument,
            ActuatorError::Fault => RejectReason::ActuatorFault,
        }
    }
}

/// Who drives the heater output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlMode {
    /// External closed-loop controller
    Automatic,
    /// Fixed power level set over the link
    #[default]
    Manual,
}

/// Thermocouple front-end configuration
pub trait ThermocoupleConfigurator {
    /// Select the thermocouple type
    fn set_thermocouple_type(&mut self, kind: ThermocoupleType) -> Result<(), ActuatorError>;
}

/// Heater power output
pub trait PowerOutput {
    /// Set the power level (0 = off, 255 = full)
    fn set_power(&mut self, level: u8) -> Result<(), ActuatorError>;

    /// Stop delivering power
    ///
    /// Defaults to a power level of zero. Devices with a dedicated
    /// shutdown mode should override this.
    fn power_off(&mut self) -> Result<(), ActuatorError> {
        self.set_power(0)
    }
}

/// Selector between automatic and manual control (typically a relay)
pub trait ControlSelector {
    /// Route heater control to `mode`
    fn select_mode(&mut self, mode: ControlMode) -> Result<(), ActuatorError>;

    /// Currently selected mode
    fn mode(&self) -> ControlMode;
}

/// Everything the command dispatcher can act on
///
/// Mode selection and shutdown have no-op defaults so a board without a
/// control relay still acknowledges those commands.
pub trait Actuators {
    /// Configure-Thermocouple
    fn set_thermocouple_type(&mut self, kind: ThermocoupleType) -> Result<(), ActuatorError>;

    /// Set-Power
    fn set_power(&mut self, level: u8) -> Result<(), ActuatorError>;

    /// Enable-Automatic-Control / Enable-Manual-Control
    fn select_mode(&mut self, _mode: ControlMode) -> Result<(), ActuatorError> {
        Ok(())
    }

    /// Shutdown
    fn shutdown(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }
}

impl<A: Actuators + ?Sized> Actuators for &mut A {
    fn set_thermocouple_type(&mut self, kind: ThermocoupleType) -> Result<(), ActuatorError> {
        (**self).set_thermocouple_type(kind)
    }

    fn set_power(&mut self, level: u8) -> Result<(), ActuatorError> {
        (**self).set_power(level)
    }

    fn select_mode(&mut self, mode: ControlMode) -> Result<(), ActuatorError> {
        (**self).select_mode(mode)
    }

    fn shutdown(&mut self) -> Result<(), ActuatorError> {
        (**self).shutdown()
    }
}
