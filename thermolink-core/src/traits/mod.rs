//! Hardware abstraction traits
//!
//! These traits define the interface between command dispatch and the
//! hardware-specific actuator implementations.

pub mod actuator;

pub use actuator::{
    ActuatorError, Actuators, ControlMode, ControlSelector, PowerOutput, ThermocoupleConfigurator,
};
