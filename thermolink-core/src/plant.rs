//! Heater plant
//!
//! Bundles the thermocouple front-end, the power output and the control
//! selector into one [`Actuators`] implementation for the dispatcher.

use thermolink_protocol::ThermocoupleType;

use crate::config::EndpointConfig;
use crate::traits::{
    ActuatorError, Actuators, ControlMode, ControlSelector, PowerOutput, ThermocoupleConfigurator,
};

/// Control selector for boards without a relay
///
/// Accepts every mode change and remembers the last one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRelay {
    mode: ControlMode,
}

impl ControlSelector for NoRelay {
    fn select_mode(&mut self, mode: ControlMode) -> Result<(), ActuatorError> {
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> ControlMode {
        self.mode
    }
}

/// The physical heater: thermocouple, power output and control selector
pub struct Plant<T, P, R = NoRelay> {
    thermocouple: T,
    power: P,
    selector: R,
}

impl<T, P> Plant<T, P, NoRelay> {
    /// Create a plant without a control relay
    pub fn without_relay(thermocouple: T, power: P) -> Self {
        Self::new(thermocouple, power, NoRelay::default())
    }
}

impl<T, P, R> Plant<T, P, R> {
    /// Create a new plant
    pub fn new(thermocouple: T, power: P, selector: R) -> Self {
        Self {
            thermocouple,
            power,
            selector,
        }
    }

    /// Thermocouple front-end
    pub fn thermocouple(&self) -> &T {
        &self.thermocouple
    }

    /// Power output
    pub fn power(&self) -> &P {
        &self.power
    }

    /// Control selector
    pub fn selector(&self) -> &R {
        &self.selector
    }

    /// Split the plant back into its parts
    pub fn into_parts(self) -> (T, P, R) {
        (self.thermocouple, self.power, self.selector)
    }
}

impl<T, P, R> Plant<T, P, R>
where
    T: ThermocoupleConfigurator,
    P: PowerOutput,
    R: ControlSelector,
{
    /// Push the boot settings to the hardware
    ///
    /// Starts in manual control so the configured startup power level is
    /// what the heater actually sees. Every step is attempted; the first
    /// error is returned.
    pub fn apply_config(&mut self, config: &EndpointConfig) -> Result<(), ActuatorError> {
        let selected = self.selector.select_mode(ControlMode::Manual);
        let configured = self.thermocouple.set_thermocouple_type(config.thermocouple);
        let powered = self.power.set_power(config.startup_power);
        selected.and(configured).and(powered)
    }
}

impl<T, P, R> Actuators for Plant<T, P, R>
where
    T: ThermocoupleConfigurator,
    P: PowerOutput,
    R: ControlSelector,
{
    fn set_thermocouple_type(&mut self, kind: ThermocoupleType) -> Result<(), ActuatorError> {
        self.thermocouple.set_thermocouple_type(kind)
    }

    fn set_power(&mut self, level: u8) -> Result<(), ActuatorError> {
        self.power.set_power(level)
    }

    fn select_mode(&mut self, mode: ControlMode) -> Result<(), ActuatorError> {
        self.selector.select_mode(mode)
    }

    /// Take control away from the closed loop, then cut power
    ///
    /// Power is cut even if the selector fails; the first error is returned.
    fn shutdown(&mut self) -> Result<(), ActuatorError> {
        let selected = self.selector.select_mode(ControlMode::Manual);
        let powered_off = self.power.power_off();
        selected.and(powered_off)
    }
}
