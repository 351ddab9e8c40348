//! Control mode relay
//!
//! A single relay routes the heater either to the external closed-loop
//! controller (energised) or to the digital potentiometer (released).

use embedded_hal::digital::OutputPin;
use thermolink_core::traits::{ActuatorError, ControlMode, ControlSelector};

/// Relay on a GPIO pin
///
/// The pin can be configured as active-high (default) or active-low.
pub struct ControlRelay<P> {
    pin: P,
    /// If true, relay energised = pin LOW
    inverted: bool,
    mode: ControlMode,
}

impl<P: OutputPin> ControlRelay<P> {
    /// Create a relay and release it (manual control)
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin driving the relay coil
    /// - `inverted`: If true, the relay is energised when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Result<Self, P::Error> {
        let mut relay = Self {
            pin,
            inverted,
            mode: ControlMode::Manual,
        };
        relay.drive(ControlMode::Manual)?;
        Ok(relay)
    }

    /// Create a relay with active-high drive
    pub fn new_active_high(pin: P) -> Result<Self, P::Error> {
        Self::new(pin, false)
    }

    /// Create a relay with active-low drive
    pub fn new_active_low(pin: P) -> Result<Self, P::Error> {
        Self::new(pin, true)
    }

    fn drive(&mut self, mode: ControlMode) -> Result<(), P::Error> {
        let energised = mode == ControlMode::Automatic;
        if energised != self.inverted {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.mode = mode;
        Ok(())
    }

    /// Release the pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> ControlSelector for ControlRelay<P> {
    fn select_mode(&mut self, mode: ControlMode) -> Result<(), ActuatorError> {
        self.drive(mode).map_err(|_| ActuatorError::Fault)
    }

    fn mode(&self) -> ControlMode {
        self.mode
    }
}
