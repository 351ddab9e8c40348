//! Command dispatch
//!
//! Maps a decoded request to its actuator call and builds the single
//! acknowledgement that answers it.

use thermolink_protocol::{Ack, Command, Frame, MessageError, RejectReason, Request};

use crate::traits::{ActuatorError, Actuators, ControlMode};

/// Dispatches requests to a set of actuators
pub struct Dispatcher<A> {
    actuators: A,
}

impl<A: Actuators> Dispatcher<A> {
    /// Create a new dispatcher
    pub fn new(actuators: A) -> Self {
        Self { actuators }
    }

    /// The actuators requests are sent to
    pub fn actuators(&self) -> &A {
        &self.actuators
    }

    /// Mutable access to the actuators
    pub fn actuators_mut(&mut self) -> &mut A {
        &mut self.actuators
    }

    /// Give back the actuators
    pub fn into_inner(self) -> A {
        self.actuators
    }

    /// Handle a decoded frame
    ///
    /// Returns the acknowledgement to send, or `Err` when the frame must be
    /// dropped without an answer (unknown command code). A recognized
    /// command with a bad argument is answered with [`Ack::Rejected`].
    pub fn dispatch(&mut self, frame: &Frame) -> Result<Ack, MessageError> {
        match Request::from_frame(frame) {
            Ok(request) => Ok(self.execute(request)),
            Err(MessageError::InvalidThermocoupleType(_)) => Ok(Ack::Rejected {
                command: Command::ConfigureThermocouple,
                reason: RejectReason::InvalidArgument,
            }),
            Err(e) => Err(e),
        }
    }

    /// Run a request against the actuators
    pub fn execute(&mut self, request: Request) -> Ack {
        let result: Result<(), ActuatorError> = match request {
            Request::ConfigureThermocouple(kind) => self.actuators.set_thermocouple_type(kind),
            Request::SetPower(level) => self.actuators.set_power(level),
            Request::EnableAutomaticControl => self.actuators.select_mode(ControlMode::Automatic),
            Request::EnableManualControl => self.actuators.select_mode(ControlMode::Manual),
            Request::Shutdown => self.actuators.shutdown(),
        };

        match result {
            Ok(()) => request.ack(),
            Err(err) => Ack::Rejected {
                command: request.command(),
                reason: err.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermolink_protocol::ThermocoupleType;

    /// Records the last call made on each actuator
    #[derive(Default)]
    struct Recorder {
        kind: Option<ThermocoupleType>,
        power: Option<u8>,
        mode: Option<ControlMode>,
        shutdowns: u32,
        fail_power: bool,
    }

    impl Actuators for Recorder {
        fn set_thermocouple_type(&mut self, kind: ThermocoupleType) -> Result<(), ActuatorError> {
            self.kind = Some(kind);
            Ok(())
        }

        fn set_power(&mut self, level: u8) -> Result<(), ActuatorError> {
            if self.fail_power {
                return Err(ActuatorError::Fault);
            }
            self.power = Some(level);
            Ok(())
        }

        fn select_mode(&mut self, mode: ControlMode) -> Result<(), ActuatorError> {
            self.mode = Some(mode);
            Ok(())
        }

        fn shutdown(&mut self) -> Result<(), ActuatorError> {
            self.shutdowns += 1;
            Ok(())
        }
    }

    /// Board with only the two required setters
    struct Minimal;

    impl Actuators for Minimal {
        fn set_thermocouple_type(&mut self, _kind: ThermocoupleType) -> Result<(), ActuatorError> {
            Ok(())
        }

        fn set_power(&mut self, _level: u8) -> Result<(), ActuatorError> {
            Ok(())
        }
    }

    #[test]
    fn test_set_power_echoes_level() {
        let mut dispatcher = Dispatcher::new(Recorder::default());
        let ack = dispatcher
            .dispatch(&Frame::new(0x02, [0x32, 0, 0, 0]))
            .unwrap();

        assert_eq!(ack, Ack::PowerSet(0x32));
        assert_eq!(ack.to_frame().payload[0], 0x32);
        assert_eq!(dispatcher.actuators().power, Some(0x32));
    }

    #[test]
    fn test_configure_thermocouple_echoes_config_byte() {
        let mut dispatcher = Dispatcher::new(Recorder::default());
        let ack = dispatcher
            .dispatch(&Frame::new(0x01, [0, 0x07, 0, 0]))
            .unwrap();

        assert_eq!(ack, Ack::ThermocoupleConfigured(0x07));
        assert_eq!(ack.to_frame().command, 0x81);
        assert_eq!(ack.to_frame().payload, [0, 0x07, 0, 0]);
        assert_eq!(dispatcher.actuators().kind, Some(ThermocoupleType::T));
    }

    #[test]
    fn test_mode_commands() {
        let mut dispatcher = Dispatcher::new(Recorder::default());

        let ack = dispatcher.execute(Request::EnableAutomaticControl);
        assert_eq!(ack, Ack::AutomaticControlEnabled);
        assert_eq!(dispatcher.actuators().mode, Some(ControlMode::Automatic));

        let ack = dispatcher.execute(Request::EnableManualControl);
        assert_eq!(ack, Ack::ManualControlEnabled);
        assert_eq!(dispatcher.actuators().mode, Some(ControlMode::Manual));

        let ack = dispatcher.execute(Request::Shutdown);
        assert_eq!(ack, Ack::ShutdownComplete);
        assert_eq!(dispatcher.actuators().shutdowns, 1);
    }

    #[test]
    fn test_stub_commands_ack_with_default_actuators() {
        let mut dispatcher = Dispatcher::new(Minimal);
        for (code, ack_code) in [(0x03, 0x83), (0x04, 0x84), (0x05, 0x85)] {
            let ack = dispatcher.dispatch(&Frame::empty(code)).unwrap();
            let frame = ack.to_frame();
            assert_eq!(frame.command, ack_code);
            assert_eq!(frame.payload, [0; 4]);
        }
    }

    #[test]
    fn test_unknown_command_is_dropped() {
        let mut dispatcher = Dispatcher::new(Recorder::default());
        assert_eq!(
            dispatcher.dispatch(&Frame::empty(0x42)),
            Err(MessageError::UnknownCommand(0x42))
        );
        assert_eq!(dispatcher.actuators().power, None);
        assert_eq!(dispatcher.actuators().shutdowns, 0);
    }

    #[test]
    fn test_invalid_thermocouple_type_is_rejected() {
        let mut dispatcher = Dispatcher::new(Recorder::default());
        let ack = dispatcher
            .dispatch(&Frame::new(0x01, [0, 0x0B, 0, 0]))
            .unwrap();

        assert_eq!(
            ack,
            Ack::Rejected {
                command: Command::ConfigureThermocouple,
                reason: RejectReason::InvalidArgument,
            }
        );
        assert_eq!(dispatcher.actuators().kind, None);
    }

    #[test]
    fn test_actuator_failure_sends_rejected_ack() {
        let mut dispatcher = Dispatcher::new(Recorder {
            fail_power: true,
            ..Recorder::default()
        });
        let ack = dispatcher.execute(Request::SetPower(0x10));

        assert_eq!(
            ack,
            Ack::Rejected {
                command: Command::SetPower,
                reason: RejectReason::ActuatorFault,
            }
        );
        assert_eq!(ack.to_frame().payload, [0x02, 0x02, 0, 0]);
    }

    #[test]
    fn test_dispatch_through_borrowed_actuators() {
        let mut recorder = Recorder::default();
        {
            let mut dispatcher = Dispatcher::new(&mut recorder);
            dispatcher.execute(Request::SetPower(7));
        }
        assert_eq!(recorder.power, Some(7));
    }
}
