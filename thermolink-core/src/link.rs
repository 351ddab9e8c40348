//! Serial link shim
//!
//! Connects a byte transport to an [`Endpoint`]: received bytes go into
//! the frame assembler one at a time, and each acknowledgement is written
//! out before the next byte is fed.

use thermolink_hal::{UartRx, UartTx};

use crate::endpoint::Endpoint;
use crate::traits::Actuators;

/// Receive chunk size for [`SerialLink::poll`]
const RX_CHUNK_SIZE: usize = 16;

/// Link-layer notifications from the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// Host opened the link
    Connected,
    /// Host went away
    Disconnected,
    /// Bus suspended
    Suspended,
    /// Bus resumed
    Resumed,
    /// Line break (or a framing error that looks like one)
    Break,
}

/// Transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<R, W> {
    /// Reading from the transport failed
    Read(R),
    /// Writing an acknowledgement failed
    Write(W),
}

/// Serial transport plus endpoint
pub struct SerialLink<Rx, Tx, A> {
    rx: Rx,
    tx: Tx,
    endpoint: Endpoint<A>,
}

impl<Rx, Tx, A> SerialLink<Rx, Tx, A>
where
    Rx: UartRx,
    Tx: UartTx,
    A: Actuators,
{
    /// Create a new link
    pub fn new(rx: Rx, tx: Tx, endpoint: Endpoint<A>) -> Self {
        Self { rx, tx, endpoint }
    }

    /// Process every byte the transport has available
    ///
    /// Returns the number of acknowledgements written. After a failed
    /// write the rest of the current receive chunk is still fed (the
    /// requests in it run), but no further acks are written and no further
    /// chunks are read; the first write error is returned.
    pub fn poll(&mut self) -> Result<usize, LinkError<Rx::Error, Tx::Error>> {
        let mut buf = [0u8; RX_CHUNK_SIZE];
        let mut written = 0;
        let mut write_error = None;

        while write_error.is_none() {
            let n = self.rx.read_available(&mut buf).map_err(LinkError::Read)?;
            if n == 0 {
                break;
            }

            for ack in self.endpoint.acks(&buf[..n]) {
                if write_error.is_some() {
                    continue;
                }
                match self.tx.write_all(&ack.to_frame().encode()) {
                    Ok(()) => written += 1,
                    Err(e) => write_error = Some(e),
                }
            }
        }

        if let Some(e) = write_error {
            return Err(LinkError::Write(e));
        }
        if written > 0 {
            self.tx.flush().map_err(LinkError::Write)?;
        }
        Ok(written)
    }

    /// Forward a link-layer event to the endpoint
    pub fn on_event(&mut self, event: LinkEvent) {
        self.endpoint.on_event(event);
    }

    /// The endpoint behind this link
    pub fn endpoint(&self) -> &Endpoint<A> {
        &self.endpoint
    }

    /// Mutable access to the endpoint
    pub fn endpoint_mut(&mut self) -> &mut Endpoint<A> {
        &mut self.endpoint
    }

    /// Split the link back into its parts
    pub fn into_parts(self) -> (Rx, Tx, Endpoint<A>) {
        (self.rx, self.tx, self.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ActuatorError;
    use std::collections::VecDeque;
    use thermolink_protocol::{Frame, Request, ThermocoupleType};

    /// Receiver fed from a queue, at most `chunk` bytes per read
    struct QueueRx {
        queue: VecDeque<u8>,
        chunk: usize,
        fail: bool,
    }

    impl QueueRx {
        fn new(bytes: &[u8], chunk: usize) -> Self {
            Self {
                queue: bytes.iter().copied().collect(),
                chunk,
                fail: false,
            }
        }
    }

    impl UartRx for QueueRx {
        type Error = &'static str;

        fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            if self.fail {
                return Err("overrun");
            }
            let n = buf.len().min(self.chunk).min(self.queue.len());
            for slot in buf.iter_mut().take(n) {
                *slot = self.queue.pop_front().unwrap_or_default();
            }
            Ok(n)
        }
    }

    /// Transmitter that records every write
    ///
    /// The next `failures` writes are refused.
    #[derive(Default)]
    struct CaptureTx {
        written: Vec<u8>,
        flushes: usize,
        failures: usize,
    }

    impl UartTx for CaptureTx {
        type Error = &'static str;

        fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err("tx full");
            }
            self.written.extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder {
        powers: Vec<u8>,
        kinds: Vec<ThermocoupleType>,
    }

    impl Actuators for Recorder {
        fn set_thermocouple_type(&mut self, kind: ThermocoupleType) -> Result<(), ActuatorError> {
            self.kinds.push(kind);
            Ok(())
        }

        fn set_power(&mut self, level: u8) -> Result<(), ActuatorError> {
            self.powers.push(level);
            Ok(())
        }
    }

    fn stream(requests: &[Request], noise: &[u8]) -> Vec<u8> {
        let mut bytes = noise.to_vec();
        for request in requests {
            bytes.extend_from_slice(&request.to_frame().encode());
            bytes.extend_from_slice(noise);
        }
        bytes
    }

    #[test]
    fn test_poll_answers_each_request_in_order() {
        let bytes = stream(
            &[
                Request::SetPower(0x32),
                Request::ConfigureThermocouple(ThermocoupleType::J),
                Request::Shutdown,
            ],
            &[0x00, 0xAA],
        );
        let mut link = SerialLink::new(
            QueueRx::new(&bytes, 5),
            CaptureTx::default(),
            Endpoint::new(Recorder::default()),
        );

        assert_eq!(link.poll(), Ok(3));

        let (_, tx, endpoint) = link.into_parts();
        assert_eq!(tx.written.len(), 24);
        assert_eq!(tx.flushes, 1);

        let codes: Vec<u8> = tx
            .written
            .chunks(8)
            .map(|chunk| {
                let raw: [u8; 8] = chunk.try_into().unwrap();
                Frame::decode(&raw).unwrap().command
            })
            .collect();
        assert_eq!(codes, vec![0x82, 0x81, 0x85]);
        assert_eq!(endpoint.actuators().powers, vec![0x32]);
        assert_eq!(endpoint.actuators().kinds, vec![ThermocoupleType::J]);
    }

    #[test]
    fn test_poll_with_nothing_available() {
        let mut link = SerialLink::new(
            QueueRx::new(&[], 8),
            CaptureTx::default(),
            Endpoint::new(Recorder::default()),
        );
        assert_eq!(link.poll(), Ok(0));
        assert_eq!(link.into_parts().1.flushes, 0);
    }

    #[test]
    fn test_partial_frame_carries_over_polls() {
        let raw = Request::SetPower(3).to_frame().encode();
        let mut link = SerialLink::new(
            QueueRx::new(&raw[..5], 8),
            CaptureTx::default(),
            Endpoint::new(Recorder::default()),
        );

        assert_eq!(link.poll(), Ok(0));
        assert_eq!(link.endpoint().assembler().len(), 5);

        let (mut rx, tx, endpoint) = link.into_parts();
        rx.queue.extend(raw[5..].iter().copied());
        let mut link = SerialLink::new(rx, tx, endpoint);
        assert_eq!(link.poll(), Ok(1));
    }

    #[test]
    fn test_read_error_is_reported() {
        let mut rx = QueueRx::new(&[], 8);
        rx.fail = true;
        let mut link = SerialLink::new(rx, CaptureTx::default(), Endpoint::new(Recorder::default()));
        assert_eq!(link.poll(), Err(LinkError::Read("overrun")));
    }

    #[test]
    fn test_write_error_is_reported() {
        let raw = Request::SetPower(3).to_frame().encode();
        let tx = CaptureTx {
            failures: 1,
            ..CaptureTx::default()
        };
        let mut link = SerialLink::new(
            QueueRx::new(&raw, 8),
            tx,
            Endpoint::new(Recorder::default()),
        );
        assert_eq!(link.poll(), Err(LinkError::Write("tx full")));
        // The actuator already ran; only the ack was lost
        assert_eq!(link.endpoint().actuators().powers, vec![3]);
    }

    #[test]
    fn test_write_error_still_feeds_rest_of_chunk() {
        let bytes = stream(&[Request::SetPower(1), Request::SetPower(2)], &[]);
        let tx = CaptureTx {
            failures: 1,
            ..CaptureTx::default()
        };
        let mut link = SerialLink::new(
            QueueRx::new(&bytes, 16),
            tx,
            Endpoint::new(Recorder::default()),
        );

        assert_eq!(link.poll(), Err(LinkError::Write("tx full")));
        assert_eq!(link.endpoint().actuators().powers, vec![1, 2]);

        // No ack after the failure within the same chunk
        assert_eq!(link.poll(), Ok(0));
        let (_, tx, _) = link.into_parts();
        assert!(tx.written.is_empty());
    }

    #[test]
    fn test_write_error_leaves_later_chunks_queued() {
        let bytes = stream(
            &[
                Request::SetPower(1),
                Request::SetPower(2),
                Request::SetPower(3),
            ],
            &[],
        );
        let tx = CaptureTx {
            failures: 1,
            ..CaptureTx::default()
        };
        let mut link = SerialLink::new(
            QueueRx::new(&bytes, 8),
            tx,
            Endpoint::new(Recorder::default()),
        );

        assert_eq!(link.poll(), Err(LinkError::Write("tx full")));
        assert_eq!(link.endpoint().actuators().powers, vec![1]);

        assert_eq!(link.poll(), Ok(2));
        assert_eq!(link.endpoint().actuators().powers, vec![1, 2, 3]);
        assert_eq!(link.into_parts().1.written.len(), 16);
    }

    #[test]
    fn test_break_event_resynchronizes() {
        let raw = Request::SetPower(3).to_frame().encode();
        let mut link = SerialLink::new(
            QueueRx::new(&raw[..2], 8),
            CaptureTx::default(),
            Endpoint::new(Recorder::default()),
        );
        link.poll().unwrap();
        link.on_event(LinkEvent::Break);
        assert!(link.endpoint().assembler().is_empty());
    }
}
