//! Protocol endpoint
//!
//! Owns the frame assembler and the dispatcher for one input stream. Each
//! call to [`Endpoint::feed`] runs to completion: classify the byte, and
//! if it finishes a frame, verify it, dispatch it and hand back the ack.

use thermolink_protocol::{Ack, Feed, Frame, FrameAssembler, FrameError, MessageError, RawFrame};

use crate::config::EndpointConfig;
use crate::dispatch::Dispatcher;
use crate::link::LinkEvent;
use crate::traits::Actuators;

/// Why a completed frame got no acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DropReason {
    /// Frame failed marker or checksum verification
    Frame(FrameError),
    /// Frame was valid but not a known request
    Message(MessageError),
}

/// Counters for everything the endpoint accepted or threw away
///
/// Counters saturate instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Bytes thrown away while seeking a marker
    pub bytes_discarded: u32,
    /// Frames that decoded and were answered (including rejected requests)
    pub frames_accepted: u32,
    /// Frames that failed verification
    pub frames_corrupt: u32,
    /// Valid frames with an unknown command code
    pub unknown_commands: u32,
    /// Requests answered with a rejected ack
    pub requests_rejected: u32,
}

fn bump(counter: &mut u32) {
    *counter = counter.saturating_add(1);
}

/// Endpoint state for one serial stream
pub struct Endpoint<A> {
    assembler: FrameAssembler,
    dispatcher: Dispatcher<A>,
    stats: LinkStats,
    reset_on_connect: bool,
}

impl<A: Actuators> Endpoint<A> {
    /// Create an endpoint with the default configuration
    pub fn new(actuators: A) -> Self {
        Self::with_config(actuators, &EndpointConfig::default())
    }

    /// Create an endpoint with the given configuration
    pub fn with_config(actuators: A, config: &EndpointConfig) -> Self {
        Self {
            assembler: FrameAssembler::new(),
            dispatcher: Dispatcher::new(actuators),
            stats: LinkStats::default(),
            reset_on_connect: config.reset_on_connect,
        }
    }

    /// Feed one received byte
    ///
    /// Returns `Ok(Some(ack))` when the byte completed a valid request,
    /// `Ok(None)` when more bytes are needed (or the byte was noise), and
    /// `Err` when a completed frame was dropped.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Ack>, DropReason> {
        match self.assembler.feed(byte) {
            Feed::Discarded => {
                bump(&mut self.stats.bytes_discarded);
                Ok(None)
            }
            Feed::Pending => Ok(None),
            Feed::Complete(raw) => self.handle_frame(&raw).map(Some),
        }
    }

    fn handle_frame(&mut self, raw: &RawFrame) -> Result<Ack, DropReason> {
        let frame = match Frame::decode(raw) {
            Ok(frame) => frame,
            Err(e) => {
                bump(&mut self.stats.frames_corrupt);
                #[cfg(feature = "defmt")]
                defmt::debug!("Dropping corrupt frame: {:?}", e);
                return Err(DropReason::Frame(e));
            }
        };

        let ack = match self.dispatcher.dispatch(&frame) {
            Ok(ack) => ack,
            Err(e) => {
                bump(&mut self.stats.unknown_commands);
                #[cfg(feature = "defmt")]
                defmt::debug!("Dropping frame: {:?}", e);
                return Err(DropReason::Message(e));
            }
        };

        bump(&mut self.stats.frames_accepted);
        if let Ack::Rejected { .. } = ack {
            bump(&mut self.stats.requests_rejected);
            #[cfg(feature = "defmt")]
            defmt::warn!("Request refused: {:?}", ack);
        }

        Ok(ack)
    }

    /// Feed a received chunk, yielding each acknowledgement as it is produced
    ///
    /// The iterator is lazy: bytes after an ack are only fed once the
    /// caller asks for the next one, so an ack can be written out before
    /// the following request runs. Bytes still unconsumed when the iterator
    /// is dropped are not fed.
    pub fn acks<'a>(&'a mut self, bytes: &'a [u8]) -> Acks<'a, A> {
        Acks {
            endpoint: self,
            bytes,
        }
    }

    /// React to a transport link event
    pub fn on_event(&mut self, event: LinkEvent) {
        #[cfg(feature = "defmt")]
        defmt::debug!("Link event: {:?}", event);

        match event {
            LinkEvent::Connected if self.reset_on_connect => self.assembler.reset(),
            LinkEvent::Break => self.assembler.reset(),
            _ => {}
        }
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.assembler.reset();
    }

    /// The frame assembler
    pub fn assembler(&self) -> &FrameAssembler {
        &self.assembler
    }

    /// Drop and acceptance counters
    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    /// The actuators commands are dispatched to
    pub fn actuators(&self) -> &A {
        self.dispatcher.actuators()
    }

    /// Mutable access to the actuators
    pub fn actuators_mut(&mut self) -> &mut A {
        self.dispatcher.actuators_mut()
    }
}

/// Acknowledgements produced by a chunk of input, see [`Endpoint::acks`]
pub struct Acks<'a, A> {
    endpoint: &'a mut Endpoint<A>,
    bytes: &'a [u8],
}

impl<A> Acks<'_, A> {
    /// Bytes of the chunk not fed yet
    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }
}

impl<A: Actuators> Iterator for Acks<'_, A> {
    type Item = Ack;

    fn next(&mut self) -> Option<Ack> {
        while let Some((&byte, rest)) = self.bytes.split_first() {
            self.bytes = rest;
            // Dropped frames are counted by the endpoint
            if let Ok(Some(ack)) = self.endpoint.feed(byte) {
                return Some(ack);
            }
        }
        None
    }
}
