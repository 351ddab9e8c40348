//! Thermolink Command/Acknowledgement Protocol
//!
//! This crate defines the serial protocol between a host and the heater
//! controller endpoint. Every message is one fixed-size, self-contained
//! frame; there is no sequencing, retransmission or fragmentation.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌────────┬─────────┬─────────────┬──────────┬──────────┐
//! │ MARKER │ COMMAND │ PAYLOAD     │ RESERVED │ CHECKSUM │
//! │ 0x7E   │ 1B      │ 4B          │ 0x00     │ 1B       │
//! └────────┴─────────┴─────────────┴──────────┴──────────┘
//! ```
//!
//! The host sends requests; the endpoint answers every recognized request
//! with exactly one acknowledgement. Corrupt frames and unknown commands
//! get no answer at all; the host notices the missing ack.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod assembler;
pub mod frame;
pub mod messages;
pub mod thermocouple;

pub use assembler::{Feed, FrameAssembler, Mode};
pub use frame::{checksum, Frame, FrameError, RawFrame, FRAME_SIZE, MARKER, PAYLOAD_SIZE};
pub use messages::{Ack, Command, MessageError, RejectReason, Request};
pub use thermocouple::ThermocoupleType;
