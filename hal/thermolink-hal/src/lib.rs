//! Thermolink Hardware Abstraction Layer
//!
//! This crate defines the byte transport traits the endpoint consumes.
//! Chip-specific code (UART, USB CDC, a host-side pipe in tests) implements
//! them so the frame protocol never touches a peripheral directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  thermolink-core (Endpoint, SerialLink)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  thermolink-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  board transport (UART, USB CDC, mock)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartRx`] - read whatever input bytes are available
//! - [`uart::UartTx`] - write output bytes in order

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

pub use uart::{DataBits, Parity, StopBits, UartConfig, UartRx, UartTx};
