//! Board-agnostic core logic for the Thermolink endpoint
//!
//! This crate contains everything between the byte transport and the
//! actuators that does not depend on specific hardware:
//!
//! - Actuator traits (thermocouple, power output, control selector)
//! - The heater plant that combines them
//! - Command dispatch and acknowledgement
//! - The per-stream endpoint state and its drop counters
//! - The serial link shim over the HAL transport traits
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod endpoint;
pub mod link;
pub mod plant;
pub mod traits;

pub use config::{ConfigError, EndpointConfig};
pub use dispatch::Dispatcher;
pub use endpoint::{Acks, DropReason, Endpoint, LinkStats};
pub use link::{LinkError, LinkEvent, SerialLink};
pub use plant::{NoRelay, Plant};
