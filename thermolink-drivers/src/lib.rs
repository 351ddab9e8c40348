//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the actuator traits
//! defined in thermolink-core, built on the `embedded-hal` 1.0 traits:
//!
//! - Thermocouple front-end (MAX31856)
//! - Heater power output (MCP41xxx digital potentiometer)
//! - Control mode relay (GPIO)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod control;
pub mod power;
pub mod thermocouple;

#[cfg(test)]
mod mock;

pub use control::ControlRelay;
pub use power::Mcp41;
pub use thermocouple::{Max31856, Max31856Error};
