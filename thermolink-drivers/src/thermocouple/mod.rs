//! Thermocouple front-end drivers

pub mod max31856;

pub use max31856::{Max31856, Max31856Error};
