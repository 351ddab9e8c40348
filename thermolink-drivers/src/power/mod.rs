//! Heater power output drivers

pub mod mcp41;

pub use mcp41::Mcp41;
