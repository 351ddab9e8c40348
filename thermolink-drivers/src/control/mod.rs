//! Control mode selection

pub mod relay;

pub use relay::ControlRelay;
