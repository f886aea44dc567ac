//! Application layer: port traits, the device core, and outbound events.

pub mod events;
pub mod ports;
pub mod service;
