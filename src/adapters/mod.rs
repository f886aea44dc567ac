//! Hardware-facing implementations of the port traits.

pub mod gpio;
pub mod sink;
