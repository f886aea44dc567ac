//! Door-lock controller core.
//!
//! Fuses noisy physical inputs (buttons, end-of-travel and lock sensors)
//! into a consistent status word under hard real-time constraints,
//! serves it to a bus master through a parity-checked command protocol,
//! and raises a shared notification line on state changes.  All
//! hardware access goes through port traits, so the whole core runs
//! under host-target tests.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod debounce;
pub mod host;
pub mod protocol;
pub mod sampler;
pub mod status;

pub mod adapters;

pub mod error;
