//! Unified error types.
//!
//! A single `Error` enum every subsystem converts into, keeping error
//! handling uniform at the call sites.  All variants are `Copy` so they
//! travel through interrupt-context code without allocation.
//!
//! There are no fatal conditions in the device core itself: a corrupted
//! bus command degrades to a no-op with a sentinel reply, so the physical
//! controls keep working under a garbled bus.  The variants here surface
//! on the host side and in adapters.

use core::fmt;

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A received command byte failed validation.
    Decode(DecodeError),
    /// A host-side bus transaction failed.
    Host(HostError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Host(e) => write!(f, "host: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Command decode errors (device side)
// ---------------------------------------------------------------------------

/// Why a received command byte was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The parity bit disagrees with the even parity of the low 7 bits.
    Parity,
    /// Parity holds but the opcode bits map to no known command.
    UnknownOpcode(u8),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parity => write!(f, "parity mismatch"),
            Self::UnknownOpcode(bits) => write!(f, "unknown opcode {bits:#x}"),
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Bus-master errors (host side)
// ---------------------------------------------------------------------------

/// Failures observed by the bus master when issuing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    /// Opcode or data outside the representable range; rejected before
    /// anything is sent over the bus.
    InvalidArgument,
    /// The retry budget was exhausted without a verifiable response.
    TransmissionFailed,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid command argument"),
            Self::TransmissionFailed => write!(f, "transmission failed"),
        }
    }
}

impl From<HostError> for Error {
    fn from(e: HostError) -> Self {
        Self::Host(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
