//! The resolved status word.
//!
//! A set of named boolean flags describing button, sensor, and override
//! state.  The bit assignment is the wire format the bus master decodes,
//! so the masks are part of the external contract:
//!
//! ```text
//! +-----+----+----+----+----+----+----+
//! | 7-6 | 5  | 4  | 3  | 2  | 1  | 0  |
//! | res | GA | RA | DC | LO | FC | FO |
//! +-----+----+----+----+----+----+----+
//! ```

use core::fmt;

/// One flag of the status word, valued as its wire mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StatusFlag {
    /// Door commanded open (by button or bus).
    ForceOpen = 0b0000_0001,
    /// Door commanded closed (by button or bus).
    ForceClose = 0b0000_0010,
    /// Lock sensor: bolt retracted.
    LockOpen = 0b0000_0100,
    /// End-of-travel sensor: door fully closed.
    DoorClosed = 0b0000_1000,
    /// Red ("close") button held.
    RedActive = 0b0001_0000,
    /// Green ("open") button held.
    GreenActive = 0b0010_0000,
}

impl StatusFlag {
    /// Wire bitmask of this flag.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForceOpen => write!(f, "force-open"),
            Self::ForceClose => write!(f, "force-close"),
            Self::LockOpen => write!(f, "lock-open"),
            Self::DoorClosed => write!(f, "door-closed"),
            Self::RedActive => write!(f, "red-active"),
            Self::GreenActive => write!(f, "green-active"),
        }
    }
}

/// The resolved flag set.
///
/// Mutated by the status resolver (debounced inputs, override precedence)
/// and by the protocol handler (direct force commands); read by both.
/// After resolution [`StatusFlag::ForceOpen`] and [`StatusFlag::ForceClose`]
/// are never simultaneously set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusWord(u8);

impl StatusWord {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(self, flag: StatusFlag) -> bool {
        self.0 & flag.mask() != 0
    }

    pub fn set(&mut self, flag: StatusFlag) {
        self.0 |= flag.mask();
    }

    pub fn clear(&mut self, flag: StatusFlag) {
        self.0 &= !flag.mask();
    }

    /// Set or clear a flag from a boolean condition.
    pub fn assign(&mut self, flag: StatusFlag, value: bool) {
        if value {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Wire encoding, as returned by the `STATE` command.
    pub const fn byte(self) -> u8 {
        self.0
    }

    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0b{:06b}", self.0)
    }
}
