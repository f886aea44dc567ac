//! Bus-master helpers.
//!
//! The counterpart of the device-side protocol handler: builds
//! parity-set command bytes, validates the complemented reply, and
//! retries a bounded number of times before giving up.  The actual bus
//! transfer goes through [`BusTransport`], so the same logic serves an
//! I²C character device, a bit-banged adapter, or a test double.
//!
//! Retry contract: a reply is accepted only when the second byte is the
//! bitwise complement of the first and the first is non-zero (zero is
//! the slave's error sentinel).  Exhausting the budget is reported, not
//! fatal — callers log and carry on rather than blocking.

use log::{debug, warn};

use crate::config::DoorConfig;
use crate::error::HostError;
use crate::protocol::{Command, Opcode};
use crate::status::{StatusFlag, StatusWord};

/// One synchronous command/response exchange on the physical bus.
pub trait BusTransport {
    type Error: core::fmt::Debug;

    /// Send the command byte, read the two reply bytes.
    fn exchange(&mut self, command: u8) -> Result<[u8; 2], Self::Error>;
}

/// Decoded device status, field for field the wire bit assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorStatus {
    pub green_active: bool,
    pub red_active: bool,
    pub door_closed: bool,
    pub lock_open: bool,
    pub force_close: bool,
    pub force_open: bool,
}

impl From<StatusWord> for DoorStatus {
    fn from(w: StatusWord) -> Self {
        Self {
            green_active: w.contains(StatusFlag::GreenActive),
            red_active: w.contains(StatusFlag::RedActive),
            door_closed: w.contains(StatusFlag::DoorClosed),
            lock_open: w.contains(StatusFlag::LockOpen),
            force_close: w.contains(StatusFlag::ForceClose),
            force_open: w.contains(StatusFlag::ForceOpen),
        }
    }
}

/// Command issuer with bounded retry.
pub struct BusMaster<T: BusTransport> {
    transport: T,
    max_attempts: u8,
}

impl<T: BusTransport> BusMaster<T> {
    pub fn new(transport: T, config: &DoorConfig) -> Self {
        Self {
            transport,
            max_attempts: config.max_bus_attempts,
        }
    }

    /// Issue one command and return the verified result byte.
    ///
    /// `data` outside the 4-bit range is rejected before anything is
    /// sent over the bus.
    pub fn command(&mut self, opcode: Opcode, data: u8) -> Result<u8, HostError> {
        if data > 0x0F {
            return Err(HostError::InvalidArgument);
        }
        let byte = Command { opcode, data }.encode();

        for _ in 0..self.max_attempts {
            match self.transport.exchange(byte) {
                Ok([value, check]) if value != 0 && check == !value => return Ok(value),
                Ok([value, check]) => {
                    debug!("corrupted reply [{value:#04x}, {check:#04x}], retrying");
                }
                Err(e) => {
                    debug!("bus exchange failed: {e:?}, retrying");
                }
            }
        }

        warn!("giving up transmission after {} attempts", self.max_attempts);
        Err(HostError::TransmissionFailed)
    }

    /// Clear both force flags and release the notification line.
    pub fn reset(&mut self) -> Result<(), HostError> {
        self.command(Opcode::Reset, 0).map(|_| ())
    }

    /// Command the door open.
    pub fn open(&mut self) -> Result<(), HostError> {
        self.command(Opcode::Open, 0).map(|_| ())
    }

    /// Command the door closed.
    pub fn close(&mut self) -> Result<(), HostError> {
        self.command(Opcode::Close, 0).map(|_| ())
    }

    /// Read and decode the device status, acknowledging the
    /// notification line.
    pub fn read_status(&mut self) -> Result<DoorStatus, HostError> {
        let byte = self.command(Opcode::State, 0)?;
        Ok(DoorStatus::from(StatusWord::from_byte(byte)))
    }

    /// Access the underlying transport (e.g. to reconfigure it).
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Transport double fed from a reply script; records sent bytes.
    struct ScriptTransport {
        replies: Vec<Result<[u8; 2], &'static str>>,
        sent: Vec<u8>,
    }

    impl ScriptTransport {
        fn new(replies: Vec<Result<[u8; 2], &'static str>>) -> Self {
            Self {
                replies,
                sent: Vec::new(),
            }
        }
    }

    impl BusTransport for ScriptTransport {
        type Error = &'static str;

        fn exchange(&mut self, command: u8) -> Result<[u8; 2], Self::Error> {
            self.sent.push(command);
            if self.replies.is_empty() {
                Err("bus dead")
            } else {
                self.replies.remove(0)
            }
        }
    }

    fn master(replies: Vec<Result<[u8; 2], &'static str>>) -> BusMaster<ScriptTransport> {
        BusMaster::new(ScriptTransport::new(replies), &DoorConfig::default())
    }

    #[test]
    fn accepts_first_clean_reply() {
        let mut m = master(vec![Ok([0x0B, !0x0B])]);
        assert_eq!(m.command(Opcode::State, 0), Ok(0x0B));
        assert_eq!(m.transport_mut().sent, vec![0x30]);
    }

    #[test]
    fn retries_past_corrupted_replies() {
        let mut m = master(vec![
            Ok([0x0B, 0x00]),    // complement mismatch
            Ok([0x00, 0xFF]),    // error sentinel
            Err("clock stretch"),
            Ok([0x0B, !0x0B]),
        ]);
        assert_eq!(m.command(Opcode::State, 0), Ok(0x0B));
        assert_eq!(m.transport_mut().sent.len(), 4);
    }

    #[test]
    fn gives_up_after_bounded_attempts() {
        let mut m = master(vec![]);
        assert_eq!(m.command(Opcode::State, 0), Err(HostError::TransmissionFailed));
        let attempts = DoorConfig::default().max_bus_attempts as usize;
        assert_eq!(m.transport_mut().sent.len(), attempts);
    }

    #[test]
    fn rejects_out_of_range_data_before_sending() {
        let mut m = master(vec![Ok([1, !1])]);
        assert_eq!(m.command(Opcode::Open, 0x10), Err(HostError::InvalidArgument));
        assert!(m.transport_mut().sent.is_empty());
    }

    #[test]
    fn decodes_status_fields() {
        let mut status = StatusWord::empty();
        status.set(StatusFlag::DoorClosed);
        status.set(StatusFlag::ForceClose);
        let mut m = master(vec![Ok([status.byte(), !status.byte()])]);
        let ds = m.read_status().unwrap();
        assert!(ds.door_closed);
        assert!(ds.force_close);
        assert!(!ds.force_open);
        assert!(!ds.lock_open);
        assert!(!ds.green_active);
        assert!(!ds.red_active);
    }
}
