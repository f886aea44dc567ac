//! Bus command and response codec.
//!
//! Wire format of one transaction (single command byte in, two response
//! bytes out):
//!
//! ```text
//! command   ┌────────┬─────────────┬───────────┐
//!           │ parity │ opcode (3b) │ data (4b) │
//!           └────────┴─────────────┴───────────┘
//! response  ┌───────┬────────┐
//!           │ value │ !value │
//!           └───────┴────────┘
//! ```
//!
//! The parity bit is the even parity of the low seven bits; a mismatch
//! marks the command as corrupted and it must not mutate any state.  The
//! complemented second response byte lets the master validate the reply
//! independently of the transport's own error detection.

use crate::error::DecodeError;

/// Commands understood by the door controller.
///
/// This is the canonical mapping of the latest firmware revision; earlier
/// boards in the family reassigned the nibble and carried no parity bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// Clear both force flags and release the notification line.
    Reset = 0x0,
    /// Assert force-open, clear force-close.
    Open = 0x1,
    /// Assert force-close, clear force-open.
    Close = 0x2,
    /// Return the status word and release the notification line.
    State = 0x3,
}

impl Opcode {
    fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x0 => Some(Self::Reset),
            0x1 => Some(Self::Open),
            0x2 => Some(Self::Close),
            0x3 => Some(Self::State),
            _ => None,
        }
    }
}

/// A validated, decoded command.  Transient: constructed and consumed
/// within one bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub opcode: Opcode,
    pub data: u8,
}

impl Command {
    /// Decode and validate one received byte.
    pub fn decode(byte: u8) -> Result<Self, DecodeError> {
        let parity = byte >> 7;
        if parity != even_parity(byte & 0x7F) {
            return Err(DecodeError::Parity);
        }
        let bits = (byte >> 4) & 0x07;
        let opcode = Opcode::from_bits(bits).ok_or(DecodeError::UnknownOpcode(bits))?;
        Ok(Self {
            opcode,
            data: byte & 0x0F,
        })
    }

    /// Encode this command into its wire byte, parity bit included.
    pub fn encode(self) -> u8 {
        let low = ((self.opcode as u8) << 4) | (self.data & 0x0F);
        low | (even_parity(low) << 7)
    }
}

/// The two-byte reply: value and its bitwise complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub value: u8,
    pub check: u8,
}

/// Result byte signalling an ignored or failed command.  Kept as a real
/// (complement-framed) response so the reply length never varies.
pub const RESULT_ERROR: u8 = 0;
/// Result byte acknowledging a state-mutating command.
pub const RESULT_ACK: u8 = 1;

impl Response {
    pub const fn new(value: u8) -> Self {
        Self {
            value,
            check: !value,
        }
    }

    /// The sentinel reply for corrupted or unknown commands.
    pub const fn error() -> Self {
        Self::new(RESULT_ERROR)
    }

    pub const fn bytes(self) -> [u8; 2] {
        [self.value, self.check]
    }
}

/// Even parity over `bits`: 1 iff an odd number of bits is set.
pub fn even_parity(bits: u8) -> u8 {
    (bits.count_ones() & 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_accepts_well_formed_commands() {
        for (opcode, data) in [
            (Opcode::Reset, 0x0),
            (Opcode::Open, 0x0),
            (Opcode::Close, 0xA),
            (Opcode::State, 0xF),
        ] {
            let byte = Command { opcode, data }.encode();
            let cmd = Command::decode(byte).unwrap();
            assert_eq!(cmd.opcode, opcode);
            assert_eq!(cmd.data, data);
        }
    }

    #[test]
    fn decode_rejects_bad_parity() {
        let good = Command {
            opcode: Opcode::Open,
            data: 0x3,
        }
        .encode();
        // Flip one data bit without recomputing parity.
        let corrupted = good ^ 0x01;
        assert_eq!(Command::decode(corrupted), Err(DecodeError::Parity));
    }

    #[test]
    fn decode_rejects_unknown_opcodes() {
        for bits in 4u8..=7 {
            let low = bits << 4;
            let byte = low | (even_parity(low) << 7);
            assert_eq!(
                Command::decode(byte),
                Err(DecodeError::UnknownOpcode(bits))
            );
        }
    }

    #[test]
    fn known_wire_bytes() {
        // The debug bytes documented in the original board notes:
        // RESET = 0x00, OPEN = 0x90, CLOSE = 0xA0, STATE = 0x30.
        let enc = |opcode| Command { opcode, data: 0 }.encode();
        assert_eq!(enc(Opcode::Reset), 0x00);
        assert_eq!(enc(Opcode::Open), 0x90);
        assert_eq!(enc(Opcode::Close), 0xA0);
        assert_eq!(enc(Opcode::State), 0x30);
    }

    #[test]
    fn response_carries_complement() {
        let r = Response::new(0x2B);
        assert_eq!(r.bytes(), [0x2B, !0x2B]);
        assert_eq!(Response::error().bytes(), [0x00, 0xFF]);
    }

    #[test]
    fn parity_of_zero_is_even() {
        assert_eq!(even_parity(0), 0);
        assert_eq!(even_parity(0b0101_0001), 1);
        assert_eq!(even_parity(0b0110_0001), 1);
        assert_eq!(even_parity(0b0110_0011), 0);
    }
}
