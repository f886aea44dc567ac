//! Outbound application events.
//!
//! The [`DoorService`](super::service::DoorService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them — log to serial, collect in a
//! buffer, forward as telemetry.

use crate::error::DecodeError;
use crate::protocol::Opcode;
use crate::status::StatusWord;

/// Structured events emitted by the device core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Cold start finished: level sensors settled, status word seeded.
    Settled(StatusWord),

    /// The resolved status word changed; the notification line was
    /// asserted.
    StatusChanged { from: StatusWord, to: StatusWord },

    /// A valid bus command was executed.
    CommandApplied(Opcode),

    /// A received command byte was ignored (no state change).
    CommandRejected(DecodeError),
}
