//! Port traits — the boundary between the device core and the hardware.
//!
//! ```text
//!   SignalPort ──▶ ┌──────────────────────────┐ ──▶ ActuatorPort
//!   (sampler ISR)  │       DoorService         │ ──▶ NotifyPort
//!   bus bytes  ──▶ │  debounce · resolve · bus │ ──▶ EventSink
//!                  └──────────────────────────┘
//! ```
//!
//! Driven adapters (GPIO, bus peripheral, log sinks) implement these
//! traits; the [`DoorService`](super::service::DoorService) consumes them
//! via generics, so the core never touches hardware directly.  All port
//! methods must be non-blocking: `SignalPort::read` runs in timer
//! interrupt context and `NotifyPort` is touched from the bus handler.

use crate::sampler::SignalId;

/// Read-side port: raw boolean state of one input signal.
pub trait SignalPort {
    /// Sample the named signal once.  Positive logic: `true` = asserted
    /// (button held, sensor made).  Must be O(1) and non-blocking.
    fn read(&mut self, id: SignalId) -> bool;
}

/// Direction the actuator is driven in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorDrive {
    /// Both direction outputs released; door holds position.
    Neutral,
    /// Drive towards open.
    Open,
    /// Drive towards closed.
    Close,
}

/// Write-side port: actuator direction and status indicators.
///
/// Driven exclusively by the status resolver, as a pure function of the
/// resolved force flags.
pub trait ActuatorPort {
    /// Command the door drive direction.
    fn set_drive(&mut self, drive: DoorDrive);

    /// Set the status indicators (green = opening, red = closing).
    fn set_indicators(&mut self, green: bool, red: bool);
}

/// The shared change-notification line.
///
/// Open-drain: asserted means driven low, released means tri-stated
/// (listening).  The master acknowledges with `STATE` or `RESET`.
pub trait NotifyPort {
    /// Drive the line low to prompt the master to poll.
    fn assert(&mut self);

    /// Tri-state the line.
    fn release(&mut self);
}

/// The core emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (log facade, fixed
/// buffer, telemetry).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
