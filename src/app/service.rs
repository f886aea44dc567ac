//! The device core.
//!
//! [`DoorService`] owns every piece of shared mutable state — debounce
//! filters, sampling cursor, status word — behind one critical-section
//! guard, and exposes one entry point per execution context:
//!
//! ```text
//!  timer interrupt ──▶ sample()          one signal per tick, O(1)
//!  bus transaction ──▶ handle_command()  parity-checked, sentinel on error
//!  idle loop       ──▶ resolve()         rate-limited status resolution
//! ```
//!
//! The timer interrupt and the bus peripheral both preempt ordinary
//! flow, so any read-modify-write on the shared state runs inside
//! `critical_section::with`.  The critical sections are bounded and
//! nest-safe: on bare metal the implementation saves and restores the
//! prior interrupt-enable state rather than unconditionally re-enabling.

use core::cell::RefCell;

use critical_section::Mutex;
use log::{debug, info};

use crate::config::DoorConfig;
use crate::debounce::Debouncer;
use crate::protocol::{Command, Opcode, RESULT_ACK, Response};
use crate::sampler::{RoundRobin, SignalId};
use crate::status::{StatusFlag, StatusWord};

use super::events::AppEvent;
use super::ports::{ActuatorPort, DoorDrive, EventSink, NotifyPort, SignalPort};

/// Full sampler rounds required before the level sensors are trusted at
/// cold start: one complete history depth per signal.
const SETTLE_ROUNDS: u32 = 8;

/// State shared between the three execution contexts.
struct Shared {
    filters: [Debouncer; SignalId::COUNT],
    cursor: RoundRobin,
    status: StatusWord,
    /// Round count at the previous resolution (rate limiter reference).
    resolved_round: u32,
    /// Cold start finished; the status word reflects reality.
    settled: bool,
}

/// The door controller core.
pub struct DoorService {
    shared: Mutex<RefCell<Shared>>,
    rounds_per_resolve: u32,
}

impl DoorService {
    pub fn new(config: &DoorConfig) -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Shared {
                filters: [Debouncer::new(); SignalId::COUNT],
                cursor: RoundRobin::new(),
                status: StatusWord::empty(),
                resolved_round: 0,
                settled: false,
            })),
            rounds_per_resolve: config.rounds_per_resolve,
        }
    }

    // ── Timer-interrupt context ───────────────────────────────

    /// Sample exactly one signal and feed its debounce filter.
    ///
    /// Call from the periodic timer interrupt.  The cost is O(1)
    /// regardless of the signal count; each signal is refreshed every
    /// `SignalId::COUNT` ticks.
    pub fn sample(&self, signals: &mut impl SignalPort) {
        critical_section::with(|cs| {
            let mut sh = self.shared.borrow_ref_mut(cs);
            let id = sh.cursor.current();
            let raw = signals.read(id);
            sh.filters[id as usize].update(raw);
            sh.cursor.advance();
        });
    }

    // ── Cold start (idle context) ─────────────────────────────

    /// Attempt to finish the cold start.
    ///
    /// Succeeds once the door and lock filters have seen a full history
    /// of real samples and both report a settled level.  The force flags
    /// are then seeded from the settled lock state — lock open seeds
    /// force-open, lock closed seeds force-close — so the first resolved
    /// status word holds the door where the hardware already is.
    ///
    /// Call repeatedly from the idle loop; the bus must not be served
    /// until this returns true.  Idempotent after success.
    pub fn try_settle(&self, sink: &mut impl EventSink) -> bool {
        let seeded = critical_section::with(|cs| {
            let mut sh = self.shared.borrow_ref_mut(cs);
            if sh.settled {
                return Some(None);
            }
            if sh.cursor.rounds() < SETTLE_ROUNDS {
                return None;
            }
            let door = sh.filters[SignalId::DoorClosed as usize];
            let lock = sh.filters[SignalId::LockOpen as usize];
            if !door.is_settled() || !lock.is_settled() {
                return None;
            }

            let mut status = StatusWord::empty();
            status.assign(StatusFlag::DoorClosed, door.is_down());
            status.assign(StatusFlag::LockOpen, lock.is_down());
            if lock.is_down() {
                status.set(StatusFlag::ForceOpen);
            } else {
                status.set(StatusFlag::ForceClose);
            }

            sh.status = status;
            sh.resolved_round = sh.cursor.rounds();
            sh.settled = true;
            Some(Some(status))
        });

        match seeded {
            None => false,
            Some(None) => true,
            Some(Some(status)) => {
                info!("cold start settled, status {status}");
                sink.emit(&AppEvent::Settled(status));
                true
            }
        }
    }

    /// Whether the cold start has finished.
    pub fn is_settled(&self) -> bool {
        critical_section::with(|cs| self.shared.borrow_ref(cs).settled)
    }

    // ── Idle context ──────────────────────────────────────────

    /// Resolve the status word from the debounced inputs and drive the
    /// outputs.
    ///
    /// Rate-limited: runs only once at least `rounds_per_resolve` full
    /// sampler rounds have completed since the previous resolution, so
    /// every invocation observes settled debounce output.  Returns true
    /// if a resolution pass ran.
    ///
    /// All filters are folded inside one critical section — the override
    /// logic never observes a partially updated round — and the outputs
    /// are driven afterwards as a pure function of the resolved force
    /// flags.  The notification line is asserted only when the resolved
    /// word differs from the previous one.
    pub fn resolve(
        &self,
        hw: &mut impl ActuatorPort,
        line: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) -> bool {
        let outcome = critical_section::with(|cs| {
            let mut sh = self.shared.borrow_ref_mut(cs);
            if !sh.settled {
                return None;
            }
            let rounds = sh.cursor.rounds();
            if rounds.wrapping_sub(sh.resolved_round) < self.rounds_per_resolve {
                return None;
            }
            sh.resolved_round = rounds;

            let before = sh.status;
            let Shared {
                filters, status, ..
            } = &mut *sh;

            // One consistent snapshot of all filters.  Edge queries are
            // consumed here exactly once per resolution; levels follow.
            for (idx, flag) in [
                StatusFlag::GreenActive,
                StatusFlag::RedActive,
                StatusFlag::DoorClosed,
                StatusFlag::LockOpen,
            ]
            .into_iter()
            .enumerate()
            {
                let filter = &mut filters[idx];
                if filter.is_pressed() || filter.is_down() {
                    status.set(flag);
                } else if filter.is_released() || filter.is_up() {
                    status.clear(flag);
                }
                // Mid-transition: leave the flag as it was.
            }

            // Physical controls override remote commands while held;
            // opening has precedence over closing.
            if status.contains(StatusFlag::GreenActive) {
                status.set(StatusFlag::ForceOpen);
                status.clear(StatusFlag::ForceClose);
            } else if status.contains(StatusFlag::RedActive) {
                status.set(StatusFlag::ForceClose);
                status.clear(StatusFlag::ForceOpen);
            }

            Some((before, *status))
        });

        let Some((before, after)) = outcome else {
            return false;
        };

        Self::drive(after, hw);

        if after != before {
            debug!("status changed {before} -> {after}");
            line.assert();
            sink.emit(&AppEvent::StatusChanged {
                from: before,
                to: after,
            });
        }
        true
    }

    // ── Bus-transaction context ───────────────────────────────

    /// Execute one bus command byte and build the two-byte reply.
    ///
    /// A parity mismatch or unknown opcode mutates nothing and answers
    /// the sentinel reply, keeping the response framing regular.  The
    /// same sentinel answers any command arriving before the cold start
    /// has settled: acknowledging one would be a lie, since the settle
    /// seeding would overwrite its effect.  Side effects are confined
    /// to the status word and the notification line.
    pub fn handle_command(
        &self,
        byte: u8,
        line: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) -> Response {
        let cmd = match Command::decode(byte) {
            Ok(cmd) => cmd,
            Err(e) => {
                debug!("ignoring command byte {byte:#04x}: {e}");
                sink.emit(&AppEvent::CommandRejected(e));
                return Response::error();
            }
        };

        let value = critical_section::with(|cs| {
            let mut sh = self.shared.borrow_ref_mut(cs);
            if !sh.settled {
                return None;
            }
            Some(match cmd.opcode {
                Opcode::Reset => {
                    sh.status.clear(StatusFlag::ForceOpen);
                    sh.status.clear(StatusFlag::ForceClose);
                    line.release();
                    RESULT_ACK
                }
                Opcode::Open => {
                    sh.status.set(StatusFlag::ForceOpen);
                    sh.status.clear(StatusFlag::ForceClose);
                    RESULT_ACK
                }
                Opcode::Close => {
                    // May be instantly superseded by a held open button
                    // on the next resolution.
                    sh.status.set(StatusFlag::ForceClose);
                    sh.status.clear(StatusFlag::ForceOpen);
                    RESULT_ACK
                }
                Opcode::State => {
                    line.release();
                    sh.status.byte()
                }
            })
        });

        let Some(value) = value else {
            debug!("ignoring {:?} before cold start settles", cmd.opcode);
            return Response::error();
        };

        sink.emit(&AppEvent::CommandApplied(cmd.opcode));
        Response::new(value)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current status word (snapshot).
    pub fn status(&self) -> StatusWord {
        critical_section::with(|cs| self.shared.borrow_ref(cs).status)
    }

    /// Completed sampler rounds since power-on.
    pub fn rounds(&self) -> u32 {
        critical_section::with(|cs| self.shared.borrow_ref(cs).cursor.rounds())
    }

    // ── Internal ──────────────────────────────────────────────

    /// Outputs are a pure function of the resolved force flags.
    fn drive(status: StatusWord, hw: &mut impl ActuatorPort) {
        if status.contains(StatusFlag::ForceOpen) {
            hw.set_drive(DoorDrive::Open);
            hw.set_indicators(true, false);
        } else if status.contains(StatusFlag::ForceClose) {
            hw.set_drive(DoorDrive::Close);
            hw.set_indicators(false, true);
        } else {
            hw.set_drive(DoorDrive::Neutral);
            hw.set_indicators(false, false);
        }
    }
}
