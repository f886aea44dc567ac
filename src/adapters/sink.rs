//! Event sink adapters.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Forwards every event to the `log` facade.
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::CommandRejected(e) => warn!("command rejected: {e}"),
            other => info!("{other:?}"),
        }
    }
}

/// Collects events into a fixed-capacity buffer for no-alloc targets;
/// the main loop drains it at its own pace.  Overflow drops the newest
/// event and counts it.
pub struct BufferedSink<const N: usize> {
    events: heapless::Vec<AppEvent, N>,
    dropped: u32,
}

impl<const N: usize> BufferedSink<N> {
    pub const fn new() -> Self {
        Self {
            events: heapless::Vec::new(),
            dropped: 0,
        }
    }

    /// Take all buffered events, oldest first.
    pub fn drain(&mut self) -> heapless::Vec<AppEvent, N> {
        core::mem::take(&mut self.events)
    }

    /// Events lost to overflow since construction.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<const N: usize> Default for BufferedSink<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventSink for BufferedSink<N> {
    fn emit(&mut self, event: &AppEvent) {
        if self.events.push(*event).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusWord;

    #[test]
    fn buffered_sink_collects_in_order() {
        let mut sink: BufferedSink<4> = BufferedSink::new();
        sink.emit(&AppEvent::Settled(StatusWord::empty()));
        sink.emit(&AppEvent::StatusChanged {
            from: StatusWord::empty(),
            to: StatusWord::from_byte(0x01),
        });
        let events = sink.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], AppEvent::Settled(_)));
        assert!(sink.drain().is_empty());
    }

    #[test]
    fn buffered_sink_counts_overflow() {
        let mut sink: BufferedSink<2> = BufferedSink::new();
        for _ in 0..5 {
            sink.emit(&AppEvent::Settled(StatusWord::empty()));
        }
        assert_eq!(sink.drain().len(), 2);
        assert_eq!(sink.dropped(), 3);
    }
}
