//! Shift-history debounce filter.
//!
//! Each monitored signal keeps an 8-bit history of its most recent raw
//! samples (bit 0 = newest, positive logic: 1 = signal asserted).  Edge
//! detection matches the history against a mask that requires three
//! consecutive settled samples on one side of a two-sample "don't care"
//! window, so up to two bounces neither miss nor double-fire an edge:
//!
//! ```text
//! mask     1 1 0 0 0 1 1 1
//! pressed  0 0 x x x 1 1 1   → edge, history := 0xFF
//! released 1 1 x x x 0 0 0   → edge, history := 0x00
//! ```
//!
//! The edge queries are one-shot: detecting an edge resets the history to
//! the fully-settled constant, so a second call between updates returns
//! false.  Callers must evaluate each edge type at most once per update
//! cycle or they will miss transitions.

const HISTORY_MASK: u8 = 0b1100_0111;
const PRESSED_PATTERN: u8 = 0b0000_0111;
const RELEASED_PATTERN: u8 = 0b1100_0000;

/// History value for a signal settled in the asserted state.
const SETTLED_DOWN: u8 = 0xFF;
/// History value for a signal settled in the deasserted state.
const SETTLED_UP: u8 = 0x00;

/// Debounce filter for one digital signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    history: u8,
}

impl Debouncer {
    /// A fresh filter starts fully asserted, matching the pull-up inputs
    /// of the controller boards at power-on.
    pub const fn new() -> Self {
        Self {
            history: SETTLED_DOWN,
        }
    }

    /// Shift in one raw sample.  Called once per sampler tick for this
    /// signal, from interrupt context.
    pub fn update(&mut self, sample: bool) {
        self.history = (self.history << 1) | u8::from(sample);
    }

    /// One-shot press edge: true iff the last three samples are asserted
    /// after a settled deasserted phase.  Consumes the edge by resetting
    /// the history to the settled-asserted state.
    pub fn is_pressed(&mut self) -> bool {
        if self.history & HISTORY_MASK == PRESSED_PATTERN {
            self.history = SETTLED_DOWN;
            true
        } else {
            false
        }
    }

    /// One-shot release edge, mirror of [`is_pressed`](Self::is_pressed).
    pub fn is_released(&mut self) -> bool {
        if self.history & HISTORY_MASK == RELEASED_PATTERN {
            self.history = SETTLED_UP;
            true
        } else {
            false
        }
    }

    /// Level query: the signal is settled asserted.  Never mutates.
    pub fn is_down(&self) -> bool {
        self.history == SETTLED_DOWN
    }

    /// Level query: the signal is settled deasserted.  Never mutates.
    pub fn is_up(&self) -> bool {
        self.history == SETTLED_UP
    }

    /// The signal is settled in either level (not mid-transition).
    pub fn is_settled(&self) -> bool {
        self.is_down() || self.is_up()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shift a sample sequence into a filter, oldest first.
    fn feed(filter: &mut Debouncer, samples: &[u8]) {
        for &s in samples {
            filter.update(s != 0);
        }
    }

    #[test]
    fn starts_settled_down() {
        let f = Debouncer::new();
        assert!(f.is_down());
        assert!(!f.is_up());
        assert!(f.is_settled());
    }

    #[test]
    fn press_after_clean_transition() {
        let mut f = Debouncer::new();
        feed(&mut f, &[0, 0, 0, 0, 0, 1, 1, 1]);
        assert!(f.is_pressed());
        // Edge consumed: the filter is now settled down.
        assert!(f.is_down());
    }

    #[test]
    fn press_is_one_shot() {
        let mut f = Debouncer::new();
        feed(&mut f, &[0, 0, 0, 0, 0, 1, 1, 1]);
        assert!(f.is_pressed());
        assert!(!f.is_pressed());
    }

    #[test]
    fn press_tolerates_two_bounces() {
        let mut f = Debouncer::new();
        // Two chatter samples inside the don't-care window.
        feed(&mut f, &[0, 0, 0, 1, 0, 1, 1, 1]);
        assert!(f.is_pressed());
    }

    #[test]
    fn no_press_while_still_bouncing() {
        let mut f = Debouncer::new();
        feed(&mut f, &[0, 0, 0, 0, 1, 0, 1, 1]);
        assert!(!f.is_pressed());
    }

    #[test]
    fn release_after_clean_transition() {
        let mut f = Debouncer::new();
        feed(&mut f, &[1, 1, 0, 0, 0, 0, 0, 0]);
        assert!(f.is_released());
        assert!(f.is_up());
        assert!(!f.is_released());
    }

    #[test]
    fn level_queries_do_not_mutate() {
        let mut f = Debouncer::new();
        feed(&mut f, &[0, 0, 0, 0, 0, 1, 1, 1]);
        let before = f;
        assert!(!f.is_down());
        assert!(!f.is_up());
        assert_eq!(f, before);
        // The pending press edge is still observable afterwards.
        assert!(f.is_pressed());
    }

    #[test]
    fn mid_transition_is_not_settled() {
        let mut f = Debouncer::new();
        f.update(false);
        assert!(!f.is_settled());
        feed(&mut f, &[0, 0, 0, 0, 0, 0, 0]);
        assert!(f.is_settled());
        assert!(f.is_up());
    }
}
