//! Single-slot deadline used for the debounce and inactivity timers.
//!
//! Arming always replaces whatever was installed before, so at most one
//! deadline is outstanding. Only the installed deadline can fire: a replaced
//! or cancelled one is simply gone, and `take_due` clears the slot in the same
//! step that reports it due.

use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct Deadline {
    pending: Option<Instant>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any pending deadline and installs one `after` from `now`.
    pub fn arm(&mut self, now: Instant, after: Duration) {
        self.pending = Some(now + after);
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn at(&self) -> Option<Instant> {
        self.pending
    }

    /// Clears the slot and returns true if the installed deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(at) if at <= now => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_replaces_pending_deadline() {
        let start = Instant::now();
        let mut deadline = Deadline::new();

        deadline.arm(start, Duration::from_secs(3));
        deadline.arm(start + Duration::from_secs(1), Duration::from_secs(3));

        assert_eq!(deadline.at(), Some(start + Duration::from_secs(4)));
        // The replaced deadline at +3s no longer fires.
        assert!(!deadline.take_due(start + Duration::from_secs(3)));
    }

    #[test]
    fn take_due_waits_for_deadline() {
        let start = Instant::now();
        let mut deadline = Deadline::new();
        deadline.arm(start, Duration::from_secs(3));

        assert!(!deadline.take_due(start + Duration::from_secs(2)));
        assert!(deadline.take_due(start + Duration::from_secs(3)));
        assert_eq!(deadline.at(), None);
        assert!(!deadline.take_due(start + Duration::from_secs(10)));
    }

    #[test]
    fn rearm_pushes_out_a_burst() {
        let start = Instant::now();
        let mut deadline = Deadline::new();
        for offset in 0..5 {
            deadline.arm(start + Duration::from_secs(offset), Duration::from_secs(3));
        }

        // Three seconds after the first event the burst is still open.
        assert!(!deadline.take_due(start + Duration::from_secs(3)));
        assert!(deadline.take_due(start + Duration::from_secs(7)));
    }

    #[test]
    fn cancel_clears_without_firing() {
        let start = Instant::now();
        let mut deadline = Deadline::new();
        deadline.arm(start, Duration::ZERO);

        deadline.cancel();

        assert_eq!(deadline.at(), None);
        assert!(!deadline.take_due(start + Duration::from_secs(1)));
    }
}
