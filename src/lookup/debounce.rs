use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::trace;

use super::clock::Clock;

/// Identity of one issued call. Ids grow monotonically per site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn from_seq(seq: u64) -> Self {
        Self(seq)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Quiet-period scheduler for a single lookup site. A trigger inside the
/// window replaces the pending intent, so at most one call is ever pending.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    clock: Arc<dyn Clock>,
    deadline: Option<Instant>,
    next_id: u64,
    latest: Option<RequestId>,
}

impl Debouncer {
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            window,
            clock,
            deadline: None,
            next_id: 0,
            latest: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn trigger(&mut self) {
        let deadline = self.clock.now() + self.window;
        trace!(window_ms = self.window.as_millis() as u64, "debounce trigger");
        self.deadline = Some(deadline);
    }

    /// Issues the call immediately, dropping any pending intent.
    pub fn fire_now(&mut self) -> RequestId {
        self.deadline = None;
        self.issue()
    }

    /// Returns the id of the call to issue once the quiet period is over.
    pub fn poll(&mut self) -> Option<RequestId> {
        let deadline = self.deadline?;
        if self.clock.now() < deadline {
            return None;
        }
        self.deadline = None;
        Some(self.issue())
    }

    fn issue(&mut self) -> RequestId {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        self.latest = Some(id);
        id
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Drops the pending intent and invalidates every issued call.
    pub fn reset(&mut self) {
        self.deadline = None;
        self.latest = None;
    }

    pub fn time_left(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(self.clock.now()))
    }

    /// Whether a completion for `id` is still the one to apply.
    pub fn is_current(&self, id: RequestId) -> bool {
        self.latest == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::ManualClock;

    fn debouncer(window_ms: u64) -> (ManualClock, Debouncer) {
        let clock = ManualClock::new();
        let debouncer = Debouncer::new(Duration::from_millis(window_ms), Arc::new(clock.clone()));
        (clock, debouncer)
    }

    #[test]
    fn burst_of_triggers_issues_one_call_after_the_last() {
        let (clock, mut debouncer) = debouncer(500);
        let mut issued = Vec::new();
        for at in (0..=800).step_by(10) {
            clock.set(Duration::from_millis(at));
            if matches!(at, 0 | 100 | 200) {
                debouncer.trigger();
            }
            if let Some(id) = debouncer.poll() {
                issued.push((at, id));
            }
        }
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].0, 700);
    }

    #[test]
    fn only_the_latest_call_is_current() {
        let (clock, mut debouncer) = debouncer(100);
        debouncer.trigger();
        clock.advance(Duration::from_millis(100));
        let first = debouncer.poll().unwrap();
        debouncer.trigger();
        assert!(debouncer.is_current(first));
        clock.advance(Duration::from_millis(100));
        let second = debouncer.poll().unwrap();
        assert!(!debouncer.is_current(first));
        assert!(debouncer.is_current(second));
    }

    #[test]
    fn cancel_drops_the_pending_intent() {
        let (clock, mut debouncer) = debouncer(100);
        debouncer.trigger();
        debouncer.cancel();
        clock.advance(Duration::from_secs(1));
        assert!(debouncer.poll().is_none());
    }
}
