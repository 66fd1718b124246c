//! In-memory event recorder for tests and small analyses.

use crate::{Event, EventHandler, EventKind};

/// Records every event into a growable vector.
///
/// Useful in tests (assert on the exact stream) and for small scenario
/// analyses where post-processing in memory beats streaming to disk.
#[derive(Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events matching `pred`, in stream order.
    pub fn filtered(&self, pred: impl Fn(&EventKind) -> bool) -> Vec<Event> {
        self.events.iter().copied().filter(|e| pred(&e.kind)).collect()
    }

    /// Drain the recorded events, leaving the log empty.
    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

impl EventHandler for EventLog {
    fn handle_event(&mut self, event: &Event) {
        self.events.push(*event);
    }

    fn reset(&mut self) {
        self.events.clear();
    }
}
