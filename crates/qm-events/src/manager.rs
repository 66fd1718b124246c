//! Handler trait and fan-out registry.

use crate::Event;

/// Callback invoked for every event the engine emits.
///
/// Handlers receive events in emission order, which is deterministic for a
/// given run seed and executor.
pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &Event);

    /// Called when a run (re)starts so stateful handlers can clear
    /// accumulated data.  Default: no-op.
    fn reset(&mut self) {}
}

/// Fan-out registry: forwards every event to all registered handlers, in
/// registration order.
///
/// The engine holds an `&mut EventsManager` during sequential phases only;
/// handlers never run inside parallel sections, so they need no internal
/// synchronisation.
#[derive(Default)]
pub struct EventsManager {
    handlers: Vec<Box<dyn EventHandler>>,
}

impl EventsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler.  Returns `self` for chaining at setup time.
    pub fn add_handler(&mut self, handler: Box<dyn EventHandler>) -> &mut Self {
        self.handlers.push(handler);
        self
    }

    /// Deliver `event` to every handler.
    #[inline]
    pub fn process(&mut self, event: Event) {
        for h in &mut self.handlers {
            h.handle_event(&event);
        }
    }

    /// Reset every handler (start of a new run).
    pub fn reset(&mut self) {
        for h in &mut self.handlers {
            h.reset();
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}
