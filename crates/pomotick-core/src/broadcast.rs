//! Observer broadcast.
//!
//! Zero or more observers (a transient UI, the audio layer, a logger) may be
//! attached or detached at any time. Delivery is best-effort: an observer
//! that fails is logged and skipped, and never affects engine state or the
//! other observers.

use crate::events::Event;

/// A recipient of broadcast state snapshots.
pub trait Observer {
    /// A short name used when logging delivery failures.
    fn name(&self) -> &str {
        "observer"
    }

    fn notify(&self, event: &Event) -> Result<(), Box<dyn std::error::Error>>;
}

/// Handle returned by [`Hub::subscribe`], used to detach the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u64);

/// Fan-out of engine events to the attached observers.
#[derive(Default)]
pub struct Hub {
    observers: Vec<(ObserverId, Box<dyn Observer>)>,
    next_id: u64,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn Observer>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Detach an observer. Detaching twice is a no-op.
    pub fn unsubscribe(&mut self, id: ObserverId) {
        self.observers.retain(|(oid, _)| *oid != id);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Deliver `event` to every observer, best-effort.
    pub fn publish(&self, event: &Event) {
        for (_, observer) in &self.observers {
            if let Err(err) = observer.notify(event) {
                tracing::debug!(
                    observer = observer.name(),
                    error = %err,
                    "observer delivery failed; continuing"
                );
            }
        }
    }
}
