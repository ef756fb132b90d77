//! Listener registrations
//!
//! A mosaic registers one listener per event kind at construction and drops
//! them all on destroy. Events whose kind has no registration are ignored.

use crate::EventKind;

/// Event listener registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventListener {
    pub kind: EventKind,
    pub id: u32,
    /// Passive listeners never suppress the host's default action
    pub passive: bool,
}

/// Registered listeners of one mosaic
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    listeners: Vec<EventListener>,
    next_id: u32,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener, returning its id
    pub fn register(&mut self, kind: EventKind, passive: bool) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push(EventListener { kind, id, passive });
        id
    }

    pub fn get(&self, kind: EventKind) -> Option<&EventListener> {
        self.listeners.iter().find(|l| l.kind == kind)
    }

    /// Drop every registration, returning how many were released
    pub fn clear(&mut self) -> usize {
        let released = self.listeners.len();
        self.listeners.clear();
        released
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
