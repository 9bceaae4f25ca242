//! Listener registry and registration handles.

use crate::core::{CloseFlag, Closeable};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// A callback run once when a [`ListenableCloseable`](super::ListenableCloseable) closes.
pub type CloseListener = Box<dyn FnOnce() + Send>;

/// Pending listeners, in registration order.
///
/// `listeners` becomes `None` when the owner closes; whoever takes it is the
/// one caller that fires them.
pub(crate) struct Registry {
    next_id: u64,
    listeners: Option<Vec<(u64, CloseListener)>>,
}

pub(crate) type SharedRegistry = Arc<Mutex<Registry>>;

impl Registry {
    pub(crate) fn shared() -> SharedRegistry {
        Arc::new(Mutex::new(Self {
            next_id: 0,
            listeners: Some(Vec::new()),
        }))
    }

    /// Adds a listener. Returns `None` once the registry has been drained.
    pub(crate) fn insert(&mut self, listener: CloseListener) -> Option<u64> {
        let listeners = self.listeners.as_mut()?;
        let id = self.next_id;
        self.next_id += 1;
        listeners.push((id, listener));
        Some(id)
    }

    pub(crate) fn remove(&mut self, id: u64) -> Option<CloseListener> {
        let listeners = self.listeners.as_mut()?;
        let index = listeners.iter().position(|(entry, _)| *entry == id)?;
        Some(listeners.remove(index).1)
    }

    /// Takes every pending listener and closes the registry for good.
    pub(crate) fn drain(&mut self) -> Option<Vec<CloseListener>> {
        self.listeners
            .take()
            .map(|listeners| listeners.into_iter().map(|(_, l)| l).collect())
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.as_ref().map_or(0, Vec::len)
    }
}

/// Handle returned by [`on_close`](super::ListenableCloseable::on_close).
///
/// Closing it removes the listener without running it and without touching
/// the wrapped closeable. `is_closed` reports whether the removal was done.
pub struct ListenerRegistration {
    id: Option<u64>,
    registry: Weak<Mutex<Registry>>,
    flag: CloseFlag,
}

impl ListenerRegistration {
    pub(crate) fn new(id: u64, registry: &SharedRegistry) -> Self {
        Self {
            id: Some(id),
            registry: Arc::downgrade(registry),
            flag: CloseFlag::new(),
        }
    }

    /// A registration for a listener that was never stored.
    pub(crate) fn detached() -> Self {
        let flag = CloseFlag::new();
        flag.try_close();
        Self {
            id: None,
            registry: Weak::new(),
            flag,
        }
    }
}

impl Closeable for ListenerRegistration {
    fn is_closed(&self) -> bool {
        self.flag.is_closed()
    }

    fn close(&self) {
        if !self.flag.try_close() {
            return;
        }

        let (Some(id), Some(registry)) = (self.id, self.registry.upgrade()) else {
            return;
        };

        // Drop the removed callback after the lock is released.
        let removed = registry.lock().remove(id);
        drop(removed);
    }
}

impl std::fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
