//! Extension methods available on every closeable.

use super::{use_closeable, CloseGuard, Closeable};
use crate::composite::CompositeCloseable;
use crate::listenable::ListenableCloseable;
use std::sync::Arc;

/// Convenience methods for any sized closeable.
///
/// Implemented for every `Closeable + 'static`.
pub trait CloseableExt: Closeable + Sized + 'static {
    /// Moves this closeable into an `Arc`, adds it to `composite`, and
    /// returns the shared handle.
    ///
    /// If `composite` is already closed the closeable is closed right away.
    fn add_to(self, composite: &CompositeCloseable) -> Arc<Self> {
        let shared = Arc::new(self);
        composite.add(shared.clone());
        shared
    }

    /// Wraps this closeable so callbacks can be attached to its close.
    fn listenable(self) -> ListenableCloseable<Self> {
        ListenableCloseable::new(self)
    }

    /// Returns a guard that closes this closeable when dropped.
    fn close_on_drop(self) -> CloseGuard<Self> {
        CloseGuard::new(self)
    }

    /// Runs `block`, then closes this closeable, even if `block` panics.
    fn use_with<R, F>(self, block: F) -> R
    where
        F: FnOnce(&Self) -> R,
    {
        use_closeable(self, block)
    }
}

impl<T: Closeable + 'static> CloseableExt for T {}
