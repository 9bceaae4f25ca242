//! The listener-augmented closeable.

use super::listener::{Registry, SharedRegistry};
use super::ListenerRegistration;
use crate::config::CloseConfig;
use crate::core::teardown;
use crate::core::Closeable;
use crate::errors::{CloseError, TeardownFailure};
use parking_lot::ReentrantMutex;
use tracing::debug;

/// Wraps a closeable and runs registered listeners once it closes.
///
/// The wrapper owns its delegate; nothing else should close the delegate
/// directly. It has no closed state of its own: `is_closed` reads through to
/// the delegate.
///
/// Listeners registered after the wrapper closed are dropped without being
/// run, and their registration is returned already closed.
///
/// Close passes are serialized: a caller racing the first `close()` returns
/// only after the delegate has closed and the listeners have run.
pub struct ListenableCloseable<C: Closeable> {
    delegate: C,
    registry: SharedRegistry,
    close_pass: ReentrantMutex<()>,
    config: CloseConfig,
}

impl<C: Closeable> ListenableCloseable<C> {
    /// Wraps `delegate`.
    #[must_use]
    pub fn new(delegate: C) -> Self {
        Self::with_config(delegate, CloseConfig::default())
    }

    /// Wraps `delegate` with the given configuration.
    #[must_use]
    pub fn with_config(delegate: C, config: CloseConfig) -> Self {
        Self {
            delegate,
            registry: Registry::shared(),
            close_pass: ReentrantMutex::new(()),
            config,
        }
    }

    /// Registers a listener to run when this closeable closes.
    ///
    /// Closing the returned registration unregisters the listener.
    pub fn on_close<F>(&self, listener: F) -> ListenerRegistration
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.registry.lock().insert(Box::new(listener));
        if let Some(id) = id {
            ListenerRegistration::new(id, &self.registry)
        } else {
            debug!(
                name = %self.config.label(),
                "Listener registered after close, dropping it"
            );
            ListenerRegistration::detached()
        }
    }

    /// Returns the number of listeners still waiting to run.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Returns the wrapped closeable.
    #[must_use]
    pub const fn delegate(&self) -> &C {
        &self.delegate
    }

    /// Unwraps the delegate. Pending listeners are discarded.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.delegate
    }

    /// Closes the delegate and runs the listeners, returning any teardown
    /// failures instead of applying the failure policy.
    ///
    /// A delegate failure is reported at index 0; listener `n` in
    /// registration order is reported at index `n + 1`.
    pub fn try_close(&self) -> Result<(), CloseError> {
        let label = self.config.label();
        // Re-entrant so a listener or the delegate may call back into close.
        let _pass = self.close_pass.lock();
        let mut failures: Vec<_> = teardown::run_one(label, 0, || self.delegate.close())
            .err()
            .into_iter()
            .collect();

        // Exactly one caller gets the listeners out of the registry.
        let listeners = self.registry.lock().drain();
        if let Some(listeners) = listeners {
            if self.config.log_teardown && !listeners.is_empty() {
                debug!(
                    name = %label,
                    listeners = listeners.len(),
                    "Running close listeners"
                );
            }
            failures.extend(
                teardown::run_all(label, listeners)
                    .into_iter()
                    .map(|f| TeardownFailure::new(f.index + 1, f.message)),
            );
        }

        CloseError::check(self.config.name.as_deref(), failures)
    }
}

impl<C: Closeable> Closeable for ListenableCloseable<C> {
    fn is_closed(&self) -> bool {
        self.delegate.is_closed()
    }

    fn close(&self) {
        teardown::settle(&self.config, self.try_close());
    }
}

impl<C: Closeable> std::fmt::Debug for ListenableCloseable<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenableCloseable")
            .field("name", &self.config.name)
            .field("closed", &self.is_closed())
            .field("listener_count", &self.listener_count())
            .finish()
    }
}
