//! The composite container.

use crate::config::CloseConfig;
use crate::core::teardown;
use crate::core::Closeable;
use crate::errors::CloseError;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Closed flag and membership, guarded together.
#[derive(Default)]
struct State {
    closed: bool,
    members: Vec<Arc<dyn Closeable>>,
}

/// A mutable, thread-safe collection of closeables.
///
/// Members are closed in insertion order, outside the internal lock, so a
/// member's `close()` may call back into the container without deadlocking.
/// Such re-entrant calls see the already drained state; beyond that,
/// re-entrant mutation has no ordering guarantees.
///
/// Membership is by identity: two `Arc`s are the same member only if they
/// point at the same allocation.
#[derive(Default)]
pub struct CompositeCloseable {
    state: Mutex<State>,
    config: CloseConfig,
}

impl CompositeCloseable {
    /// Creates an empty, open container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty, open container with the given configuration.
    #[must_use]
    pub fn with_config(config: CloseConfig) -> Self {
        Self {
            state: Mutex::new(State::default()),
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CloseConfig {
        &self.config
    }

    /// Adds a closeable.
    ///
    /// If the container is already closed the closeable is closed instead of
    /// being admitted.
    pub fn add(&self, closeable: Arc<dyn Closeable>) {
        self.add_all(std::iter::once(closeable));
    }

    /// Adds several closeables at once.
    ///
    /// The open/closed check and the append happen under one lock, so a
    /// concurrent `close()` either drains these items or they are closed
    /// here. Nothing is silently dropped.
    pub fn add_all<I>(&self, closeables: I)
    where
        I: IntoIterator<Item = Arc<dyn Closeable>>,
    {
        let closeables: Vec<_> = closeables.into_iter().collect();
        if closeables.is_empty() {
            return;
        }

        let rejected = {
            let mut state = self.state.lock();
            if state.closed {
                closeables
            } else {
                state.members.extend(closeables);
                return;
            }
        };

        if self.config.log_teardown {
            debug!(
                name = %self.config.label(),
                count = rejected.len(),
                "Container already closed, closing added items"
            );
        }
        teardown::settle(&self.config, self.close_members(rejected));
    }

    /// Removes `closeable` from the container and closes it.
    ///
    /// The closeable is closed whether or not it was a member, and whether
    /// or not the container is closed. Returns `true` if it was a member.
    pub fn remove<C>(&self, closeable: &Arc<C>) -> bool
    where
        C: Closeable + ?Sized,
    {
        let removed = self.delete(closeable);
        let failures =
            teardown::run_all(self.config.label(), std::iter::once(|| closeable.close()));
        teardown::settle(
            &self.config,
            CloseError::check(self.config.name.as_deref(), failures),
        );
        removed
    }

    /// Removes `closeable` from the container without closing it.
    ///
    /// Ownership of the teardown goes back to the caller. Returns `true` if
    /// it was a member.
    pub fn delete<C>(&self, closeable: &Arc<C>) -> bool
    where
        C: Closeable + ?Sized,
    {
        let target = Arc::as_ptr(closeable).cast::<()>();
        let mut state = self.state.lock();
        match state.members.iter().position(|m| same_allocation(m, target)) {
            Some(index) => {
                state.members.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns whether `closeable` is currently a member.
    #[must_use]
    pub fn contains<C>(&self, closeable: &Arc<C>) -> bool
    where
        C: Closeable + ?Sized,
    {
        let target = Arc::as_ptr(closeable).cast::<()>();
        self.state
            .lock()
            .members
            .iter()
            .any(|m| same_allocation(m, target))
    }

    /// Closes every current member and empties the container.
    ///
    /// The container itself stays open and keeps accepting members.
    pub fn clear(&self) {
        teardown::settle(&self.config, self.try_clear());
    }

    /// Like [`clear`](Self::clear), but returns teardown failures instead of
    /// applying the failure policy.
    pub fn try_clear(&self) -> Result<(), CloseError> {
        let members = std::mem::take(&mut self.state.lock().members);
        self.close_members(members)
    }

    /// Closes the container and all current members.
    ///
    /// Only the first call does anything. Returns the teardown failures of
    /// that pass instead of applying the failure policy.
    pub fn try_close(&self) -> Result<(), CloseError> {
        let members = {
            let mut state = self.state.lock();
            if state.closed {
                return Ok(());
            }
            state.closed = true;
            std::mem::take(&mut state.members)
        };

        self.close_members(members)
    }

    /// Returns the number of members at the time of the call.
    #[must_use]
    pub fn size(&self) -> usize {
        self.state.lock().members.len()
    }

    /// Returns whether the container has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn close_members(&self, members: Vec<Arc<dyn Closeable>>) -> Result<(), CloseError> {
        if members.is_empty() {
            return Ok(());
        }

        if self.config.log_teardown {
            debug!(
                name = %self.config.label(),
                members = members.len(),
                "Closing container members"
            );
        }

        let failures = teardown::run_all(
            self.config.label(),
            members.iter().map(|member| move || member.close()),
        );
        CloseError::check(self.config.name.as_deref(), failures)
    }
}

fn same_allocation(member: &Arc<dyn Closeable>, target: *const ()) -> bool {
    std::ptr::eq(Arc::as_ptr(member).cast::<()>(), target)
}

impl Closeable for CompositeCloseable {
    fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn close(&self) {
        teardown::settle(&self.config, self.try_close());
    }
}

impl std::fmt::Debug for CompositeCloseable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CompositeCloseable")
            .field("name", &self.config.name)
            .field("size", &state.members.len())
            .field("closed", &state.closed)
            .finish()
    }
}
