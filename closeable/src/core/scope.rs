//! Scoped acquisition with guaranteed release.

use super::{teardown, Closeable};
use std::ops::Deref;
use std::thread;

/// Closes the wrapped closeable when dropped.
///
/// The close also happens while unwinding, so a panicking scope still
/// releases what it acquired. A close that panics during unwinding is
/// logged and swallowed instead of aborting the process.
#[derive(Debug)]
pub struct CloseGuard<C: Closeable> {
    inner: C,
    armed: bool,
}

impl<C: Closeable> CloseGuard<C> {
    /// Creates an armed guard.
    #[must_use]
    pub const fn new(inner: C) -> Self {
        Self { inner, armed: true }
    }

    /// Keeps the closeable open when the guard is dropped.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Returns whether the guard will close on drop.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }
}

impl<C: Closeable> Deref for CloseGuard<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C: Closeable> Drop for CloseGuard<C> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if thread::panicking() {
            let _ = teardown::run_one("close guard", 0, || self.inner.close());
        } else {
            self.inner.close();
        }
    }
}

/// Runs `block` with the closeable, then closes it.
///
/// The closeable is closed after `block` returns and also if it panics.
pub fn use_closeable<C, R, F>(closeable: C, block: F) -> R
where
    C: Closeable,
    F: FnOnce(&C) -> R,
{
    let guard = CloseGuard::new(closeable);
    block(&guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::CompositeCloseable;
    use crate::config::{CloseConfig, FailurePolicy};
    use crate::core::ActionCloseable;
    use crate::testing::{CountingCloseable, PanickingCloseable};
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Arc;

    #[test]
    fn test_use_closeable_returns_block_value() {
        let closeable = Arc::new(ActionCloseable::empty());

        let value = use_closeable(closeable.clone(), |c| {
            assert!(!c.is_closed());
            7
        });

        assert_eq!(value, 7);
        assert!(closeable.is_closed());
    }

    #[test]
    fn test_use_closeable_closes_on_panic() {
        let closeable = Arc::new(ActionCloseable::empty());
        let shared = closeable.clone();

        let result = catch_unwind(AssertUnwindSafe(|| {
            use_closeable(shared, |_| -> () { panic!("block failed") })
        }));

        assert!(result.is_err());
        assert!(closeable.is_closed());
    }

    #[test]
    fn test_propagating_close_during_unwind_is_swallowed() {
        let container = Arc::new(CompositeCloseable::with_config(
            CloseConfig::new().with_failure_policy(FailurePolicy::Propagate),
        ));
        let member = Arc::new(CountingCloseable::new());
        container.add(Arc::new(PanickingCloseable::new("member failed")));
        container.add(member.clone());

        let shared = container.clone();
        let result = catch_unwind(AssertUnwindSafe(|| {
            use_closeable(shared, |_| -> () { panic!("block failed") })
        }));

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"block failed"));
        assert!(container.is_closed());
        assert_eq!(member.teardown_count(), 1);
    }

    #[test]
    fn test_propagating_close_after_block_still_panics() {
        let container = Arc::new(CompositeCloseable::with_config(
            CloseConfig::new().with_failure_policy(FailurePolicy::Propagate),
        ));
        container.add(Arc::new(PanickingCloseable::new("member failed")));

        let shared = container.clone();
        let result = catch_unwind(AssertUnwindSafe(|| use_closeable(shared, |_| 1)));

        assert!(result.is_err());
        assert!(container.is_closed());
    }

    #[test]
    fn test_guard_closes_on_drop() {
        let closeable = Arc::new(ActionCloseable::empty());
        {
            let guard = CloseGuard::new(closeable.clone());
            assert!(guard.is_armed());
            assert!(!guard.is_closed());
        }
        assert!(closeable.is_closed());
    }

    #[test]
    fn test_disarmed_guard_keeps_open() {
        let closeable = Arc::new(ActionCloseable::empty());
        {
            let mut guard = CloseGuard::new(closeable.clone());
            guard.disarm();
        }
        assert!(!closeable.is_closed());
    }
}
