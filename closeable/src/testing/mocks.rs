//! Closeable test doubles.

use crate::core::{CloseFlag, Closeable};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A closeable that counts teardowns and `close()` calls separately.
///
/// A correct container never makes `teardown_count` exceed one, however
/// often `close()` is called.
#[derive(Debug, Default)]
pub struct CountingCloseable {
    flag: CloseFlag,
    close_calls: AtomicUsize,
    teardowns: AtomicUsize,
}

impl CountingCloseable {
    /// Creates an open closeable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many times `close()` was called.
    #[must_use]
    pub fn close_count(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// Returns how many times the teardown actually ran.
    #[must_use]
    pub fn teardown_count(&self) -> usize {
        self.teardowns.load(Ordering::SeqCst)
    }
}

impl Closeable for CountingCloseable {
    fn is_closed(&self) -> bool {
        self.flag.is_closed()
    }

    fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        if self.flag.try_close() {
            self.teardowns.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// A closeable whose teardown panics with a fixed message.
///
/// It is marked closed before panicking, like a handle that was released
/// but reported an error on the way out.
#[derive(Debug)]
pub struct PanickingCloseable {
    flag: CloseFlag,
    message: String,
}

impl PanickingCloseable {
    /// Creates a closeable that panics with `message` on first close.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            flag: CloseFlag::new(),
            message: message.into(),
        }
    }
}

impl Closeable for PanickingCloseable {
    fn is_closed(&self) -> bool {
        self.flag.is_closed()
    }

    fn close(&self) {
        if self.flag.try_close() {
            panic!("{}", self.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_counting_closeable() {
        let closeable = CountingCloseable::new();
        closeable.close();
        closeable.close();

        assert_eq!(closeable.close_count(), 2);
        assert_eq!(closeable.teardown_count(), 1);
        assert!(closeable.is_closed());
    }

    #[test]
    fn test_panicking_closeable_panics_once() {
        let closeable = PanickingCloseable::new("boom");

        assert!(catch_unwind(AssertUnwindSafe(|| closeable.close())).is_err());
        assert!(closeable.is_closed());
        closeable.close();
    }
}
