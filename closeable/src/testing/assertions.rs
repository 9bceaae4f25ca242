//! Assertions on closed state.

use super::CountingCloseable;
use crate::core::Closeable;

/// Asserts that the closeable is closed.
pub fn assert_closed<C: Closeable + ?Sized>(closeable: &C) {
    assert!(closeable.is_closed(), "Expected closeable to be closed, but it is open");
}

/// Asserts that the closeable is still open.
pub fn assert_open<C: Closeable + ?Sized>(closeable: &C) {
    assert!(!closeable.is_closed(), "Expected closeable to be open, but it is closed");
}

/// Asserts that the closeable is closed and its teardown ran exactly once.
pub fn assert_closed_once(closeable: &CountingCloseable) {
    assert_closed(closeable);
    assert_eq!(
        closeable.teardown_count(),
        1,
        "Expected exactly one teardown, got {} (close called {} times)",
        closeable.teardown_count(),
        closeable.close_count()
    );
}
