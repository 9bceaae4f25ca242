//! The closeable trait.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A unit of disposable work: a subscription, a background task, a
/// registered listener, an open handle.
///
/// Implementations must uphold two rules:
/// - `is_closed` is monotonic. Once it reports `true` it never goes back.
/// - `close` is idempotent. Only the first call tears anything down, also
///   when several threads race on that first call. Later calls return
///   immediately without side effects.
///
/// [`CloseFlag`] is the usual way to satisfy both.
pub trait Closeable: Send + Sync {
    /// Returns whether this closeable has been closed.
    fn is_closed(&self) -> bool;

    /// Closes this closeable. Repeated calls are no-ops.
    fn close(&self);
}

impl<T: Closeable + ?Sized> Closeable for Arc<T> {
    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn close(&self) {
        (**self).close();
    }
}

impl<T: Closeable + ?Sized> Closeable for Box<T> {
    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn close(&self) {
        (**self).close();
    }
}

/// A one-way open-to-closed latch.
///
/// `try_close` succeeds for exactly one caller, which makes it the point
/// where racing `close()` calls agree on a single winner.
#[derive(Default)]
pub struct CloseFlag {
    closed: AtomicBool,
}

impl CloseFlag {
    /// Creates an open flag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            closed: AtomicBool::new(false),
        }
    }

    /// Returns whether the flag has been flipped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Flips the flag. Returns `true` only for the call that flipped it.
    pub fn try_close(&self) -> bool {
        self.closed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

impl std::fmt::Debug for CloseFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloseFlag")
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[derive(Default)]
    struct Counter {
        flag: CloseFlag,
        teardowns: AtomicUsize,
    }

    impl Closeable for Counter {
        fn is_closed(&self) -> bool {
            self.flag.is_closed()
        }

        fn close(&self) {
            if self.flag.try_close() {
                self.teardowns.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_flag_starts_open() {
        let flag = CloseFlag::new();
        assert!(!flag.is_closed());
    }

    #[test]
    fn test_flag_single_winner() {
        let flag = CloseFlag::new();
        assert!(flag.try_close());
        assert!(!flag.try_close());
        assert!(flag.is_closed());
    }

    #[test]
    fn test_flag_concurrent_single_winner() {
        let flag = Arc::new(CloseFlag::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let flag = flag.clone();
                let winners = winners.clone();
                thread::spawn(move || {
                    if flag.try_close() {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_arc_forwards() {
        let inner = Arc::new(Counter::default());
        let outer: Arc<dyn Closeable> = inner.clone();

        outer.close();
        outer.close();

        assert!(inner.is_closed());
        assert_eq!(inner.teardowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_box_forwards() {
        let boxed: Box<dyn Closeable> = Box::new(Counter::default());
        assert!(!boxed.is_closed());
        boxed.close();
        assert!(boxed.is_closed());
    }
}
