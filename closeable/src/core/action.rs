//! Closeables built from a teardown closure.

use super::{CloseFlag, Closeable};
use parking_lot::Mutex;

/// A boxed teardown action.
pub type TeardownAction = Box<dyn FnOnce() + Send>;

/// A closeable that runs a closure the first time it is closed.
///
/// This is the adapter for anything whose teardown is "call this once":
/// unregistering a listener, dropping a subscription, releasing a handle.
pub struct ActionCloseable {
    flag: CloseFlag,
    action: Mutex<Option<TeardownAction>>,
}

impl ActionCloseable {
    /// Creates a closeable that runs `action` on first close.
    #[must_use]
    pub fn new<F>(action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            flag: CloseFlag::new(),
            action: Mutex::new(Some(Box::new(action))),
        }
    }

    /// Creates a closeable with nothing to tear down.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(|| {})
    }
}

impl Closeable for ActionCloseable {
    fn is_closed(&self) -> bool {
        self.flag.is_closed()
    }

    fn close(&self) {
        if !self.flag.try_close() {
            return;
        }

        // Take the action out before running it so the lock is not held
        // while user code executes.
        let action = self.action.lock().take();
        if let Some(action) = action {
            action();
        }
    }
}

impl std::fmt::Debug for ActionCloseable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionCloseable")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Creates a closeable from a teardown closure.
#[must_use]
pub fn closeable_fn<F>(action: F) -> ActionCloseable
where
    F: FnOnce() + Send + 'static,
{
    ActionCloseable::new(action)
}
