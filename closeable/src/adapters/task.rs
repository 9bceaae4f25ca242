//! Tokio task adapter.

use crate::composite::CompositeCloseable;
use crate::core::{CloseFlag, Closeable};
use std::future::Future;
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinHandle};

/// A closeable that aborts a tokio task.
///
/// The closeable counts as closed once it has requested the abort, whether
/// or not the task had already finished.
#[derive(Debug)]
pub struct TaskCloseable {
    handle: AbortHandle,
    flag: CloseFlag,
}

impl TaskCloseable {
    /// Creates a closeable from an abort handle.
    #[must_use]
    pub const fn new(handle: AbortHandle) -> Self {
        Self {
            handle,
            flag: CloseFlag::new(),
        }
    }

    /// Creates a closeable that aborts the task behind `handle`.
    ///
    /// The join handle stays with the caller.
    #[must_use]
    pub fn from_join_handle<T>(handle: &JoinHandle<T>) -> Self {
        Self::new(handle.abort_handle())
    }

    /// Returns whether the task has stopped, by completing or by abort.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T> From<JoinHandle<T>> for TaskCloseable {
    fn from(handle: JoinHandle<T>) -> Self {
        Self::from_join_handle(&handle)
    }
}

impl Closeable for TaskCloseable {
    fn is_closed(&self) -> bool {
        self.flag.is_closed()
    }

    fn close(&self) {
        if self.flag.try_close() {
            self.handle.abort();
        }
    }
}

/// Sugar for registering tokio tasks with a container.
pub trait JoinHandleExt: Sized {
    /// Adds this task to `composite` so closing it aborts the task.
    ///
    /// Returns the join handle unchanged.
    #[must_use]
    fn add_to(self, composite: &CompositeCloseable) -> Self;
}

impl<T> JoinHandleExt for JoinHandle<T> {
    fn add_to(self, composite: &CompositeCloseable) -> Self {
        composite.add_task(&self);
        self
    }
}

impl CompositeCloseable {
    /// Adds a tokio task; closing the container aborts it.
    pub fn add_task<T>(&self, handle: &JoinHandle<T>) {
        self.add(Arc::new(TaskCloseable::from_join_handle(handle)));
    }

    /// Adds several tokio tasks at once; closing the container aborts them.
    ///
    /// The tasks are admitted or aborted together.
    pub fn add_tasks<'a, T, I>(&self, handles: I)
    where
        T: 'a,
        I: IntoIterator<Item = &'a JoinHandle<T>>,
    {
        self.add_all(handles.into_iter().map(|handle| {
            Arc::new(TaskCloseable::from_join_handle(handle)) as Arc<dyn Closeable>
        }));
    }

    /// Spawns `future` on the current tokio runtime and registers the task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        tokio::spawn(future).add_to(self)
    }
}
