//! Event-stream subscription adapter.

use crate::composite::CompositeCloseable;
use crate::core::Closeable;
use futures::future::{AbortHandle, Abortable};
use futures::{Stream, StreamExt};
use std::sync::Arc;

/// A closeable subscription backed by a `futures` abort handle.
///
/// Closed exactly when the handle has been aborted, by this closeable or
/// through another clone of the handle.
#[derive(Debug, Clone)]
pub struct SubscriptionCloseable {
    handle: AbortHandle,
}

impl SubscriptionCloseable {
    /// Creates a closeable from an abort handle.
    #[must_use]
    pub const fn new(handle: AbortHandle) -> Self {
        Self { handle }
    }

    /// Returns the underlying abort handle.
    #[must_use]
    pub const fn handle(&self) -> &AbortHandle {
        &self.handle
    }
}

impl From<AbortHandle> for SubscriptionCloseable {
    fn from(handle: AbortHandle) -> Self {
        Self::new(handle)
    }
}

impl Closeable for SubscriptionCloseable {
    fn is_closed(&self) -> bool {
        self.handle.is_aborted()
    }

    fn close(&self) {
        self.handle.abort();
    }
}

/// Sugar for registering abort handles with a container.
pub trait AbortHandleExt: Sized {
    /// Adds this handle to `composite` so closing it aborts the work.
    ///
    /// Returns the handle unchanged.
    #[must_use]
    fn add_to(self, composite: &CompositeCloseable) -> Self;
}

impl AbortHandleExt for AbortHandle {
    fn add_to(self, composite: &CompositeCloseable) -> Self {
        composite.add(Arc::new(SubscriptionCloseable::new(self.clone())));
        self
    }
}

/// Consumes `stream` on the current tokio runtime, calling `on_next` for
/// every item until the stream ends or the subscription is closed.
///
/// # Panics
///
/// Panics when called outside a tokio runtime.
pub fn subscribe<S, F>(stream: S, mut on_next: F) -> SubscriptionCloseable
where
    S: Stream + Send + 'static,
    S::Item: Send,
    F: FnMut(S::Item) + Send + 'static,
{
    let (handle, registration) = AbortHandle::new_pair();
    let stream = Abortable::new(stream, registration);

    tokio::spawn(stream.for_each(move |item| {
        on_next(item);
        futures::future::ready(())
    }));

    SubscriptionCloseable::new(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    async fn wait_for_len(items: &Arc<Mutex<Vec<u32>>>, len: usize) {
        for _ in 0..100 {
            if items.lock().len() >= len {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[test]
    fn test_close_aborts_future() {
        let (handle, registration) = AbortHandle::new_pair();
        let closeable = SubscriptionCloseable::from(handle);
        let future = Abortable::new(std::future::pending::<()>(), registration);

        assert!(!closeable.is_closed());
        closeable.close();
        closeable.close();

        assert!(closeable.is_closed());
        assert!(tokio_test::block_on(future).is_err());
    }

    #[test]
    fn test_closed_through_foreign_clone() {
        let (handle, _registration) = AbortHandle::new_pair();
        let closeable = SubscriptionCloseable::new(handle.clone());

        handle.abort();

        assert!(closeable.is_closed());
    }

    #[test]
    fn test_add_to_composite() {
        let composite = CompositeCloseable::new();
        let (handle, registration) = AbortHandle::new_pair();
        let handle = handle.add_to(&composite);

        composite.close();

        assert!(handle.is_aborted());
        let future = Abortable::new(async { 1 }, registration);
        assert!(tokio_test::block_on(future).is_err());
    }

    #[tokio::test]
    async fn test_subscribe_delivers_until_closed() {
        let (tx, rx) = mpsc::unbounded::<u32>();
        let items = Arc::new(Mutex::new(Vec::new()));

        let subscription = {
            let items = items.clone();
            subscribe(rx, move |item| items.lock().push(item))
        };

        tx.unbounded_send(1).unwrap();
        tx.unbounded_send(2).unwrap();
        wait_for_len(&items, 2).await;

        subscription.close();
        assert!(subscription.is_closed());

        // The receiver may already be gone once the task observed the abort.
        let _ = tx.unbounded_send(3);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(*items.lock(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_subscriptions_torn_down_with_composite() {
        let composite = CompositeCloseable::new();
        let (_tx, rx) = mpsc::unbounded::<u32>();

        let subscription = subscribe(rx, |_| {});
        composite.add(Arc::new(subscription.clone()));

        composite.close();

        assert!(subscription.is_closed());
    }
}
