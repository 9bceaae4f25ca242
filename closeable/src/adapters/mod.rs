//! Adapters from external task and event-stream handles to closeables.
//!
//! Each adapter turns a resource's own cancel operation into a
//! [`Closeable`](crate::core::Closeable):
//! - [`TaskCloseable`] aborts a tokio task
//! - [`SubscriptionCloseable`] aborts a `futures` abortable future or stream
//!
//! Enabled by the `adapters` feature.

mod subscription;
mod task;

pub use subscription::{subscribe, AbortHandleExt, SubscriptionCloseable};
pub use task::{JoinHandleExt, TaskCloseable};
