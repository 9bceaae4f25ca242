//! # Closeable
//!
//! Uniform teardown for disposable work: subscriptions, background tasks,
//! registered listeners, open handles.
//!
//! Closeable provides:
//!
//! - **Closeable capability**: idempotent `close()` plus a monotonic `is_closed()`
//! - **Composite containers**: thread-safe collections closed with a single call,
//!   which close late arrivals instead of leaking them
//! - **Close listeners**: one-shot callbacks attached to any closeable
//! - **Scoped release**: close on every exit path, panics included
//! - **Adapters**: tokio tasks and `futures` abort handles as closeables
//!
//! ## Quick Start
//!
//! ```rust
//! use closeable::prelude::*;
//! use std::sync::Arc;
//!
//! let closeables = CompositeCloseable::new();
//!
//! let listener = Arc::new(closeable_fn(|| println!("unregistered")));
//! closeables.add(listener.clone());
//! assert_eq!(closeables.size(), 1);
//!
//! // Tear everything down, e.g. when a screen goes away.
//! closeables.close();
//! assert!(listener.is_closed());
//!
//! // Late arrivals are closed immediately.
//! let late = closeable_fn(|| {}).add_to(&closeables);
//! assert!(late.is_closed());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

#[cfg(feature = "adapters")]
pub mod adapters;
pub mod composite;
pub mod config;
pub mod core;
pub mod errors;
pub mod listenable;
pub mod observability;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::composite::CompositeCloseable;
    pub use crate::config::{CloseConfig, FailurePolicy};
    pub use crate::core::{
        closeable_fn, use_closeable, ActionCloseable, CloseFlag, CloseGuard, Closeable,
        CloseableExt,
    };
    pub use crate::errors::{CloseError, TeardownFailure};
    pub use crate::listenable::{CloseListener, ListenableCloseable, ListenerRegistration};

    #[cfg(feature = "adapters")]
    pub use crate::adapters::{
        subscribe, AbortHandleExt, JoinHandleExt, SubscriptionCloseable, TaskCloseable,
    };
}
