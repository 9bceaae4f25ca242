//! Thread-safe containers of closeables.
//!
//! A [`CompositeCloseable`] collects closeables and tears all of them down
//! with a single `close()`. Once closed it keeps rejecting new members by
//! closing them on arrival, so nothing added late is leaked.

mod container;

pub use container::CompositeCloseable;
