//! The closeable capability and its building blocks.
//!
//! This module contains:
//! - The [`Closeable`] trait and the [`CloseFlag`] latch implementors share
//! - [`ActionCloseable`], a closeable built from a teardown closure
//! - Scoped helpers that guarantee a close on every exit path
//! - [`CloseableExt`] sugar for wiring closeables into containers

mod action;
mod closeable;
mod ext;
mod scope;
pub(crate) mod teardown;

pub use action::{closeable_fn, ActionCloseable, TeardownAction};
pub use closeable::{CloseFlag, Closeable};
pub use ext::CloseableExt;
pub use scope::{use_closeable, CloseGuard};
