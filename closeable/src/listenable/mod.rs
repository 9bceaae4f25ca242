//! Closeables that notify listeners when they close.

mod listener;
mod wrapper;

pub use listener::{CloseListener, ListenerRegistration};
pub use wrapper::ListenableCloseable;
