//! Testing utilities for code that manages closeables.
//!
//! This module provides:
//! - Closeables that record how often they were torn down
//! - Closeables whose teardown fails
//! - Assertions on closed state

mod assertions;
mod mocks;

pub use assertions::{assert_closed, assert_closed_once, assert_open};
pub use mocks::{CountingCloseable, PanickingCloseable};
