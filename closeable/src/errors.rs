//! Error types for teardown failures.
//!
//! Closing never fails at the [`Closeable`](crate::core::Closeable) level.
//! The only failure this crate knows about is a teardown action that panics
//! while a container or listener registry is being drained. Those are
//! collected here so callers of the `try_*` operations can inspect them after
//! every remaining teardown has been attempted.

use std::any::Any;
use thiserror::Error;

/// A single teardown action that panicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownFailure {
    /// Position of the failing item within the drained snapshot.
    pub index: usize,
    /// The panic message, if it could be recovered.
    pub message: String,
}

impl TeardownFailure {
    /// Creates a new teardown failure.
    #[must_use]
    pub fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Builds a failure from a panic payload returned by `catch_unwind`.
    #[must_use]
    pub fn from_panic(index: usize, payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "<non-string panic payload>".to_string()
        };

        Self::new(index, message)
    }
}

impl std::fmt::Display for TeardownFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}: {}", self.index, self.message)
    }
}

/// The main error type for close operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CloseError {
    /// One or more teardown actions panicked. All others were still run.
    #[error(
        "{} teardown action(s) failed{}: {}",
        .failures.len(),
        source_label(.name),
        join_failures(.failures)
    )]
    Teardown {
        /// Label of the container or wrapper that was being closed.
        name: Option<String>,
        /// Every failure, in the order the items were closed.
        failures: Vec<TeardownFailure>,
    },
}

fn source_label(name: &Option<String>) -> String {
    name.as_ref()
        .map(|n| format!(" in '{n}'"))
        .unwrap_or_default()
}

fn join_failures(failures: &[TeardownFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl CloseError {
    /// Creates a teardown error from collected failures.
    #[must_use]
    pub fn teardown(name: Option<String>, failures: Vec<TeardownFailure>) -> Self {
        Self::Teardown { name, failures }
    }

    /// Returns the individual failures.
    #[must_use]
    pub fn failures(&self) -> &[TeardownFailure] {
        match self {
            Self::Teardown { failures, .. } => failures,
        }
    }

    /// Turns a list of failures into a result.
    pub(crate) fn check(name: Option<&str>, failures: Vec<TeardownFailure>) -> Result<(), Self> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Self::teardown(name.map(String::from), failures))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_from_str_panic() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        let failure = TeardownFailure::from_panic(2, payload.as_ref());

        assert_eq!(failure.index, 2);
        assert_eq!(failure.message, "boom");
    }

    #[test]
    fn test_failure_from_string_panic() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        let failure = TeardownFailure::from_panic(0, payload.as_ref());

        assert_eq!(failure.message, "owned boom");
    }

    #[test]
    fn test_failure_from_opaque_panic() {
        let payload: Box<dyn Any + Send> = Box::new(42_u32);
        let failure = TeardownFailure::from_panic(0, payload.as_ref());

        assert_eq!(failure.message, "<non-string panic payload>");
    }

    #[test]
    fn test_check_empty_is_ok() {
        assert!(CloseError::check(Some("screen"), Vec::new()).is_ok());
    }

    #[test]
    fn test_error_display() {
        let err = CloseError::teardown(
            Some("screen".to_string()),
            vec![TeardownFailure::new(0, "a"), TeardownFailure::new(3, "b")],
        );

        assert_eq!(
            err.to_string(),
            "2 teardown action(s) failed in 'screen': #0: a, #3: b"
        );
        assert_eq!(err.failures().len(), 2);
    }

    #[test]
    fn test_error_display_without_name() {
        let err = CloseError::teardown(None, vec![TeardownFailure::new(1, "x")]);
        assert_eq!(err.to_string(), "1 teardown action(s) failed: #1: x");
    }
}
