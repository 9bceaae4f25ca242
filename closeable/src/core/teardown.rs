//! Running teardown actions without letting one failure stop the rest.

use crate::config::{CloseConfig, FailurePolicy};
use crate::errors::{CloseError, TeardownFailure};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

/// Runs every teardown in order, catching panics.
///
/// Returns the failures in the order they happened.
pub(crate) fn run_all<I, F>(label: &str, teardowns: I) -> Vec<TeardownFailure>
where
    I: IntoIterator<Item = F>,
    F: FnOnce(),
{
    teardowns
        .into_iter()
        .enumerate()
        .filter_map(|(index, teardown)| run_one(label, index, teardown).err())
        .collect()
}

/// Runs a single teardown, catching a panic.
pub(crate) fn run_one<F>(label: &str, index: usize, teardown: F) -> Result<(), TeardownFailure>
where
    F: FnOnce(),
{
    catch_unwind(AssertUnwindSafe(teardown)).map_err(|payload| {
        let failure = TeardownFailure::from_panic(index, payload.as_ref());
        warn!(
            name = %label,
            index = index,
            error = %failure.message,
            "Teardown action panicked"
        );
        failure
    })
}

/// Applies the configured failure policy to the outcome of an infallible
/// operation.
pub(crate) fn settle(config: &CloseConfig, result: Result<(), CloseError>) {
    if let Err(err) = result {
        match config.failure_policy {
            FailurePolicy::Log => {}
            FailurePolicy::Propagate => panic!("{err}"),
        }
    }
}
