//! Configuration for containers and listener wrappers.

use serde::{Deserialize, Serialize};

/// What `close()` does with teardown actions that panicked.
///
/// Every remaining teardown is attempted before the policy applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log each failure with `tracing::warn!` and carry on.
    #[default]
    Log,
    /// Log each failure, then re-raise the aggregated error as a panic.
    Propagate,
}

/// Configuration shared by [`CompositeCloseable`](crate::composite::CompositeCloseable)
/// and [`ListenableCloseable`](crate::listenable::ListenableCloseable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseConfig {
    /// Label attached to log events and errors.
    #[serde(default)]
    pub name: Option<String>,
    /// Handling of panicking teardown actions in infallible operations.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Whether to emit a debug event for every close pass.
    #[serde(default = "default_log_teardown")]
    pub log_teardown: bool,
}

fn default_log_teardown() -> bool {
    true
}

impl Default for CloseConfig {
    fn default() -> Self {
        Self {
            name: None,
            failure_policy: FailurePolicy::default(),
            log_teardown: default_log_teardown(),
        }
    }
}

impl CloseConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Enables or disables per-pass debug events.
    #[must_use]
    pub fn with_log_teardown(mut self, enabled: bool) -> Self {
        self.log_teardown = enabled;
        self
    }

    /// Returns the label, or `"<unnamed>"`.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}
