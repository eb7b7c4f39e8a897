//! Error types for agent registration, graph validation, and execution.
//!
//! This module defines every error the engine can raise, from registering a
//! malformed state through to a run terminating because a state exhausted
//! its retries. All variants implement `std::error::Error` via `thiserror`.
//!
//! # Error Hierarchy
//!
//! ```text
//! EngineError
//! ├── InvalidRegistration   - bad state name / non-callable function
//! ├── InvalidResourceSpec   - out-of-range cpu/memory/timeout/retries
//! ├── UnknownState          - lookup of an unregistered name
//! ├── UnresolvedDependency  - dependency name has no descriptor at run start
//! ├── CyclicGraph           - dependencies form a cycle
//! ├── NoEntryPoint          - no state is initially dispatchable
//! ├── StateTimeout          - a single attempt exceeded its deadline
//! ├── StateFailed           - a state exhausted retries
//! ├── RunFailed             - aggregates a terminal StateFailed for run()
//! ├── Serialization         - context value could not round-trip through JSON
//! └── Custom                - application-defined error
//! ```
//!
//! # Examples
//!
//! ```rust
//! use flowctl_engine::error::EngineError;
//!
//! fn handle(err: EngineError) {
//!     match err {
//!         EngineError::CyclicGraph(cycle) => {
//!             eprintln!("dependency cycle: {}", cycle.join(" -> "));
//!         }
//!         EngineError::RunFailed { state, attempts, .. } => {
//!             eprintln!("{} failed after {} attempts", state, attempts);
//!         }
//!         other => eprintln!("{other}"),
//!     }
//! }
//! ```

use thiserror::Error;

/// Convenience result type using [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;

/// Comprehensive error type for registration, validation, and execution.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A state was registered with an empty name, or a forbidden function reference.
    #[error("invalid state registration: {0}")]
    InvalidRegistration(String),

    /// A resource spec field was out of range (negative cpu/memory, non-positive timeout).
    #[error("invalid resource spec for state '{state}': {reason}")]
    InvalidResourceSpec {
        /// Name of the state whose spec failed validation.
        state: String,
        /// Description of the violated constraint.
        reason: String,
    },

    /// Lookup of a state name that has no registered descriptor.
    #[error("unknown state: '{0}'")]
    UnknownState(String),

    /// A dependency name was never registered by the time the run started.
    #[error("unresolved dependency '{dependency}' required by state '{state}'")]
    UnresolvedDependency {
        /// The state declaring the dependency.
        state: String,
        /// The dependency name that could not be resolved.
        dependency: String,
    },

    /// The static dependency graph contains a cycle.
    #[error("cyclic dependency graph: {}", .0.join(" -> "))]
    CyclicGraph(Vec<String>),

    /// No state was dispatchable at run start.
    #[error("no entry point: no registered state has an empty dependency list or explicit entry designation")]
    NoEntryPoint,

    /// A single attempt exceeded its configured timeout.
    #[error("state '{state}' timed out after {timeout_secs:.3}s (attempt {attempt})")]
    StateTimeout {
        /// Name of the state whose attempt timed out.
        state: String,
        /// Configured timeout, in seconds.
        timeout_secs: f64,
        /// 1-indexed attempt number that timed out.
        attempt: usize,
    },

    /// A state exhausted `max_retries + 1` attempts without succeeding.
    #[error("state '{state}' failed after {attempts} attempt(s): {last_error}")]
    StateFailed {
        /// Name of the state that terminally failed.
        state: String,
        /// Total attempts made (first attempt + retries).
        attempts: usize,
        /// Message describing the last attempt's failure.
        last_error: String,
    },

    /// A terminal state failure that aborted the run, surfaced to the `run()` caller.
    ///
    /// Carries a partial [`crate::result::RunResult`] snapshot so that context
    /// written before the failure remains inspectable.
    #[error("run failed: state '{state}' failed after {attempts} attempt(s): {last_error}")]
    RunFailed {
        /// Name of the state that caused the run to terminate.
        state: String,
        /// Attempts made on the failing state.
        attempts: usize,
        /// Message describing the last attempt's failure.
        last_error: String,
        /// Context/outputs/completed/failed snapshot as of the failure.
        partial: Box<crate::result::RunResult>,
    },

    /// A context value could not be converted to or from JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Application-defined error raised from within a user state function.
    #[error("{0}")]
    Custom(String),
}

impl EngineError {
    /// Build an [`EngineError::InvalidResourceSpec`].
    pub fn invalid_resource_spec(state: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResourceSpec {
            state: state.into(),
            reason: reason.into(),
        }
    }

    /// Build an [`EngineError::UnresolvedDependency`].
    pub fn unresolved_dependency(state: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::UnresolvedDependency {
            state: state.into(),
            dependency: dependency.into(),
        }
    }

    /// Returns `true` if this error represents an attempt-level failure that the
    /// task runner's retry loop is expected to absorb (as opposed to a fatal
    /// registration/validation error that aborts before any state runs).
    pub fn is_retryable_attempt_error(&self) -> bool {
        matches!(self, Self::StateTimeout { .. } | Self::Custom(_) | Self::Serialization(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_graph_message_lists_the_cycle() {
        let err = EngineError::CyclicGraph(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(format!("{err}"), "cyclic dependency graph: a -> b -> a");
    }

    #[test]
    fn invalid_resource_spec_helper_sets_both_fields() {
        let err = EngineError::invalid_resource_spec("fetch", "cpu must be >= 0");
        match err {
            EngineError::InvalidResourceSpec { state, reason } => {
                assert_eq!(state, "fetch");
                assert_eq!(reason, "cpu must be >= 0");
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn retryable_classification() {
        assert!(EngineError::StateTimeout { state: "s".into(), timeout_secs: 1.0, attempt: 1 }
            .is_retryable_attempt_error());
        assert!(!EngineError::NoEntryPoint.is_retryable_attempt_error());
    }
}
