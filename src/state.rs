//! A registered state: its function and resource requirements.

use crate::context::Context;
use crate::directive::Directive;
use crate::error::{EngineError, Result};
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// A user state function: takes the run's [`Context`] and returns a
/// [`Directive`] describing what should run next.
///
/// Boxed and `Arc`-wrapped so a [`StateDescriptor`] can be cloned cheaply
/// and invoked from the scheduler's concurrent dispatch loop without
/// borrowing issues across `.await` points.
pub type StateFn = Arc<dyn Fn(Context) -> BoxFuture<'static, Result<Directive>> + Send + Sync>;

/// Resource requirements and execution policy for one state.
///
/// Built with a fluent builder, mirroring how the engine this crate is
/// descended from attaches retry/backoff policy to a node: `ResourceSpec`
/// plays the role a `#[state(cpu=.., memory=.., timeout=.., max_retries=..)]`
/// attribute would play in a decorator-based API — this crate exposes the
/// same metadata as a value instead of a macro.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceSpec {
    cpu: f64,
    memory_mb: f64,
    timeout_secs: Option<f64>,
    max_retries: usize,
}

impl ResourceSpec {
    /// Start from the defaults (`cpu=1.0`, `memory_mb=100.0`, no timeout,
    /// `max_retries=0`), matching §4.2's resource spec table.
    pub fn new() -> Self {
        Self {
            cpu: 1.0,
            memory_mb: 100.0,
            timeout_secs: None,
            max_retries: 0,
        }
    }

    /// Set the declared CPU share. Must be non-negative.
    pub fn with_cpu(mut self, cpu: f64) -> Self {
        self.cpu = cpu;
        self
    }

    /// Set the declared memory budget in megabytes. Must be non-negative.
    pub fn with_memory(mut self, memory_mb: f64) -> Self {
        self.memory_mb = memory_mb;
        self
    }

    /// Set the per-attempt wall-clock deadline in seconds. Must be strictly
    /// positive. Leaving this unset (the default) means a state's attempts
    /// are never bounded by the task runner.
    pub fn with_timeout(mut self, timeout_secs: f64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Set the maximum number of retries after the first attempt fails.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Declared CPU share.
    pub fn cpu(&self) -> f64 {
        self.cpu
    }

    /// Declared memory budget in megabytes.
    pub fn memory_mb(&self) -> f64 {
        self.memory_mb
    }

    /// Per-attempt timeout in seconds, or `None` if attempts run unbounded.
    pub fn timeout_secs(&self) -> Option<f64> {
        self.timeout_secs
    }

    /// Maximum retries after the first attempt.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Total attempts allowed: `1 + max_retries`.
    pub fn max_attempts(&self) -> usize {
        self.max_retries + 1
    }

    /// Validate the spec against a given state name, producing
    /// [`EngineError::InvalidResourceSpec`] on the first violated constraint.
    pub fn validate(&self, state: &str) -> Result<()> {
        if self.cpu < 0.0 {
            return Err(EngineError::invalid_resource_spec(state, "cpu must be >= 0"));
        }
        if self.memory_mb < 0.0 {
            return Err(EngineError::invalid_resource_spec(
                state,
                "memory_mb must be >= 0",
            ));
        }
        if let Some(timeout) = self.timeout_secs {
            if timeout <= 0.0 {
                return Err(EngineError::invalid_resource_spec(
                    state,
                    "timeout_secs must be > 0 when set",
                ));
            }
        }
        Ok(())
    }
}

/// Everything the registry stores about one named state.
#[derive(Clone)]
pub struct StateDescriptor {
    pub(crate) name: String,
    pub(crate) func: StateFn,
    pub(crate) dependencies: Vec<String>,
    pub(crate) resource_spec: ResourceSpec,
    pub(crate) entry: bool,
}

impl fmt::Debug for StateDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDescriptor")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("resource_spec", &self.resource_spec)
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

impl StateDescriptor {
    /// The registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The states this one declares as static dependencies, in registration
    /// order.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// This state's resource requirements and retry policy.
    pub fn resource_spec(&self) -> &ResourceSpec {
        &self.resource_spec
    }

    /// Whether this state was explicitly designated an entry point.
    pub fn is_entry(&self) -> bool {
        self.entry
    }
}
