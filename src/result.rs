//! The snapshot returned by a completed (or failed) agent run.

use serde_json::Value;
use std::collections::HashMap;

/// Outcome of a single run: accumulated context plus the set of states that
/// completed and the set that failed.
///
/// On success every field reflects the terminal state of the run. On
/// failure, [`crate::error::EngineError::RunFailed`] carries a `RunResult`
/// built from whatever context existed at the moment the failing state
/// exhausted its retries — `variables` and `outputs` are never discarded
/// just because the run as a whole did not reach completion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunResult {
    variables: HashMap<String, Value>,
    outputs: HashMap<String, Value>,
    completed: Vec<String>,
    failed: Vec<String>,
}

impl RunResult {
    pub(crate) fn new(
        variables: HashMap<String, Value>,
        outputs: HashMap<String, Value>,
        completed: Vec<String>,
        failed: Vec<String>,
    ) -> Self {
        Self {
            variables,
            outputs,
            completed,
            failed,
        }
    }

    /// Read a variable from the final context, falling back to `default`.
    pub fn get_variable(&self, key: &str, default: Value) -> Value {
        self.variables.get(key).cloned().unwrap_or(default)
    }

    /// Read an output from the final context, falling back to `default`.
    pub fn get_output(&self, key: &str, default: Value) -> Value {
        self.outputs.get(key).cloned().unwrap_or(default)
    }

    /// The full `variables` namespace.
    pub fn variables(&self) -> &HashMap<String, Value> {
        &self.variables
    }

    /// The full `outputs` namespace.
    pub fn outputs(&self) -> &HashMap<String, Value> {
        &self.outputs
    }

    /// Names of states that ran to completion, in completion order.
    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    /// Names of states that exhausted retries without succeeding.
    ///
    /// Empty on a successful run. A terminally failing run aborts after its
    /// first failure, so this holds at most one name in the current engine,
    /// but stays a `Vec` to leave room for a future non-aborting mode.
    pub fn failed(&self) -> &[String] {
        &self.failed
    }
}
