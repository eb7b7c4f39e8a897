//! Shared, run-scoped key/value context passed to every state.
//!
//! A [`Context`] is the single logical resource every state invocation of one
//! agent run reads from and writes to. It wraps two independent namespaces —
//! `variables` and `outputs` — behind a `tokio::sync::RwLock`, so that a
//! single `get`/`set` call is atomic while unrelated reads can proceed
//! concurrently. Writes become visible to any state dispatched afterward;
//! see the crate-level docs for the full ordering contract.
//!
//! States never hold onto a `Context` past their own return: it is handed to
//! the user function by cloning a cheap `Arc`-backed handle, not by
//! reference, which keeps the user-facing API ergonomic for `'static` boxed
//! futures.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct ContextInner {
    variables: HashMap<String, Value>,
    outputs: HashMap<String, Value>,
}

/// Run-scoped shared key/value store handed to every state function.
///
/// Cloning a `Context` is cheap: it shares the same underlying map via
/// `Arc`, so every clone observes the same writes. This is the shape in
/// which the engine hands context to user state functions.
#[derive(Clone, Debug)]
pub struct Context {
    inner: Arc<RwLock<ContextInner>>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(ContextInner::default())),
        }
    }

    /// Read a variable, falling back to `default` when the key is absent.
    pub async fn get_variable(&self, key: &str, default: Value) -> Value {
        let guard = self.inner.read().await;
        guard.variables.get(key).cloned().unwrap_or(default)
    }

    /// Write (overwrite) a variable.
    pub async fn set_variable(&self, key: impl Into<String>, value: Value) {
        let mut guard = self.inner.write().await;
        guard.variables.insert(key.into(), value);
    }

    /// Read an output, falling back to `default` when the key is absent.
    pub async fn get_output(&self, key: &str, default: Value) -> Value {
        let guard = self.inner.read().await;
        guard.outputs.get(key).cloned().unwrap_or(default)
    }

    /// Write (overwrite) an output.
    pub async fn set_output(&self, key: impl Into<String>, value: Value) {
        let mut guard = self.inner.write().await;
        guard.outputs.insert(key.into(), value);
    }

    /// Snapshot the current `variables` map.
    pub async fn variables_snapshot(&self) -> HashMap<String, Value> {
        self.inner.read().await.variables.clone()
    }

    /// Snapshot the current `outputs` map.
    pub async fn outputs_snapshot(&self) -> HashMap<String, Value> {
        self.inner.read().await.outputs.clone()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn get_variable_returns_default_when_absent() {
        let ctx = Context::new();
        assert_eq!(ctx.get_variable("missing", Value::Null).await, Value::Null);
        assert_eq!(ctx.get_variable("missing", json!(42)).await, json!(42));
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let ctx = Context::new();
        ctx.set_variable("k", json!("v")).await;
        assert_eq!(ctx.get_variable("k", Value::Null).await, json!("v"));
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let ctx = Context::new();
        ctx.set_variable("k", json!(1)).await;
        ctx.set_variable("k", json!(2)).await;
        assert_eq!(ctx.get_variable("k", Value::Null).await, json!(2));
    }

    #[tokio::test]
    async fn variables_and_outputs_are_distinct_namespaces() {
        let ctx = Context::new();
        ctx.set_variable("shared", json!("var")).await;
        ctx.set_output("shared", json!("out")).await;
        assert_eq!(ctx.get_variable("shared", Value::Null).await, json!("var"));
        assert_eq!(ctx.get_output("shared", Value::Null).await, json!("out"));
    }

    #[tokio::test]
    async fn clones_share_the_same_backing_store() {
        let ctx = Context::new();
        let clone = ctx.clone();
        clone.set_variable("k", json!("v")).await;
        assert_eq!(ctx.get_variable("k", Value::Null).await, json!("v"));
    }
}
