//! The public entry point: register states on an [`Agent`], then [`Agent::run`] it.
//!
//! `Agent` owns a [`StateRegistry`] and the initial context seed. Building
//! the [`crate::graph::DependencyGraph`] and driving the dispatch loop
//! (`crate::scheduler::run`) only happens inside `run()`, so registration
//! errors and graph-validation errors are always caught before a single
//! state is dispatched, per §4.4's "fatal, run does not start" contract.

use crate::context::Context;
use crate::directive::Directive;
use crate::error::{EngineError, Result};
use crate::graph::DependencyGraph;
use crate::registry::StateRegistry;
use crate::result::RunResult;
use crate::state::{ResourceSpec, StateDescriptor, StateFn};
use futures::future::BoxFuture;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Registration-time options for one state, bundling everything
/// `add_state` needs beyond the name and function: static dependencies, a
/// resource spec, and whether this state should be treated as an entry
/// point even though it declares dependencies.
///
/// This is the builder-consumed equivalent of the decorator/annotation
/// surface described in §6: a `#[state(cpu=.., timeout=..)]` attribute in
/// the source model attaches a [`ResourceSpec`] to a function; here that
/// spec is simply passed into `StateOptions` before registration, and an
/// explicit spec always wins (there is no separate annotation path to
/// merge against in Rust, so "explicit overrides annotation" collapses to
/// "there is exactly one spec, supplied here").
#[derive(Clone, Debug, Default)]
pub struct StateOptions {
    dependencies: Vec<String>,
    resource_spec: ResourceSpec,
    entry: bool,
}

impl StateOptions {
    /// Start from no dependencies, default resource spec, not an entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare this state's static dependencies, in the order they must be
    /// satisfied before the state is dispatchable.
    pub fn dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a resource spec (cpu, memory, timeout, retries).
    pub fn resource_spec(mut self, spec: ResourceSpec) -> Self {
        self.resource_spec = spec;
        self
    }

    /// Mark this state as an entry point regardless of its dependency list.
    pub fn entry(mut self, entry: bool) -> Self {
        self.entry = entry;
        self
    }
}

/// A named container of registered states and the run-seeding context.
///
/// `Agent` exclusively owns its [`StateRegistry`]; a [`crate::result::RunResult`]
/// is returned by value from `run()` so the caller owns the outcome, and
/// nothing about one run is retained on the `Agent` for the next.
pub struct Agent {
    name: String,
    registry: StateRegistry,
    initial_variables: HashMap<String, Value>,
    initial_outputs: HashMap<String, Value>,
}

impl Agent {
    /// Create an empty agent. `name` is an opaque, non-empty identifier
    /// surfaced in tracing spans; it does not otherwise affect execution.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registry: StateRegistry::new(),
            initial_variables: HashMap::new(),
            initial_outputs: HashMap::new(),
        }
    }

    /// This agent's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Seed the initial context before `run()`. Has no effect once `run()`
    /// has been called; each run starts from a fresh [`Context`] populated
    /// with whatever has been set so far.
    pub fn set_variable(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.initial_variables.insert(key.into(), value.into());
    }

    /// Seed the initial `outputs` namespace before `run()`.
    pub fn set_output(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.initial_outputs.insert(key.into(), value.into());
    }

    /// Register a state, or replace a same-named previous registration.
    ///
    /// `name` must be non-empty; `options.resource_spec` must satisfy §4.2's
    /// validity constraints. Dependency names are not required to already be
    /// registered (forward references are fine — see §4.1) but must resolve
    /// by the time `run()` is called.
    pub fn add_state<F>(&mut self, name: impl Into<String>, func: F, options: StateOptions) -> Result<()>
    where
        F: Fn(Context) -> BoxFuture<'static, Result<Directive>> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EngineError::InvalidRegistration(
                "state name must not be empty".to_string(),
            ));
        }
        options.resource_spec.validate(&name)?;

        let descriptor = StateDescriptor {
            name: name.clone(),
            func: Arc::new(func) as StateFn,
            dependencies: options.dependencies,
            resource_spec: options.resource_spec,
            entry: options.entry,
        };
        self.registry.insert(descriptor)
    }

    /// Look up a registered state's descriptor.
    pub fn get_state(&self, name: &str) -> Result<&StateDescriptor> {
        self.registry.get(name)
    }

    /// Number of registered states.
    pub fn state_count(&self) -> usize {
        self.registry.len()
    }

    /// Run the workflow to completion.
    ///
    /// Builds and validates the dependency graph (failing fast with
    /// [`EngineError::UnresolvedDependency`], [`EngineError::CyclicGraph`],
    /// or [`EngineError::NoEntryPoint`] before any state runs), seeds a
    /// fresh [`Context`] with whatever was set via `set_variable`/
    /// `set_output`, then drives the dispatch loop in
    /// [`crate::scheduler::run`] until no state is running and none is
    /// pending.
    pub async fn run(&self) -> Result<RunResult> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("agent_run", agent = %self.name, run_id = %run_id);
        let _enter = span.enter();

        let graph = DependencyGraph::build(&self.registry)?;
        info!(states = self.registry.len(), entries = graph.entry_points().len(), "starting run");

        let ctx = Context::new();
        for (key, value) in &self.initial_variables {
            ctx.set_variable(key.clone(), value.clone()).await;
        }
        for (key, value) in &self.initial_outputs {
            ctx.set_output(key.clone(), value.clone()).await;
        }

        crate::scheduler::run(&self.registry, &graph, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_state_rejects_empty_name() {
        let mut agent = Agent::new("a");
        let err = agent
            .add_state(
                "",
                |_ctx| Box::pin(async { Ok(Directive::None) }),
                StateOptions::new(),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRegistration(_)));
    }

    #[test]
    fn add_state_rejects_invalid_resource_spec() {
        let mut agent = Agent::new("a");
        let err = agent
            .add_state(
                "s",
                |_ctx| Box::pin(async { Ok(Directive::None) }),
                StateOptions::new().resource_spec(ResourceSpec::new().with_cpu(-1.0)),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidResourceSpec { .. }));
    }

    #[tokio::test]
    async fn run_fails_fast_on_cyclic_graph_before_any_state_executes() {
        let mut agent = Agent::new("cyclic");
        agent
            .add_state(
                "a",
                |_ctx| Box::pin(async { panic!("must not run") }),
                StateOptions::new().dependencies(["b"]),
            )
            .unwrap();
        agent
            .add_state(
                "b",
                |_ctx| Box::pin(async { panic!("must not run") }),
                StateOptions::new().dependencies(["a"]),
            )
            .unwrap();
        let err = agent.run().await.unwrap_err();
        assert!(matches!(err, EngineError::CyclicGraph(_)));
    }

    #[tokio::test]
    async fn run_seeds_initial_variables_before_any_state_reads_them() {
        let mut agent = Agent::new("seeded");
        agent.set_variable("seed", json!(10));
        agent
            .add_state(
                "double",
                |ctx| {
                    Box::pin(async move {
                        let seed = ctx.get_variable("seed", json!(0)).await;
                        ctx.set_variable("doubled", json!(seed.as_i64().unwrap() * 2))
                            .await;
                        Ok(Directive::None)
                    })
                },
                StateOptions::new(),
            )
            .unwrap();
        let result = agent.run().await.unwrap();
        assert_eq!(result.get_variable("doubled", json!(0)), json!(20));
    }

    #[tokio::test]
    async fn reregistering_a_state_before_run_replaces_it() {
        let mut agent = Agent::new("replace");
        agent
            .add_state(
                "s",
                |_ctx| Box::pin(async { panic!("stale") }),
                StateOptions::new(),
            )
            .unwrap();
        agent
            .add_state(
                "s",
                |ctx| {
                    Box::pin(async move {
                        ctx.set_variable("ran", json!(true)).await;
                        Ok(Directive::None)
                    })
                },
                StateOptions::new(),
            )
            .unwrap();
        let result = agent.run().await.unwrap();
        assert_eq!(result.get_variable("ran", json!(false)), json!(true));
    }
}
