//! # flowctl-engine — a dependency-driven, dynamically-routed agent execution engine
//!
//! `flowctl-engine` runs user-defined computational graphs of named
//! **states** inside an **agent**. Each state is an async function that
//! reads and writes a shared key/value [`Context`] and, on completion, may
//! return a [`Directive`] naming successor states to run. States declare
//! static dependencies (must complete before this state runs) and a
//! per-state [`ResourceSpec`] (cpu/memory hints, timeout, retries). The
//! engine computes execution order, runs independent states concurrently,
//! resolves dynamic successor directives alongside static dependencies,
//! enforces timeouts and retries, and surfaces a final [`RunResult`] with
//! all accumulated context.
//!
//! ## Core concepts
//!
//! - **[`Agent`]** — a named container of registered states; the entity
//!   whose [`Agent::run`] executes a workflow.
//! - **State** — a named async function plus its dependencies and resource
//!   spec, registered via [`Agent::add_state`].
//! - **[`Context`]** — the run-scoped key/value store (`variables` and a
//!   distinct `outputs` namespace) passed to every state.
//! - **[`Directive`]** — a state's return value, interpreted by the
//!   scheduler: `None`, `Goto(name)`, or `GotoAll(names)`.
//! - **Static dependency** — a predecessor that must complete before a
//!   state may run.
//! - **Dynamic activation** — a directive naming a state to run, independent
//!   of (but reconciled with) the static dependency graph.
//! - **[`RunResult`]** — the immutable snapshot returned once a run ends,
//!   successfully or otherwise.
//!
//! ## Quick start
//!
//! ```rust
//! use flowctl_engine::{Agent, Directive, StateOptions};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> flowctl_engine::error::Result<()> {
//! let mut agent = Agent::new("pipeline");
//!
//! agent.add_state(
//!     "fetch",
//!     |ctx| Box::pin(async move {
//!         ctx.set_variable("fetched", json!(42)).await;
//!         Ok(Directive::None)
//!     }),
//!     StateOptions::new(),
//! )?;
//!
//! agent.add_state(
//!     "double",
//!     |ctx| Box::pin(async move {
//!         let v = ctx.get_variable("fetched", json!(0)).await;
//!         ctx.set_variable("doubled", json!(v.as_i64().unwrap() * 2)).await;
//!         Ok(Directive::None)
//!     }),
//!     StateOptions::new().dependencies(["fetch"]),
//! )?;
//!
//! let result = agent.run().await?;
//! assert_eq!(result.get_variable("doubled", json!(0)), json!(84));
//! # Ok(())
//! # }
//! ```
//!
//! ## Dynamic fan-out
//!
//! A state can name successors that are not in its own dependency list —
//! useful for fan-out decided at run time rather than wired statically:
//!
//! ```rust
//! use flowctl_engine::{Agent, Directive, StateOptions};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> flowctl_engine::error::Result<()> {
//! let mut agent = Agent::new("fanout");
//! agent.add_state(
//!     "plan",
//!     |ctx| Box::pin(async move {
//!         ctx.set_variable("order_id", json!("ORD-1")).await;
//!         Ok(Directive::goto_all(["pack", "ship"]))
//!     }),
//!     StateOptions::new(),
//! )?;
//! agent.add_state("pack", |_ctx| Box::pin(async { Ok(Directive::None) }), StateOptions::new())?;
//! agent.add_state("ship", |_ctx| Box::pin(async { Ok(Directive::None) }), StateOptions::new())?;
//! let result = agent.run().await?;
//! assert!(result.completed().contains(&"pack".to_string()));
//! assert!(result.completed().contains(&"ship".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency model
//!
//! A run is single-threaded cooperative multiplexing over state futures: the
//! scheduler polls a [`futures::stream::FuturesUnordered`] of in-flight
//! states rather than spawning OS threads or tokio tasks per state. Two
//! states with no ordering constraint between them may interleave
//! arbitrarily at every suspension point; the [`Context`] guarantees
//! atomicity of a single `get`/`set` call but not ordering across unrelated
//! states. See `SPEC_FULL.md` in the repository for the full concurrency
//! and cancellation contract.
//!
//! ## Error handling
//!
//! Every failure mode — bad registration, an unresolved dependency, a
//! dependency cycle, a timed-out or retry-exhausted state — is a variant of
//! [`error::EngineError`]. A terminal state failure aborts the run and is
//! surfaced as [`error::EngineError::RunFailed`], which carries a partial
//! [`RunResult`] snapshot of whatever context existed at the moment of
//! failure.
//!
//! ## Module organization
//!
//! - [`agent`] — [`Agent`] and [`StateOptions`]: the public construction and
//!   registration surface.
//! - [`context`] — [`Context`]: the shared, run-scoped key/value store.
//! - [`directive`] — [`Directive`]: a state's return-value routing signal.
//! - [`state`] — [`StateDescriptor`] and [`ResourceSpec`]: what the registry
//!   stores about one state.
//! - [`registry`] — [`registry::StateRegistry`]: the set of registered states.
//! - [`graph`] — [`graph::DependencyGraph`]: the validated, acyclic static
//!   dependency graph built at run start.
//! - [`scheduler`] — the ready-set dispatch loop and dynamic router.
//! - [`executor`] — per-state timeout and retry enforcement.
//! - [`retry`] — the backoff curve the executor uses between attempts.
//! - [`result`] — [`RunResult`]: the immutable snapshot returned by `run()`.
//! - [`error`] — [`error::EngineError`] and the crate's `Result` alias.

pub mod agent;
pub mod context;
pub mod directive;
pub mod error;
pub mod executor;
pub mod graph;
pub mod registry;
pub mod result;
pub mod retry;
pub mod scheduler;
pub mod state;

pub use agent::{Agent, StateOptions};
pub use context::Context;
pub use directive::Directive;
pub use error::{EngineError, Result};
pub use graph::DependencyGraph;
pub use registry::StateRegistry;
pub use result::RunResult;
pub use state::{ResourceSpec, StateDescriptor, StateFn};
