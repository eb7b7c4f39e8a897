//! The ready-set dispatch loop: a single-threaded, cooperative multiplexer
//! over state futures.
//!
//! Rather than spawning a task per state, the scheduler keeps every
//! in-flight state's future in a [`FuturesUnordered`] and polls the set
//! until at least one completes, exactly the way this crate's ancestor
//! drove a Pregel superstep with `futures::future::join_all` over node
//! executors instead of `tokio::spawn`. Dependents become eligible the
//! moment their dependencies land in `completed`; states named by a
//! directive are activated even if they are not otherwise reachable yet,
//! and wait quietly until their own dependencies are satisfied.

use crate::context::Context;
use crate::directive::Directive;
use crate::error::Result;
use crate::executor::run_state;
use crate::graph::DependencyGraph;
use crate::registry::StateRegistry;
use crate::result::RunResult;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use std::collections::HashSet;
use tracing::{debug, info};

/// Drive a run to completion or to the first terminal failure.
///
/// On failure the returned `EngineError::RunFailed` carries a `RunResult`
/// snapshot of context as it stood when the failing state gave up.
pub async fn run(registry: &StateRegistry, graph: &DependencyGraph, ctx: Context) -> Result<RunResult> {
    let mut completed: HashSet<String> = HashSet::new();
    let mut activated: HashSet<String> = HashSet::new();
    let mut dispatched: HashSet<String> = HashSet::new();

    for entry in graph.entry_points() {
        activated.insert(entry.clone());
    }

    let mut in_flight = FuturesUnordered::new();

    loop {
        let mut scheduled_any = false;
        let candidates: Vec<String> = activated
            .iter()
            .filter(|name| !dispatched.contains(*name) && graph.is_ready(name, &completed))
            .cloned()
            .collect();

        for name in candidates {
            let descriptor = registry.get(&name)?.clone();
            let state_ctx = ctx.clone();
            dispatched.insert(name.clone());
            scheduled_any = true;
            info!(state = %name, "state activated");
            in_flight.push(async move {
                let outcome = run_state(&descriptor, state_ctx).await;
                (descriptor.name().to_string(), outcome)
            });
        }

        if in_flight.is_empty() {
            if !scheduled_any {
                break;
            }
            continue;
        }

        let (name, outcome) = in_flight.select_next_some().await;

        match outcome {
            Ok(directive) => {
                debug!(state = %name, "state finished");
                completed.insert(name.clone());
                // Static-only mode (§4.5, §9 Open Question 1): a state with
                // satisfied dependencies always becomes dispatchable, whether
                // or not its predecessor's directive named it. Directives
                // only ever *add* activations outside the static graph; they
                // never gate a dependent's static eligibility.
                for dependent in graph.dependents_of(&name) {
                    activated.insert(dependent.clone());
                }
                for target in directive.targets() {
                    activated.insert(target);
                }
            }
            Err(err) => {
                let partial = RunResult::new(
                    ctx.variables_snapshot().await,
                    ctx.outputs_snapshot().await,
                    completed.into_iter().collect(),
                    vec![name.clone()],
                );
                return Err(crate::error::EngineError::RunFailed {
                    state: name,
                    attempts: attempts_from(&err),
                    last_error: err.to_string(),
                    partial: Box::new(partial),
                });
            }
        }
    }

    Ok(RunResult::new(
        ctx.variables_snapshot().await,
        ctx.outputs_snapshot().await,
        completed.into_iter().collect(),
        vec![],
    ))
}

fn attempts_from(err: &crate::error::EngineError) -> usize {
    match err {
        crate::error::EngineError::StateFailed { attempts, .. } => *attempts,
        crate::error::EngineError::StateTimeout { attempt, .. } => *attempt,
        _ => 1,
    }
}
