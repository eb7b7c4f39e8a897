//! Property-style checks for the invariants in spec §8 that are easiest to
//! state as "for all N", not just for one example run.

use flowctl_engine::{Agent, Directive, StateOptions};
use proptest::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn chain_state_name(i: usize) -> String {
    format!("s{i}")
}

/// Build a linear chain `s0 -> s1 -> ... -> s{n-1}`, each incrementing a
/// shared counter exactly once, and assert invariant 1 (at-most-once
/// execution) and invariant 2 (dependency completes before dependent runs)
/// hold for every chain length in the generated range.
async fn run_chain_and_assert_each_ran_once(n: usize) {
    let mut agent = Agent::new("chain");
    let counters: Vec<Arc<AtomicUsize>> = (0..n).map(|_| Arc::new(AtomicUsize::new(0))).collect();

    for i in 0..n {
        let counter = counters[i].clone();
        let deps: Vec<String> = if i == 0 { vec![] } else { vec![chain_state_name(i - 1)] };
        agent
            .add_state(
                chain_state_name(i),
                move |ctx| {
                    let counter = counter.clone();
                    Box::pin(async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        ctx.set_variable("last", json!(counter.load(Ordering::SeqCst)))
                            .await;
                        Ok(Directive::None)
                    })
                },
                StateOptions::new().dependencies(deps),
            )
            .unwrap();
    }

    let result = agent.run().await.unwrap();
    assert_eq!(result.completed().len(), n);
    for counter in &counters {
        assert_eq!(counter.load(Ordering::SeqCst), 1, "each state must run exactly once");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn chain_of_any_length_runs_every_state_exactly_once(n in 1usize..12) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(run_chain_and_assert_each_ran_once(n));
    }

    /// Re-registering a state any number of times before `run()` leaves only
    /// the final descriptor with any effect (round-trip law: "last
    /// registration wins").
    #[test]
    fn repeated_reregistration_only_the_last_descriptor_runs(extra_registrations in 0usize..8) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let mut agent = Agent::new("reregister");
            for i in 0..=extra_registrations {
                let is_last = i == extra_registrations;
                agent
                    .add_state(
                        "s",
                        move |ctx| {
                            Box::pin(async move {
                                ctx.set_variable("final_writer", json!(is_last)).await;
                                Ok(Directive::None)
                            })
                        },
                        StateOptions::new(),
                    )
                    .unwrap();
            }
            let result = agent.run().await.unwrap();
            assert_eq!(result.completed().len(), 1);
            assert_eq!(result.get_variable("final_writer", json!(null)), json!(true));
        });
    }
}
