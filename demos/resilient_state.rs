//! A flaky state that fails twice before succeeding, bounded by a timeout
//! and retried up to `max_retries`.
//!
//! Run with `cargo run --example resilient_state`.

use flowctl_engine::{Agent, Directive, EngineError, ResourceSpec, StateOptions};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::main]
async fn main() -> flowctl_engine::error::Result<()> {
    tracing_subscriber::fmt::init();

    let mut agent = Agent::new("resilient-state");
    let attempts = Arc::new(AtomicUsize::new(0));

    agent.add_state(
        "flaky_upload",
        move |ctx| {
            let attempts = attempts.clone();
            Box::pin(async move {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    return Err(EngineError::Custom(format!("transient failure on attempt {}", n + 1)));
                }
                ctx.set_variable("uploaded", json!(true)).await;
                Ok(Directive::None)
            })
        },
        StateOptions::new().resource_spec(
            ResourceSpec::new().with_timeout(2.0).with_max_retries(3),
        ),
    )?;

    let result = agent.run().await?;
    println!("uploaded: {}", result.get_variable("uploaded", json!(false)));
    Ok(())
}
