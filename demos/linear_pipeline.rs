//! A three-state linear pipeline: fetch -> transform -> report.
//!
//! Run with `cargo run --example linear_pipeline`.

use flowctl_engine::{Agent, Directive, StateOptions};
use serde_json::json;

#[tokio::main]
async fn main() -> flowctl_engine::error::Result<()> {
    tracing_subscriber::fmt::init();

    let mut agent = Agent::new("linear-pipeline");

    agent.add_state(
        "fetch",
        |ctx| {
            Box::pin(async move {
                ctx.set_variable("raw", json!(21)).await;
                Ok(Directive::None)
            })
        },
        StateOptions::new(),
    )?;

    agent.add_state(
        "transform",
        |ctx| {
            Box::pin(async move {
                let raw = ctx.get_variable("raw", json!(0)).await;
                ctx.set_variable("transformed", json!(raw.as_i64().unwrap() * 2))
                    .await;
                Ok(Directive::None)
            })
        },
        StateOptions::new().dependencies(["fetch"]),
    )?;

    agent.add_state(
        "report",
        |ctx| {
            Box::pin(async move {
                let transformed = ctx.get_variable("transformed", json!(0)).await;
                ctx.set_output("summary", json!(format!("result = {transformed}")))
                    .await;
                Ok(Directive::None)
            })
        },
        StateOptions::new().dependencies(["transform"]),
    )?;

    let result = agent.run().await?;
    println!("completed: {:?}", result.completed());
    println!("summary: {}", result.get_output("summary", json!(null)));
    Ok(())
}
