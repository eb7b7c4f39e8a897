//! A planning state that decides its own fan-out at run time via
//! `Directive::GotoAll`, rather than wiring every branch statically.
//!
//! Run with `cargo run --example dynamic_fanout`.

use flowctl_engine::{Agent, Directive, StateOptions};
use serde_json::json;

#[tokio::main]
async fn main() -> flowctl_engine::error::Result<()> {
    tracing_subscriber::fmt::init();

    let mut agent = Agent::new("dynamic-fanout");

    agent.add_state(
        "plan_order",
        |ctx| {
            Box::pin(async move {
                ctx.set_variable("order_id", json!("ORD-123")).await;
                Ok(Directive::goto_all(["pack", "label", "notify"]))
            })
        },
        StateOptions::new(),
    )?;

    for step in ["pack", "label", "notify"] {
        agent.add_state(
            step,
            move |ctx| {
                Box::pin(async move {
                    let order_id = ctx.get_variable("order_id", json!(null)).await;
                    ctx.set_output(step, json!({"order_id": order_id, "step": step}))
                        .await;
                    Ok(Directive::None)
                })
            },
            StateOptions::new(),
        )?;
    }

    let result = agent.run().await?;
    println!("completed: {:?}", result.completed());
    for step in ["pack", "label", "notify"] {
        println!("{step}: {}", result.get_output(step, json!(null)));
    }
    Ok(())
}
