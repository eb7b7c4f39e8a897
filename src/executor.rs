//! Runs a single state to completion: one [`tokio::time::timeout`]-bounded
//! attempt per try, retried up to the state's `max_retries`.

use crate::context::Context;
use crate::directive::Directive;
use crate::error::{EngineError, Result};
use crate::retry::backoff_delay;
use crate::state::StateDescriptor;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, warn};

/// One failed or timed-out attempt, kept only for the final diagnostic log
/// when a state exhausts its retries — the run state's "map from state name
/// to attempt count and last error" (§3) collapsed to the single state
/// currently being run.
#[derive(Debug, Clone)]
struct AttemptRecord {
    attempt: usize,
    at: DateTime<Utc>,
    error: String,
}

/// Invoke `descriptor`'s function against `ctx`, enforcing its timeout and
/// retry policy.
///
/// Returns `Ok(directive)` on the first successful attempt, or
/// [`EngineError::StateFailed`] once `max_attempts` attempts have all
/// failed or timed out.
#[tracing::instrument(skip(ctx, descriptor), fields(state = %descriptor.name()))]
pub async fn run_state(descriptor: &StateDescriptor, ctx: Context) -> Result<Directive> {
    let spec = descriptor.resource_spec();
    let timeout = spec.timeout_secs().map(Duration::from_secs_f64);
    let max_attempts = spec.max_attempts();

    let mut history: Vec<AttemptRecord> = Vec::with_capacity(max_attempts);

    for attempt in 1..=max_attempts {
        debug!(attempt, max_attempts, "dispatching state");
        let fut = (descriptor.func)(ctx.clone());

        let outcome = match timeout {
            Some(deadline) => tokio::time::timeout(deadline, fut).await,
            None => Ok(fut.await),
        };

        match outcome {
            Ok(Ok(directive)) => {
                debug!(attempt, "state completed");
                return Ok(directive);
            }
            Ok(Err(err)) => {
                warn!(attempt, error = %err, "state attempt failed");
                history.push(AttemptRecord {
                    attempt,
                    at: Utc::now(),
                    error: err.to_string(),
                });
            }
            Err(_) => {
                let timeout_secs = spec.timeout_secs().unwrap_or_default();
                warn!(attempt, timeout_secs, "state attempt timed out");
                if attempt == max_attempts {
                    return Err(EngineError::StateTimeout {
                        state: descriptor.name().to_string(),
                        timeout_secs,
                        attempt,
                    });
                }
                history.push(AttemptRecord {
                    attempt,
                    at: Utc::now(),
                    error: format!("timed out after {timeout_secs:.3}s"),
                });
            }
        }

        if attempt < max_attempts {
            tokio::time::sleep(backoff_delay(attempt - 1)).await;
        }
    }

    let last = history.last();
    warn!(
        state = descriptor.name(),
        attempts = max_attempts,
        last_attempt = ?last.map(|r| r.attempt),
        last_attempt_at = ?last.map(|r| r.at),
        "state exhausted all attempts"
    );
    Err(EngineError::StateFailed {
        state: descriptor.name().to_string(),
        attempts: max_attempts,
        last_error: last
            .map(|r| r.error.clone())
            .unwrap_or_else(|| "unknown error".to_string()),
    })
}
