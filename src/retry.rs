//! Exponential backoff for per-state retry attempts.
//!
//! The task runner ([`crate::executor`]) calls [`backoff_delay`] between a
//! failed attempt and the next one. The formula mirrors the graph engine
//! this crate grew out of: exponential growth capped at a maximum interval,
//! widened by bounded jitter so that many states retrying at once don't all
//! wake up on the same tick.
//!
//! Retry *count* comes from each state's [`crate::state::ResourceSpec::max_retries`]
//! rather than from a policy object here — there is exactly one backoff
//! curve in this crate, not a library of named policies.

use rand::Rng;
use std::time::Duration;

/// Delay before retry `attempt` (0-indexed: the delay *after* the first
/// failure uses `attempt = 0`).
///
/// `delay = min(initial * factor^attempt, max) * jitter`, `jitter ∈
/// [0.5, 1.5)`.
pub fn backoff_delay(attempt: usize) -> Duration {
    const INITIAL_SECS: f64 = 0.05;
    const BACKOFF_FACTOR: f64 = 2.0;
    const MAX_SECS: f64 = 5.0;

    let base = INITIAL_SECS * BACKOFF_FACTOR.powi(attempt as i32);
    let capped = base.min(MAX_SECS);
    let jitter = rand::thread_rng().gen_range(0.5..1.5);
    Duration::from_secs_f64(capped * jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_grows_with_attempt_number() {
        // jitter makes a single sample noisy; compare against the
        // jitter-free bounds instead of an exact value.
        let d0 = backoff_delay(0);
        let d3 = backoff_delay(3);
        assert!(d0.as_secs_f64() <= 0.075 * 1.01);
        assert!(d3.as_secs_f64() <= 0.6 * 1.01);
    }

    #[test]
    fn delay_is_capped_at_max_interval() {
        let d = backoff_delay(20);
        assert!(d.as_secs_f64() <= 5.0 * 1.5 + 0.01);
    }
}
