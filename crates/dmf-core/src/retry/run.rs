//! Retry loop: run a closure until success or policy says stop.

use super::policy::{RetryDecision, RetryPolicy};
use std::fmt;

/// Last error seen once the policy gave up, with the number of attempts made.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub error: E,
    pub attempts: u32,
}

/// Runs `f` until it succeeds or the retry policy says to stop.
///
/// `f` receives the 1-based attempt number. On failure the loop sleeps for the
/// policy delay (blocking) before the next attempt. On success returns the
/// value and the attempt count that produced it.
pub fn run_with_retry<T, E, F>(policy: &RetryPolicy, mut f: F) -> Result<(T, u32), RetryExhausted<E>>
where
    E: fmt::Display,
    F: FnMut(u32) -> Result<T, E>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(value) => return Ok((value, attempt)),
            Err(error) => match policy.decide(attempt) {
                RetryDecision::NoRetry => {
                    return Err(RetryExhausted {
                        error,
                        attempts: attempt,
                    })
                }
                RetryDecision::RetryAfter(d) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = policy.max_attempts,
                        "attempt failed: {}; retrying in {:?}",
                        error,
                        d
                    );
                    if !d.is_zero() {
                        std::thread::sleep(d);
                    }
                    attempt += 1;
                }
            },
        }
    }
}
