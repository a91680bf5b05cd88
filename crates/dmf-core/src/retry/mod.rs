//! Retry policy for artifact fetches.
//!
//! Attempts are bounded and spaced by a flat delay; every failure kind is
//! retried until the attempt budget runs out.

mod policy;
mod run;

pub use policy::{RetryDecision, RetryPolicy};
pub use run::{run_with_retry, RetryExhausted};
