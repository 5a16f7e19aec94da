//! Remote question sourcing with bounded retry and pool fallback.
//!
//! The engine never talks to a network itself; hosts implement
//! [`QuestionSource`] and hand it in. [`fetch_with_fallback`] wraps a
//! source with the session's availability policy: transient failures are
//! retried with bounded exponential backoff, rejections short-circuit,
//! and when nothing usable arrives the bundled pool takes over, flagged
//! as such so callers and tests can tell the two apart.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::question::{normalize_batch, NormalizedQuestion, QuestionSupply};

/// Why a fetch attempt failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    /// Transient failure worth retrying (network, server-side).
    #[error("question source unavailable: {0}")]
    Unavailable(String),
    /// A response arrived but could not be used.
    #[error("malformed question payload: {0}")]
    Malformed(String),
    /// The source refused the request (unknown code, auth). Never retried.
    #[error("question request rejected: {0}")]
    Rejected(String),
}

impl SourceError {
    /// Whether another attempt could plausibly succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, SourceError::Rejected(_))
    }
}

/// Where raw question batches come from.
///
/// Implementations return the whole payload; shape tolerance lives in
/// the normalizer, not here.
pub trait QuestionSource {
    /// Fetch the raw batch payload for a game code.
    fn fetch(&mut self, game_code: &str) -> Result<Value, SourceError>;
}

/// A source serving a fixed in-memory payload.
///
/// Backs offline play and tests; also the default source when a host
/// wires nothing else in.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    payload: Value,
}

impl StaticSource {
    /// Serve an arbitrary payload.
    #[must_use]
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Serve a bare array of raw records.
    #[must_use]
    pub fn with_records(records: Vec<Value>) -> Self {
        Self::new(Value::Array(records))
    }
}

impl QuestionSource for StaticSource {
    fn fetch(&mut self, _game_code: &str) -> Result<Value, SourceError> {
        Ok(self.payload.clone())
    }
}

/// Retry tuning for question fetches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total fetch attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles per further retry.
    pub base_delay: Duration,
    /// Ceiling for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Policy without any sleeping, for tests and interactive hosts.
    #[must_use]
    pub const fn no_delay(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (0-based).
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        // Shift cap keeps the multiplier finite for absurd retry counts.
        let multiplier = 1u32 << retry.min(16);
        self.base_delay.saturating_mul(multiplier).min(self.max_delay)
    }
}

/// Provenance of a working question list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionOrigin {
    /// Normalized from a remote fetch.
    Remote,
    /// Served from the bundled pool.
    Fallback,
}

/// Outcome of [`fetch_with_fallback`].
#[derive(Clone, Debug)]
pub struct FetchedQuestions {
    pub questions: Vec<NormalizedQuestion>,
    pub origin: QuestionOrigin,
}

/// Fetch and normalize a question batch, falling back to the pool.
///
/// Attempts the source up to the policy's limit, sleeping the backoff
/// delay between tries. A rejection stops retrying immediately. When no
/// attempt produces a usable batch, the supply's pool is returned with
/// [`QuestionOrigin::Fallback`] so the session can always start.
pub fn fetch_with_fallback(
    source: &mut dyn QuestionSource,
    policy: &RetryPolicy,
    game_code: &str,
    supply: &QuestionSupply,
) -> FetchedQuestions {
    let mut last_error: Option<SourceError> = None;

    for attempt in 0..policy.max_attempts {
        if attempt > 0 {
            let delay = policy.delay_for(attempt - 1);
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
        }

        match source.fetch(game_code) {
            Ok(payload) => {
                let questions = normalize_batch(&payload);
                if questions.is_empty() {
                    warn!(attempt, "question payload normalized to nothing");
                    last_error = Some(SourceError::Malformed("no usable records".to_string()));
                    continue;
                }
                info!(count = questions.len(), "fetched remote question batch");
                return FetchedQuestions { questions, origin: QuestionOrigin::Remote };
            }
            Err(error) if error.is_retryable() => {
                warn!(attempt, error = %error, "question fetch failed");
                last_error = Some(error);
            }
            Err(error) => {
                warn!(error = %error, "question fetch rejected, not retrying");
                last_error = Some(error);
                break;
            }
        }
    }

    match last_error {
        Some(error) => {
            warn!(error = %error, "question source exhausted, using bundled fallback pool")
        }
        None => warn!("question source disabled, using bundled fallback pool"),
    }
    FetchedQuestions {
        questions: supply.pool().to_vec(),
        origin: QuestionOrigin::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Source that fails a set number of times before succeeding.
    struct FlakySource {
        failures_left: u32,
        calls: u32,
        error: SourceError,
    }

    impl FlakySource {
        fn new(failures: u32, error: SourceError) -> Self {
            Self { failures_left: failures, calls: 0, error }
        }
    }

    impl QuestionSource for FlakySource {
        fn fetch(&mut self, _game_code: &str) -> Result<Value, SourceError> {
            self.calls += 1;
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(self.error.clone());
            }
            Ok(json!([
                {"question_text": "Remote?", "answers": ["a", "b", "c"]}
            ]))
        }
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(8));
        assert_eq!(policy.delay_for(10), Duration::from_secs(8));
        assert_eq!(policy.delay_for(1000), Duration::from_secs(8));
    }

    #[test]
    fn test_no_delay_policy_never_sleeps() {
        let policy = RetryPolicy::no_delay(5);
        for retry in 0..10 {
            assert_eq!(policy.delay_for(retry), Duration::ZERO);
        }
    }

    #[test]
    fn test_first_attempt_success_is_remote() {
        let mut source = FlakySource::new(0, SourceError::Unavailable("down".into()));
        let supply = QuestionSupply::new();

        let fetched =
            fetch_with_fallback(&mut source, &RetryPolicy::no_delay(3), "CODE", &supply);

        assert_eq!(fetched.origin, QuestionOrigin::Remote);
        assert_eq!(fetched.questions.len(), 1);
        assert_eq!(source.calls, 1);
    }

    #[test]
    fn test_transient_failures_are_retried() {
        let mut source = FlakySource::new(2, SourceError::Unavailable("down".into()));
        let supply = QuestionSupply::new();

        let fetched =
            fetch_with_fallback(&mut source, &RetryPolicy::no_delay(3), "CODE", &supply);

        assert_eq!(fetched.origin, QuestionOrigin::Remote);
        assert_eq!(source.calls, 3);
    }

    #[test]
    fn test_exhausted_retries_fall_back_to_pool() {
        let mut source = FlakySource::new(10, SourceError::Unavailable("down".into()));
        let supply = QuestionSupply::new();

        let fetched =
            fetch_with_fallback(&mut source, &RetryPolicy::no_delay(3), "CODE", &supply);

        assert_eq!(fetched.origin, QuestionOrigin::Fallback);
        assert_eq!(fetched.questions.len(), supply.pool_size());
        assert_eq!(source.calls, 3);
    }

    #[test]
    fn test_rejection_skips_remaining_retries() {
        let mut source = FlakySource::new(10, SourceError::Rejected("bad code".into()));
        let supply = QuestionSupply::new();

        let fetched =
            fetch_with_fallback(&mut source, &RetryPolicy::no_delay(3), "CODE", &supply);

        assert_eq!(fetched.origin, QuestionOrigin::Fallback);
        assert_eq!(source.calls, 1);
    }

    #[test]
    fn test_unusable_payload_counts_as_failure() {
        let mut source = StaticSource::new(json!({"status": "ok"}));
        let supply = QuestionSupply::new();

        let fetched =
            fetch_with_fallback(&mut source, &RetryPolicy::no_delay(2), "CODE", &supply);

        assert_eq!(fetched.origin, QuestionOrigin::Fallback);
    }

    #[test]
    fn test_static_source_round_trip() {
        let records = vec![json!({"question_text": "One?", "answers": ["a", "b", "c"]})];
        let mut source = StaticSource::with_records(records);

        let payload = source.fetch("ANY").unwrap();
        assert_eq!(normalize_batch(&payload).len(), 1);
    }

    #[test]
    fn test_error_retryability() {
        assert!(SourceError::Unavailable("x".into()).is_retryable());
        assert!(SourceError::Malformed("x".into()).is_retryable());
        assert!(!SourceError::Rejected("x".into()).is_retryable());
    }
}
