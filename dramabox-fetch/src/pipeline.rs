//! Fallback fetcher: tries relays in order for one logical request.
//!
//! Relays run strictly one after another, never concurrently, so only one
//! public relay is hit at a time and every failure is attributable. The first
//! relay that returns a valid payload wins; later relays are not contacted.

use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::context::FetchContext;
use crate::error::{FetchError, RelayError};
use crate::strategy::{RelayKind, RelayResponse, RelayStrategy};

// ============================================================================
// Fetch Attempt
// ============================================================================

/// Record of a single relay attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchAttempt {
    /// The relay that was attempted.
    pub strategy_id: String,
    /// The relay's response convention.
    pub kind: RelayKind,
    /// Whether the attempt succeeded.
    pub success: bool,
    /// Error if the attempt failed.
    pub error: Option<String>,
    /// How long the attempt took.
    pub duration: Duration,
}

impl FetchAttempt {
    /// Creates a successful attempt record.
    pub fn success(strategy_id: impl Into<String>, kind: RelayKind, duration: Duration) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            kind,
            success: true,
            error: None,
            duration,
        }
    }

    /// Creates a failed attempt record.
    pub fn failure(
        strategy_id: impl Into<String>,
        kind: RelayKind,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            kind,
            success: false,
            error: Some(error.into()),
            duration,
        }
    }
}

// ============================================================================
// Fetch Outcome
// ============================================================================

/// The outcome of one fallback fetch.
#[derive(Debug)]
pub struct FetchOutcome {
    /// The payload or the aggregated failure.
    pub result: Result<RelayResponse, FetchError>,
    /// All attempts made, in order.
    pub attempts: Vec<FetchAttempt>,
    /// Total duration of all attempts.
    pub duration: Duration,
}

impl FetchOutcome {
    /// Returns true if the fetch succeeded.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the number of relays that were tried.
    pub fn attempts_count(&self) -> usize {
        self.attempts.len()
    }

    /// Returns the successful relay ID, if any.
    pub fn successful_strategy(&self) -> Option<&str> {
        self.result.as_ref().ok().map(|r| r.strategy_id.as_str())
    }

    /// Returns all errors that occurred.
    pub fn errors(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter_map(|a| a.error.as_deref())
            .collect()
    }
}

// ============================================================================
// Fallback Fetcher
// ============================================================================

/// Reaches the upstream API through an ordered chain of relays.
///
/// The base URL, relay order and context are fixed at construction.
pub struct FallbackFetcher {
    base_url: String,
    strategies: Vec<Box<dyn RelayStrategy>>,
    ctx: FetchContext,
}

impl FallbackFetcher {
    /// Creates a fetcher with no relays.
    pub fn new(base_url: impl Into<String>, ctx: FetchContext) -> Self {
        Self::with_strategies(base_url, Vec::new(), ctx)
    }

    /// Creates a fetcher with the given relays, tried in the given order.
    pub fn with_strategies(
        base_url: impl Into<String>,
        strategies: Vec<Box<dyn RelayStrategy>>,
        ctx: FetchContext,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            strategies,
            ctx,
        }
    }

    /// Appends a relay to the end of the chain.
    pub fn add_strategy(&mut self, strategy: Box<dyn RelayStrategy>) {
        self.strategies.push(strategy);
    }

    /// Returns the number of relays in the chain.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns true if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Returns the upstream base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns `(id, kind)` for every relay, in order.
    pub fn strategy_info(&self) -> Vec<(String, RelayKind)> {
        self.strategies
            .iter()
            .map(|s| (s.id().to_string(), s.kind()))
            .collect()
    }

    /// Returns the full upstream URL for an endpoint path.
    pub fn target_url(&self, endpoint_path: &str) -> String {
        if endpoint_path.starts_with('/') {
            format!("{}{}", self.base_url, endpoint_path)
        } else {
            format!("{}/{}", self.base_url, endpoint_path)
        }
    }

    /// Fetches `endpoint_path`, returning the first valid payload.
    pub async fn fetch_with_fallback(&self, endpoint_path: &str) -> Result<Value, FetchError> {
        self.execute(endpoint_path)
            .await
            .result
            .map(|response| response.payload)
    }

    /// Executes the relay chain and returns the full outcome.
    #[instrument(skip(self), fields(relays = self.strategies.len()))]
    pub async fn execute(&self, endpoint_path: &str) -> FetchOutcome {
        self.run_chain(self.strategies.iter(), endpoint_path).await
    }

    /// Executes a single relay by ID, bypassing the rest of the chain.
    ///
    /// Used for relay health checks.
    pub async fn execute_single(&self, strategy_id: &str, endpoint_path: &str) -> FetchOutcome {
        let selected = self.strategies.iter().filter(|s| s.id() == strategy_id);
        self.run_chain(selected, endpoint_path).await
    }

    async fn run_chain<'a>(
        &self,
        strategies: impl Iterator<Item = &'a Box<dyn RelayStrategy>>,
        endpoint_path: &str,
    ) -> FetchOutcome {
        let start = Instant::now();
        let target = self.target_url(endpoint_path);
        let mut attempts = Vec::new();
        let mut last_error: Option<RelayError> = None;

        for strategy in strategies {
            let strategy_id = strategy.id();
            let kind = strategy.kind();
            let attempt_start = Instant::now();

            debug!(relay = %strategy_id, kind = %kind, target = %target, "Trying relay");

            match strategy.fetch_raw(&self.ctx, &target).await {
                Ok(payload) => {
                    let duration = attempt_start.elapsed();
                    info!(relay = %strategy_id, duration = ?duration, "Relay succeeded");

                    attempts.push(FetchAttempt::success(strategy_id, kind, duration));

                    return FetchOutcome {
                        result: Ok(RelayResponse::new(payload, strategy_id)),
                        attempts,
                        duration: start.elapsed(),
                    };
                }
                Err(error) => {
                    let duration = attempt_start.elapsed();
                    warn!(
                        relay = %strategy_id,
                        error = %error,
                        error_kind = %error.kind(),
                        duration = ?duration,
                        "Relay failed"
                    );

                    attempts.push(FetchAttempt::failure(
                        strategy_id,
                        kind,
                        error.to_string(),
                        duration,
                    ));
                    last_error = Some(error);
                }
            }
        }

        let result = match last_error {
            None => Err(FetchError::NoStrategies),
            Some(last) => {
                warn!(target = %target, attempts = attempts.len(), "All relays failed");
                Err(FetchError::Exhausted {
                    last,
                    attempts: attempts.clone(),
                })
            }
        };

        FetchOutcome {
            result,
            attempts,
            duration: start.elapsed(),
        }
    }
}

impl std::fmt::Debug for FallbackFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackFetcher")
            .field("base_url", &self.base_url)
            .field("relays", &self.strategy_info())
            .field("ctx", &self.ctx)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockRelay {
        id: String,
        result: Result<Value, RelayError>,
        calls: Arc<AtomicUsize>,
    }

    impl MockRelay {
        fn ok(id: &str, payload: Value) -> Self {
            Self {
                id: id.to_string(),
                result: Ok(payload),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(id: &str, error: RelayError) -> Self {
            Self {
                id: id.to_string(),
                result: Err(error),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn counter(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.calls)
        }
    }

    #[async_trait]
    impl RelayStrategy for MockRelay {
        fn id(&self) -> &str {
            &self.id
        }

        fn kind(&self) -> RelayKind {
            RelayKind::Direct
        }

        fn relay_url(&self, target_url: &str) -> String {
            target_url.to_string()
        }

        fn unwrap_body(&self, _body: &str) -> Result<Value, RelayError> {
            unreachable!("mock relays never read a body")
        }

        async fn fetch_raw(&self, _ctx: &FetchContext, _target_url: &str) -> Result<Value, RelayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn fetcher(strategies: Vec<Box<dyn RelayStrategy>>) -> FallbackFetcher {
        FallbackFetcher::with_strategies("https://api.example/", strategies, FetchContext::new())
    }

    #[tokio::test]
    async fn test_empty_fetcher() {
        let outcome = fetcher(Vec::new()).execute("/foryou/1").await;
        assert!(!outcome.is_success());
        assert!(matches!(outcome.result, Err(FetchError::NoStrategies)));
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let first = MockRelay::ok("first", json!({"success": true, "data": {}}));
        let second = MockRelay::ok("second", json!({"data": {}}));
        let second_calls = second.counter();

        let outcome = fetcher(vec![Box::new(first), Box::new(second)])
            .execute("/foryou/1")
            .await;

        assert_eq!(outcome.successful_strategy(), Some("first"));
        assert_eq!(outcome.attempts_count(), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_third_relay_rescues() {
        let a = MockRelay::failing("a", RelayError::HttpStatus(503));
        let b = MockRelay::failing("b", RelayError::Decode("html".to_string()));
        let c = MockRelay::ok("c", json!({"success": true, "data": {}}));
        let (a_calls, b_calls, c_calls) = (a.counter(), b.counter(), c.counter());

        let f = fetcher(vec![Box::new(a), Box::new(b), Box::new(c)]);
        let payload = f.fetch_with_fallback("/rank/1").await.unwrap();

        assert_eq!(payload, json!({"success": true, "data": {}}));
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
        assert_eq!(c_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_failing_is_exhausted() {
        let f = fetcher(vec![
            Box::new(MockRelay::failing("a", RelayError::Transport("refused".to_string()))),
            Box::new(MockRelay::failing("b", RelayError::EnvelopeInvalid)),
        ]);

        let outcome = f.execute("/search/x/1").await;
        assert_eq!(outcome.errors().len(), 2);

        match outcome.result {
            Err(FetchError::Exhausted { last, attempts }) => {
                assert_eq!(last, RelayError::EnvelopeInvalid);
                assert_eq!(attempts.len(), 2);
                assert_eq!(attempts[0].strategy_id, "a");
                assert!(!attempts[1].success);
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_single() {
        let a = MockRelay::failing("a", RelayError::HttpStatus(500));
        let b = MockRelay::ok("b", json!({"data": null}));
        let a_calls = a.counter();

        let f = fetcher(vec![Box::new(a), Box::new(b)]);
        let outcome = f.execute_single("b", "/foryou/1").await;

        assert_eq!(outcome.successful_strategy(), Some("b"));
        assert_eq!(a_calls.load(Ordering::SeqCst), 0);

        let missing = f.execute_single("zzz", "/foryou/1").await;
        assert!(matches!(missing.result, Err(FetchError::NoStrategies)));
    }

    #[tokio::test]
    async fn test_added_relay_goes_last() {
        let mut f = fetcher(vec![Box::new(MockRelay::failing(
            "a",
            RelayError::HttpStatus(502),
        ))]);
        f.add_strategy(Box::new(MockRelay::ok("late", json!({"data": {}}))));

        assert_eq!(f.len(), 2);
        let outcome = f.execute("/foryou/1").await;
        assert_eq!(outcome.successful_strategy(), Some("late"));
        assert_eq!(outcome.attempts_count(), 2);
    }

    #[test]
    fn test_target_url_joining() {
        let f = fetcher(Vec::new());
        assert_eq!(f.base_url(), "https://api.example");
        assert_eq!(f.target_url("/latest"), "https://api.example/latest");
        assert_eq!(f.target_url("latest"), "https://api.example/latest");
    }
}
