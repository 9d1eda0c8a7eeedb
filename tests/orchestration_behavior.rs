//! Behavior-driven tests for the orchestration layer.
//!
//! These tests verify HOW the system behaves under load and failure:
//! the shared call ceiling, order-preserving hydration, partial-failure
//! tolerance, and timeout classification.

use std::sync::Arc;
use std::time::Duration;

use curio_core::{
    ArtworkId, CallError, CallThrottle, DetailHydrator, FixtureAdapter, GenerationCounter,
    OutboundCall, ThrottleConfig, TimedClient,
};
use curio_tests::{InstantTransport, PendingTransport};
use serde_json::Value;
use tokio::time::Instant;

fn id(value: i64) -> ArtworkId {
    ArtworkId::new(value).expect("valid id")
}

// =============================================================================
// Shared call ceiling
// =============================================================================

#[tokio::test(start_paused = true)]
async fn no_window_ever_completes_more_calls_than_the_ceiling() {
    // Given: a shared client with a ceiling of 5 calls per second
    let throttle = CallThrottle::new(ThrottleConfig {
        max_calls_per_window: 5,
        window: Duration::from_secs(1),
    });
    let client = Arc::new(TimedClient::new(
        Arc::new(InstantTransport::new("{}")),
        throttle,
    ));

    // When: 17 call sites fire at time zero
    let started = Instant::now();
    let mut handles = Vec::new();
    for _ in 0..17 {
        let client = Arc::clone(&client);
        handles.push(tokio::spawn(async move {
            client
                .get_json::<Value>(OutboundCall::get("https://example.test/artworks"))
                .await
                .expect("instant transport cannot fail");
            started.elapsed()
        }));
    }

    let mut offsets = Vec::new();
    for handle in handles {
        offsets.push(handle.await.expect("call task finishes"));
    }

    // Then: every one-second window completes at most 5 calls
    for window in 0..4 {
        let lower = Duration::from_secs(window);
        let upper = Duration::from_secs(window + 1);
        let in_window = offsets
            .iter()
            .filter(|offset| **offset >= lower && **offset < upper)
            .count();
        assert!(
            in_window <= 5,
            "window {window} completed {in_window} calls, ceiling is 5"
        );
    }
    assert_eq!(offsets.len(), 17, "every call eventually completes");
}

// =============================================================================
// Hydration: order preservation and partial failure
// =============================================================================

#[tokio::test(start_paused = true)]
async fn hydration_output_follows_input_order_not_completion_order() {
    // Given: input [5, 3, 9] where 3 fails and 9 finishes before 5
    let fixture = FixtureAdapter::default()
        .with_detail_delay(5, Duration::from_millis(400))
        .with_failing_id(3)
        .with_detail_delay(9, Duration::from_millis(20));
    let generations = GenerationCounter::new();
    let hydrator = DetailHydrator::new(Arc::new(fixture), generations.clone(), 3)
        .expect("valid concurrency");

    // When: the batch is hydrated
    let result = hydrator
        .hydrate(&[id(5), id(3), id(9)], generations.next())
        .await;

    // Then: output is [card(5), card(9)] — the successful subsequence of the
    // input, never reordered by completion time
    let got: Vec<u64> = result.cards.iter().map(|card| card.id.value()).collect();
    assert_eq!(got, vec![5, 9]);
    assert_eq!(result.failed, 1);
}

#[tokio::test]
async fn one_guaranteed_failure_yields_a_partial_batch_not_an_error() {
    // Given: [1, 2, 3] with item 2 guaranteed to fail
    let fixture = FixtureAdapter::default().with_failing_id(2);
    let generations = GenerationCounter::new();
    let hydrator = DetailHydrator::new(Arc::new(fixture), generations.clone(), 2)
        .expect("valid concurrency");

    // When: the batch is hydrated
    let result = hydrator
        .hydrate(&[id(1), id(2), id(3)], generations.next())
        .await;

    // Then: two cards and one counted failure, nothing thrown
    assert_eq!(result.cards.len(), 2);
    assert_eq!(result.failed, 1);
}

#[tokio::test(start_paused = true)]
async fn concurrency_bound_limits_simultaneous_fetches() {
    // Given: 6 identifiers, each taking 100ms, and a pool of 2 workers
    let mut fixture = FixtureAdapter::default();
    for value in 1..=6 {
        fixture = fixture.with_detail_delay(value, Duration::from_millis(100));
    }
    let generations = GenerationCounter::new();
    let hydrator = DetailHydrator::new(Arc::new(fixture), generations.clone(), 2)
        .expect("valid concurrency");

    // When: the batch runs
    let started = Instant::now();
    let result = hydrator
        .hydrate(
            &[id(1), id(2), id(3), id(4), id(5), id(6)],
            generations.next(),
        )
        .await;

    // Then: 6 items at 2-wide take three full rounds
    assert_eq!(result.cards.len(), 6);
    assert!(
        started.elapsed() >= Duration::from_millis(300),
        "two workers cannot finish six 100ms fetches faster than 300ms"
    );
}

// =============================================================================
// Stale batches
// =============================================================================

#[tokio::test(start_paused = true)]
async fn results_of_a_superseded_batch_never_land() {
    // Given: a slow batch for generation T1
    let fixture = FixtureAdapter::default()
        .with_detail_delay(1, Duration::from_millis(200))
        .with_detail_delay(2, Duration::from_millis(200));
    let generations = GenerationCounter::new();
    let hydrator = DetailHydrator::new(Arc::new(fixture), generations.clone(), 2)
        .expect("valid concurrency");

    let stale = generations.next();
    let batch = {
        let hydrator = hydrator.clone();
        tokio::spawn(async move { hydrator.hydrate(&[id(1), id(2)], stale).await })
    };

    // When: a newer operation issues T2 while T1's fetches are in flight
    tokio::time::sleep(Duration::from_millis(50)).await;
    let current = generations.next();

    // Then: T1's batch yields nothing even though its fetches complete later
    let result = batch.await.expect("batch task finishes");
    assert!(result.cards.is_empty());
    assert_eq!(result.failed, 0);
    assert!(generations.is_current(current));
}

// =============================================================================
// Timeout classification
// =============================================================================

#[tokio::test(start_paused = true)]
async fn a_call_that_never_resolves_becomes_a_timeout_not_a_hang() {
    // Given: an upstream that never answers and a 300ms budget
    let client = TimedClient::new(Arc::new(PendingTransport), CallThrottle::default());

    // When: the call runs
    let started = Instant::now();
    let error = client
        .get_json::<Value>(
            OutboundCall::get("https://example.test/artworks")
                .with_timeout(Duration::from_millis(300)),
        )
        .await
        .expect_err("must classify, not hang");

    // Then: the outcome is Timeout, delivered at the budget boundary
    assert!(matches!(error, CallError::Timeout { timeout_ms: 300 }));
    assert_eq!(started.elapsed(), Duration::from_millis(300));
    assert!(error.is_user_safe());
}
