//! Behavior-driven tests for the exploration session.
//!
//! These tests verify HOW the controller keeps the visible state consistent
//! under rapid re-querying: stale-result suppression, independent operation
//! streams, and the user-visibility policy for failures.

use std::sync::Arc;
use std::time::Duration;

use curio_core::{
    ArtworkId, CallError, ExploreSession, FixtureAdapter, HostShell, SearchOutcome, SearchQuery,
    SelectionOutcome, SessionConfig, SessionError,
};
use curio_tests::RecordingHost;

fn session_with(fixture: FixtureAdapter, host: Arc<dyn HostShell>) -> ExploreSession {
    ExploreSession::new(Arc::new(fixture), host, SessionConfig::default())
        .expect("valid session config")
}

fn query(text: &str) -> SearchQuery {
    SearchQuery::new(text, 1, 12).expect("valid query")
}

#[tokio::test(start_paused = true)]
async fn an_older_search_never_overwrites_a_newer_one() {
    // Given: search A whose detail fetches are slow
    let fixture = FixtureAdapter::default()
        .with_detail_delay(16568, Duration::from_millis(600))
        .with_detail_delay(20684, Duration::from_millis(600))
        .with_detail_delay(14598, Duration::from_millis(600))
        .with_detail_delay(28560, Duration::from_millis(600));
    let session = Arc::new(session_with(fixture, Arc::new(RecordingHost::accepting_all())));

    let first = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.search(query("impressionism")).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    // When: search B starts and completes while A's fetches are in flight
    let second = session
        .search(query("nighthawks"))
        .await
        .expect("newer search succeeds");
    assert!(matches!(second, SearchOutcome::Applied(_)));

    // Then: A reports Superseded even though it completes later, and the
    // visible results are exactly B's
    let first = first
        .await
        .expect("older search task finishes")
        .expect("superseded search is not an error");
    assert!(matches!(first, SearchOutcome::Superseded));

    let view = session.view().await;
    assert_eq!(view.query.as_deref(), Some("nighthawks"));
    assert_eq!(view.cards.len(), 1);
    assert_eq!(view.cards[0].title, "Nighthawks");
}

#[tokio::test(start_paused = true)]
async fn a_search_superseded_during_its_page_fetch_applies_nothing() {
    // Given: a source whose search endpoint itself is slow
    let fixture = FixtureAdapter::default().with_search_delay(Duration::from_millis(200));
    let session = Arc::new(session_with(fixture, Arc::new(RecordingHost::accepting_all())));

    let first = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.search(query("impressionism")).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    // When: a newer search is issued while the older page fetch is in flight
    let second = session
        .search(query("nighthawks"))
        .await
        .expect("newer search succeeds");
    assert!(matches!(second, SearchOutcome::Applied(_)));

    // Then: the older search bails at its first checkpoint
    let first = first
        .await
        .expect("older search task finishes")
        .expect("superseded search is not an error");
    assert!(matches!(first, SearchOutcome::Superseded));
    assert_eq!(session.view().await.query.as_deref(), Some("nighthawks"));
}

#[tokio::test]
async fn detail_selection_and_search_invalidate_independently() {
    // Given: an applied search
    let session = session_with(
        FixtureAdapter::default(),
        Arc::new(RecordingHost::accepting_all()),
    );
    session
        .search(query("impressionism"))
        .await
        .expect("search succeeds");
    let cards_before = session.view().await.cards;

    // When: a detail view opens
    let outcome = session
        .open_artwork(ArtworkId::new(28067).expect("valid id"))
        .await
        .expect("selection succeeds");

    // Then: the selection applies and the search results stay visible
    assert!(matches!(outcome, SelectionOutcome::Applied(_)));
    let view = session.view().await;
    assert_eq!(view.cards, cards_before, "search stream was not invalidated");
    assert_eq!(
        view.selected.expect("selection applied").title,
        "The Old Guitarist"
    );
}

#[tokio::test]
async fn search_results_are_published_to_the_host() {
    let host = Arc::new(RecordingHost::accepting_all());
    let session = session_with(FixtureAdapter::default(), Arc::clone(&host) as Arc<dyn HostShell>);

    session
        .search(query("nighthawks"))
        .await
        .expect("search succeeds");

    // The widget-state side channel is the preferred delivery.
    assert_eq!(host.widget_state_attempts(), 1);
    let state = host.last_widget_state().expect("state delivered");
    let summary = state
        .get("summary")
        .and_then(serde_json::Value::as_str)
        .expect("summary present");
    assert!(summary.contains("Nighthawks"));
}

#[tokio::test]
async fn whole_batch_failure_surfaces_a_retry_error() {
    let fixture = FixtureAdapter::default().with_failing_id(111628);
    let session = session_with(fixture, Arc::new(RecordingHost::accepting_all()));

    let error = session
        .search(query("nighthawks"))
        .await
        .expect_err("all-failed batch is an error");

    assert!(matches!(
        error,
        SessionError::HydrationFailed { attempted: 1 }
    ));
}

#[tokio::test]
async fn partial_batch_failure_stays_invisible_except_for_a_note() {
    let fixture = FixtureAdapter::default().with_failing_id(20684);
    let session = session_with(fixture, Arc::new(RecordingHost::accepting_all()));

    let outcome = session
        .search(query("impressionism"))
        .await
        .expect("partial failure is tolerated");

    match outcome {
        SearchOutcome::Applied(summary) => {
            assert_eq!(summary.failed, 1);
            assert_eq!(summary.shown, 3);
            assert!(summary.note.is_some());
        }
        SearchOutcome::Superseded => panic!("uncontested search cannot be superseded"),
    }
}

#[tokio::test]
async fn page_level_failure_propagates_with_user_phrasing() {
    let fixture =
        FixtureAdapter::default().with_search_error(CallError::HttpStatus { status: 429 });
    let session = session_with(fixture, Arc::new(RecordingHost::accepting_all()));

    let error = session
        .search(query("monet"))
        .await
        .expect_err("page-level failure propagates");

    assert!(error.user_message().contains("rate limiting"));
}

#[tokio::test]
async fn publish_degradation_never_fails_the_search() {
    // Given: a host that refuses every delivery channel
    let host = Arc::new(RecordingHost::rejecting_all());
    let session = session_with(
        FixtureAdapter::default(),
        Arc::clone(&host) as Arc<dyn HostShell>,
    );

    // When: a search completes
    let outcome = session
        .search(query("nighthawks"))
        .await
        .expect("publication trouble is never fatal");

    // Then: results applied, publication reported as skipped
    match outcome {
        SearchOutcome::Applied(summary) => {
            assert_eq!(summary.shown, 1);
            assert!(!summary.published);
        }
        SearchOutcome::Superseded => panic!("uncontested search cannot be superseded"),
    }
    assert_eq!(session.view().await.cards.len(), 1);
}
