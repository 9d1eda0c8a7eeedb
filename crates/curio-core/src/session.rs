//! Orchestrating controller for an exploration session.
//!
//! One session owns the visible state of a browsing surface: the current
//! result grid and the current detail selection. Every search runs as
//! page fetch → bounded hydration → state apply → context publish, threaded
//! through a generation token so a newer search makes all in-flight work for
//! older searches inert. The search stream and the detail-selection stream
//! are invalidated independently.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::collection::CollectionSource;
use crate::domain::{ArtworkCard, ArtworkDetail, ArtworkId, SearchQuery};
use crate::generation::GenerationCounter;
use crate::host::HostShell;
use crate::hydrate::{DetailHydrator, HydratedSet, DEFAULT_CONCURRENCY};
use crate::outcome::CallError;
use crate::publish::{ContextPayload, ContextPublisher, PublishOutcome};
use crate::ValidationError;

/// Session-level failures. Per-item hydration failures are absorbed into
/// the outcome; only page-level failures and fully failed batches surface.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Call(#[from] CallError),

    #[error("none of the {attempted} matched artworks could be loaded; try the search again")]
    HydrationFailed { attempted: usize },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl SessionError {
    /// End-user phrasing; internal diagnostics are paraphrased.
    pub fn user_message(&self) -> String {
        match self {
            Self::Call(error) => error.user_message(),
            Self::HydrationFailed { .. } | Self::Validation(_) => self.to_string(),
        }
    }
}

/// Visible state of the browsing surface, replaced wholesale per operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub query: Option<String>,
    pub cards: Vec<ArtworkCard>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
    pub partial_failures: usize,
    pub selected: Option<ArtworkDetail>,
}

/// What happened to a search request.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Results were applied to the visible state.
    Applied(SearchSummary),
    /// A newer search superseded this one; nothing was applied.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSummary {
    pub shown: usize,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
    pub failed: usize,
    /// Informational note for partial failure; `None` when everything loaded.
    pub note: Option<String>,
    pub published: bool,
}

/// What happened to a detail-selection request.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    Applied(ArtworkDetail),
    Superseded,
}

/// Session configuration.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub hydration_concurrency: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hydration_concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// The orchestrating UI controller.
pub struct ExploreSession {
    source: Arc<dyn CollectionSource>,
    hydrator: DetailHydrator,
    publisher: ContextPublisher,
    search_generations: GenerationCounter,
    selection_generations: GenerationCounter,
    state: Mutex<ViewState>,
}

impl ExploreSession {
    pub fn new(
        source: Arc<dyn CollectionSource>,
        host: Arc<dyn HostShell>,
        config: SessionConfig,
    ) -> Result<Self, ValidationError> {
        let search_generations = GenerationCounter::new();
        let hydrator = DetailHydrator::new(
            Arc::clone(&source),
            search_generations.clone(),
            config.hydration_concurrency,
        )?;

        Ok(Self {
            source,
            hydrator,
            publisher: ContextPublisher::new(host),
            search_generations,
            selection_generations: GenerationCounter::new(),
            state: Mutex::new(ViewState::default()),
        })
    }

    pub async fn view(&self) -> ViewState {
        self.state.lock().await.clone()
    }

    pub fn source_id(&self) -> crate::source::SourceId {
        self.source.id()
    }

    /// Runs one search to completion: page fetch, hydration, state apply,
    /// context publish. A search superseded at any checkpoint applies
    /// nothing and reports `Superseded`.
    pub async fn search(&self, query: SearchQuery) -> Result<SearchOutcome, SessionError> {
        let generation = self.search_generations.next();
        tracing::debug!(
            text = query.text(),
            page = query.page(),
            generation = generation.value(),
            "search issued"
        );

        // Page-level failure propagates; per-item failures never do.
        let page = self.source.search(&query).await?;

        if !self.search_generations.is_current(generation) {
            tracing::debug!(generation = generation.value(), "search superseded after page fetch");
            return Ok(SearchOutcome::Superseded);
        }

        let hydrated = if page.is_empty() {
            HydratedSet::default()
        } else {
            self.hydrator.hydrate(&page.ids, generation).await
        };

        if !self.search_generations.is_current(generation) {
            return Ok(SearchOutcome::Superseded);
        }

        if hydrated.all_failed() {
            return Err(SessionError::HydrationFailed {
                attempted: hydrated.failed,
            });
        }

        {
            let mut state = self.state.lock().await;
            // Final currency check under the state lock: a competing search
            // that already applied must not be overwritten by this one.
            if !self.search_generations.is_current(generation) {
                return Ok(SearchOutcome::Superseded);
            }
            state.query = Some(query.text().to_owned());
            state.cards = hydrated.cards.clone();
            state.total = page.total;
            state.page = page.page;
            state.total_pages = page.total_pages;
            state.partial_failures = hydrated.failed;
            state.selected = None;
        }

        let note = (hydrated.failed > 0).then(|| {
            format!(
                "{} of {} matched artworks could not be loaded",
                hydrated.failed,
                page.ids.len()
            )
        });
        if let Some(note) = &note {
            tracing::info!(%note, "partial hydration");
        }

        let payload = ContextPayload::from_results(&query, page.total, &hydrated.cards);
        let published = !matches!(
            self.publisher.publish(&payload).await,
            PublishOutcome::NotPublished(_)
        );

        Ok(SearchOutcome::Applied(SearchSummary {
            shown: hydrated.cards.len(),
            total: page.total,
            page: page.page,
            total_pages: page.total_pages,
            failed: hydrated.failed,
            note,
            published,
        }))
    }

    /// Opens one artwork in the detail view. Runs on its own generation
    /// stream, so it never invalidates an in-flight search.
    pub async fn open_artwork(&self, id: ArtworkId) -> Result<SelectionOutcome, SessionError> {
        let generation = self.selection_generations.next();

        let detail = self.source.detail(id).await?;

        {
            let mut state = self.state.lock().await;
            if !self.selection_generations.is_current(generation) {
                tracing::debug!(%id, "selection superseded");
                return Ok(SelectionOutcome::Superseded);
            }
            state.selected = Some(detail.clone());
        }

        let payload = ContextPayload::from_selection(&detail);
        self.publisher.publish(&payload).await;

        Ok(SelectionOutcome::Applied(detail))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::adapters::FixtureAdapter;
    use crate::host::NoopHostShell;

    fn session(fixture: FixtureAdapter) -> ExploreSession {
        ExploreSession::new(
            Arc::new(fixture),
            Arc::new(NoopHostShell),
            SessionConfig::default(),
        )
        .expect("valid session config")
    }

    fn query(text: &str) -> SearchQuery {
        SearchQuery::new(text, 1, 12).expect("valid query")
    }

    #[tokio::test]
    async fn search_applies_cards_and_counters() {
        let session = session(FixtureAdapter::default());

        let outcome = session
            .search(query("nighthawks"))
            .await
            .expect("search succeeds");

        match outcome {
            SearchOutcome::Applied(summary) => {
                assert_eq!(summary.shown, 1);
                assert_eq!(summary.total, 1);
                assert!(summary.note.is_none());
                assert!(summary.published);
            }
            SearchOutcome::Superseded => panic!("uncontested search cannot be superseded"),
        }

        let view = session.view().await;
        assert_eq!(view.cards.len(), 1);
        assert_eq!(view.cards[0].title, "Nighthawks");
        assert_eq!(view.query.as_deref(), Some("nighthawks"));
    }

    #[tokio::test]
    async fn empty_search_applies_an_empty_grid() {
        let session = session(FixtureAdapter::default());

        let outcome = session
            .search(query("zzz-no-such-artwork"))
            .await
            .expect("search succeeds");

        match outcome {
            SearchOutcome::Applied(summary) => {
                assert_eq!(summary.shown, 0);
                assert_eq!(summary.total, 0);
            }
            SearchOutcome::Superseded => panic!("uncontested search cannot be superseded"),
        }
        assert!(session.view().await.cards.is_empty());
    }

    #[tokio::test]
    async fn partial_failure_is_a_note_not_an_error() {
        // "impressionism" matches 4 catalog works; fail one of them.
        let fixture = FixtureAdapter::default().with_failing_id(16568);
        let session = session(fixture);

        let outcome = session
            .search(query("impressionism"))
            .await
            .expect("partial failure is tolerated");

        match outcome {
            SearchOutcome::Applied(summary) => {
                assert_eq!(summary.shown, 3);
                assert_eq!(summary.failed, 1);
                let note = summary.note.expect("partial failure carries a note");
                assert!(note.contains("1 of 4"));
            }
            SearchOutcome::Superseded => panic!("uncontested search cannot be superseded"),
        }
    }

    #[tokio::test]
    async fn fully_failed_hydration_prompts_a_retry() {
        let fixture = FixtureAdapter::default().with_failing_id(111628);
        let session = session(fixture);

        let error = session
            .search(query("nighthawks"))
            .await
            .expect_err("all-failed batch is an error");

        assert!(matches!(error, SessionError::HydrationFailed { attempted: 1 }));
        assert!(error.user_message().contains("try the search again"));
    }

    #[tokio::test]
    async fn page_level_failure_propagates_classified() {
        let fixture = FixtureAdapter::default()
            .with_search_error(CallError::HttpStatus { status: 503 });
        let session = session(fixture);

        let error = session
            .search(query("monet"))
            .await
            .expect_err("page failure propagates");

        assert!(matches!(
            error,
            SessionError::Call(CallError::HttpStatus { status: 503 })
        ));
        assert!(error.user_message().contains("temporarily degraded"));
    }

    #[tokio::test(start_paused = true)]
    async fn newer_search_supersedes_an_older_one() {
        let fixture = FixtureAdapter::default()
            // Slow down every detail fetch of the first search.
            .with_detail_delay(16568, Duration::from_millis(500))
            .with_detail_delay(20684, Duration::from_millis(500))
            .with_detail_delay(14598, Duration::from_millis(500))
            .with_detail_delay(28560, Duration::from_millis(500));
        let session = Arc::new(session(fixture));

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.search(query("impressionism")).await })
        };
        // Let the first search issue its token and start hydrating.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let second = session
            .search(query("nighthawks"))
            .await
            .expect("second search succeeds");
        assert!(matches!(second, SearchOutcome::Applied(_)));

        let first = first
            .await
            .expect("first search task finishes")
            .expect("superseded search is not an error");
        assert!(matches!(first, SearchOutcome::Superseded));

        let view = session.view().await;
        assert_eq!(view.cards.len(), 1);
        assert_eq!(view.cards[0].title, "Nighthawks");
        assert_eq!(view.query.as_deref(), Some("nighthawks"));
    }

    #[tokio::test]
    async fn selection_does_not_cancel_the_search_stream() {
        let session = session(FixtureAdapter::default());

        session
            .search(query("nighthawks"))
            .await
            .expect("search succeeds");

        let selection = session
            .open_artwork(ArtworkId::new(6565).expect("valid id"))
            .await
            .expect("selection succeeds");

        match selection {
            SelectionOutcome::Applied(detail) => assert_eq!(detail.title, "American Gothic"),
            SelectionOutcome::Superseded => panic!("uncontested selection cannot be superseded"),
        }

        // The search results survive the detail selection.
        let view = session.view().await;
        assert_eq!(view.cards.len(), 1);
        assert_eq!(
            view.selected.expect("selection applied").title,
            "American Gothic"
        );
    }
}
