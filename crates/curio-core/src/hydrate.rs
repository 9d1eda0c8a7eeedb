//! Bounded fan-out of per-artwork detail fetches.
//!
//! A hydration batch fetches detail records for an ordered list of
//! identifiers with a fixed pool of worker loops. Output order always
//! matches input order regardless of completion order, and a single item's
//! failure never aborts the batch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::collection::CollectionSource;
use crate::domain::{ArtworkCard, ArtworkId};
use crate::generation::{Generation, GenerationCounter};
use crate::ValidationError;

pub const DEFAULT_CONCURRENCY: usize = 6;

/// Outcome of one hydration batch: the cards that loaded, in input order,
/// plus the number of per-item fetch failures. Items skipped because the
/// batch went stale are neither.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HydratedSet {
    pub cards: Vec<ArtworkCard>,
    pub failed: usize,
}

impl HydratedSet {
    pub fn all_failed(&self) -> bool {
        self.cards.is_empty() && self.failed > 0
    }
}

/// Concurrency-bounded detail fetcher.
#[derive(Clone)]
pub struct DetailHydrator {
    source: Arc<dyn CollectionSource>,
    generations: GenerationCounter,
    concurrency: usize,
}

impl std::fmt::Debug for DetailHydrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailHydrator")
            .field("generations", &self.generations)
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

impl DetailHydrator {
    pub fn new(
        source: Arc<dyn CollectionSource>,
        generations: GenerationCounter,
        concurrency: usize,
    ) -> Result<Self, ValidationError> {
        if concurrency == 0 {
            return Err(ValidationError::ZeroConcurrency);
        }
        Ok(Self {
            source,
            generations,
            concurrency,
        })
    }

    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetches detail for every identifier, preserving input order.
    ///
    /// Workers claim indices from a shared cursor, so each identifier is
    /// fetched exactly once. Success writes the card into the slot at the
    /// claimed input index; failure leaves the slot empty and bumps the
    /// shared failure count. Workers re-check the batch's generation before
    /// fetching and again before writing, abandoning the slot write when a
    /// newer operation has superseded this batch.
    pub async fn hydrate(&self, ids: &[ArtworkId], generation: Generation) -> HydratedSet {
        if ids.is_empty() {
            return HydratedSet::default();
        }

        let ids: Arc<Vec<ArtworkId>> = Arc::new(ids.to_vec());
        let slots: Arc<Mutex<Vec<Option<ArtworkCard>>>> =
            Arc::new(Mutex::new(vec![None; ids.len()]));
        let cursor = Arc::new(AtomicUsize::new(0));
        let failed = Arc::new(AtomicUsize::new(0));

        let workers = self.concurrency.min(ids.len());
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            handles.push(tokio::spawn(worker_loop(
                Arc::clone(&self.source),
                self.generations.clone(),
                generation,
                Arc::clone(&ids),
                Arc::clone(&slots),
                Arc::clone(&cursor),
                Arc::clone(&failed),
            )));
        }

        for handle in handles {
            if handle.await.is_err() {
                tracing::warn!("hydration worker aborted");
            }
        }

        let mut slots = slots.lock().await;
        let cards = slots.drain(..).flatten().collect();

        HydratedSet {
            cards,
            failed: failed.load(Ordering::SeqCst),
        }
    }
}

async fn worker_loop(
    source: Arc<dyn CollectionSource>,
    generations: GenerationCounter,
    generation: Generation,
    ids: Arc<Vec<ArtworkId>>,
    slots: Arc<Mutex<Vec<Option<ArtworkCard>>>>,
    cursor: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
) {
    loop {
        let index = cursor.fetch_add(1, Ordering::SeqCst);
        if index >= ids.len() {
            break;
        }

        if !generations.is_current(generation) {
            tracing::debug!(
                generation = generation.value(),
                "hydration batch superseded before fetch"
            );
            break;
        }

        let id = ids[index];
        match source.detail(id).await {
            Ok(detail) => {
                if !generations.is_current(generation) {
                    // The fetch completed for a superseded batch; its result
                    // must never reach the slot array.
                    tracing::debug!(
                        %id,
                        generation = generation.value(),
                        "discarding stale hydration result"
                    );
                    break;
                }
                slots.lock().await[index] = Some(detail.to_card());
            }
            Err(error) => {
                failed.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(%id, code = error.code(), "detail fetch failed");
            }
        }
    }
}
