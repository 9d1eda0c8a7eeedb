//! Adapter for the Art Institute of Chicago public API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::{CacheMode, DetailCache};
use crate::circuit_breaker::{CircuitBreaker, CircuitState};
use crate::client::TimedClient;
use crate::collection::{CapabilitySet, CollectionSource, HealthState, HealthStatus};
use crate::domain::{display_or, ArtworkDetail, ArtworkId, ImageRef, SearchPage, SearchQuery};
use crate::outcome::{CallError, OutboundCall};
use crate::quota::ProviderQuota;
use crate::source::SourceId;

const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1";

/// Field list requested from the detail endpoint; keeping it explicit keeps
/// response payloads small and the expected shape stable.
const DETAIL_FIELDS: &str =
    "id,title,artist_display,date_display,medium_display,credit_line,image_id,department_title,term_titles";

/// Art Institute of Chicago collection source.
///
/// Wraps the paginated `artworks/search` endpoint and the per-id `artworks`
/// detail endpoint behind the shared throttled client, a per-provider
/// courtesy quota, a circuit breaker and a detail cache.
#[derive(Clone)]
pub struct ArticAdapter {
    client: TimedClient,
    quota: ProviderQuota,
    breaker: Arc<CircuitBreaker>,
    cache: DetailCache,
    cache_mode: CacheMode,
    base_url: String,
    call_timeout: Duration,
    quota_waited: Arc<AtomicBool>,
}

impl ArticAdapter {
    pub fn new(client: TimedClient) -> Self {
        Self {
            client,
            quota: ProviderQuota::artic_default(),
            breaker: Arc::new(CircuitBreaker::default()),
            cache: DetailCache::default(),
            cache_mode: CacheMode::Use,
            base_url: String::from(DEFAULT_BASE_URL),
            call_timeout: Duration::from_secs(5),
            quota_waited: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_quota(mut self, quota: ProviderQuota) -> Self {
        self.quota = quota;
        self
    }

    pub fn with_breaker(mut self, breaker: Arc<CircuitBreaker>) -> Self {
        self.breaker = breaker;
        self
    }

    pub fn with_cache_mode(mut self, cache_mode: CacheMode) -> Self {
        self.cache_mode = cache_mode;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    async fn guard_call(&self) -> Result<(), CallError> {
        if !self.breaker.allow_call() {
            return Err(CallError::unreachable(
                "artic circuit breaker is open; refusing the call",
            ));
        }

        if self.quota.try_acquire() {
            self.quota_waited.store(false, Ordering::SeqCst);
        } else {
            // Courtesy budget exhausted: wait it out rather than burning the
            // upstream's goodwill. The health snapshot reports the stall.
            self.quota_waited.store(true, Ordering::SeqCst);
            self.quota.acquire().await;
        }

        Ok(())
    }

    fn settle_breaker<T>(&self, result: &Result<T, CallError>) {
        match result {
            Ok(_) => self.breaker.record_success(),
            Err(error) if error.retryable() => self.breaker.record_failure(),
            Err(_) => {}
        }
    }

    async fn fetch_search(&self, query: &SearchQuery) -> Result<SearchPage, CallError> {
        self.guard_call().await?;

        let url = format!(
            "{}/artworks/search?q={}&page={}&limit={}&fields=id",
            self.base_url,
            urlencoding::encode(query.text()),
            query.page(),
            query.page_size(),
        );

        let result = self
            .client
            .get_json::<SearchEnvelope>(OutboundCall::get(url).with_timeout(self.call_timeout))
            .await;
        self.settle_breaker(&result);

        let envelope = result?;
        let ids = envelope
            .data
            .into_iter()
            .filter_map(|record| ArtworkId::new(record.id).ok())
            .collect();

        Ok(SearchPage {
            total: envelope.pagination.total,
            page: envelope.pagination.current_page,
            page_size: envelope.pagination.limit as usize,
            total_pages: envelope.pagination.total_pages,
            ids,
        })
    }

    async fn fetch_detail(&self, id: ArtworkId) -> Result<ArtworkDetail, CallError> {
        if self.cache_mode == CacheMode::Use {
            if let Some(detail) = self.cache.get(id).await {
                return Ok(detail);
            }
        }

        self.guard_call().await?;

        let url = format!(
            "{}/artworks/{}?fields={}",
            self.base_url,
            id.value(),
            DETAIL_FIELDS
        );

        let result = self
            .client
            .get_json::<DetailEnvelope>(OutboundCall::get(url).with_timeout(self.call_timeout))
            .await;
        self.settle_breaker(&result);

        let envelope = result?;
        let detail = normalize_detail(envelope)?;

        if self.cache_mode != CacheMode::Bypass {
            self.cache.put(id, detail.clone()).await;
        }

        Ok(detail)
    }
}

impl CollectionSource for ArticAdapter {
    fn id(&self) -> SourceId {
        SourceId::Artic
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::full()
    }

    fn search<'a>(
        &'a self,
        query: &'a SearchQuery,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<SearchPage, CallError>> + Send + 'a>,
    > {
        Box::pin(self.fetch_search(query))
    }

    fn detail<'a>(
        &'a self,
        id: ArtworkId,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<ArtworkDetail, CallError>> + Send + 'a>,
    > {
        Box::pin(self.fetch_detail(id))
    }

    fn health(&self) -> HealthStatus {
        let state = match self.breaker.state() {
            CircuitState::Closed => HealthState::Healthy,
            CircuitState::HalfOpen => HealthState::Degraded,
            CircuitState::Open => HealthState::Unhealthy,
        };
        HealthStatus::new(state, !self.quota_waited.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    pagination: PaginationBlock,
    #[serde(default)]
    data: Vec<IdRecord>,
}

#[derive(Debug, Deserialize)]
struct PaginationBlock {
    total: u64,
    limit: u32,
    current_page: u32,
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct IdRecord {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    data: ArtworkRecord,
    #[serde(default)]
    config: Option<ApiConfig>,
}

#[derive(Debug, Deserialize)]
struct ApiConfig {
    iiif_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArtworkRecord {
    id: i64,
    title: Option<String>,
    artist_display: Option<String>,
    date_display: Option<String>,
    medium_display: Option<String>,
    credit_line: Option<String>,
    image_id: Option<String>,
    department_title: Option<String>,
    #[serde(default)]
    term_titles: Vec<String>,
}

fn normalize_detail(envelope: DetailEnvelope) -> Result<ArtworkDetail, CallError> {
    let record = envelope.data;
    let id = ArtworkId::new(record.id)
        .map_err(|_| CallError::shape_mismatch(format!("non-positive artwork id {}", record.id)))?;

    let iiif_base = envelope
        .config
        .and_then(|config| config.iiif_url)
        .unwrap_or_else(|| String::from("https://www.artic.edu/iiif/2"));

    let image = record
        .image_id
        .filter(|image_id| !image_id.trim().is_empty())
        .map(|image_id| ImageRef::with_base(image_id, iiif_base))
        .transpose()
        .map_err(|e| CallError::shape_mismatch(e.to_string()))?;

    Ok(ArtworkDetail {
        id,
        title: display_or(record.title, "Untitled"),
        artist: display_or(record.artist_display, "Unknown artist"),
        date_line: display_or(record.date_display, "n.d."),
        medium: display_or(record.medium_display, "Medium not recorded"),
        credit_line: display_or(record.credit_line, ""),
        department: record.department_title,
        terms: record.term_titles,
        image,
    })
}
