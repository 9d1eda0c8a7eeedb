//! Core orchestration library for curio.
//!
//! This crate contains:
//! - Canonical domain models and validation for artworks and searches
//! - The shared outbound call pacer and per-provider courtesy quota
//! - A throttled, timeout-bounded JSON client with a classified error taxonomy
//! - Generation tokens that make superseded operations inert
//! - Bounded, order-preserving hydration of per-artwork detail
//! - Context publication with signature dedup and layered host fallback
//! - Collection-source adapters (Art Institute of Chicago, offline fixture)
//! - Response envelope and structured errors for machine-readable output
//!
//! Control flow for one search: page fetch through [`TimedClient`] →
//! identifier list → [`DetailHydrator`] fans out per-item detail fetches →
//! [`ExploreSession`] applies the visible state → [`ContextPublisher`]
//! announces the result set to the hosting shell. A [`GenerationCounter`]
//! token threads through every stage so a newer search immediately makes
//! all in-flight work for older searches inert.

pub mod adapters;
pub mod cache;
pub mod circuit_breaker;
pub mod client;
pub mod collection;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod generation;
pub mod host;
pub mod http_client;
pub mod hydrate;
pub mod outcome;
pub mod publish;
pub mod quota;
pub mod session;
pub mod source;
pub mod throttle;

pub use adapters::{ArticAdapter, FixtureAdapter};
pub use cache::{CacheMode, DetailCache};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use client::TimedClient;
pub use collection::{CapabilitySet, CollectionSource, HealthState, HealthStatus};
pub use domain::{
    ArtworkCard, ArtworkDetail, ArtworkId, ImageRef, SearchPage, SearchQuery, UtcDateTime,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::{CoreError, ValidationError};
pub use generation::{Generation, GenerationCounter};
pub use host::{ContextUpdate, HostCapabilities, HostRejection, HostShell, NoopHostShell};
pub use http_client::{
    HttpClient, HttpFailure, HttpFailureKind, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};
pub use hydrate::{DetailHydrator, HydratedSet, DEFAULT_CONCURRENCY};
pub use outcome::{CallError, OutboundCall, DEFAULT_CALL_TIMEOUT};
pub use publish::{ContextPayload, ContextPublisher, PublishOutcome, PublishSignature};
pub use quota::ProviderQuota;
pub use session::{
    ExploreSession, SearchOutcome, SearchSummary, SelectionOutcome, SessionConfig, SessionError,
    ViewState,
};
pub use source::SourceId;
pub use throttle::{CallThrottle, ThrottleConfig};
