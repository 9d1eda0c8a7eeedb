//! Collection-source trait and capability/health types.
//!
//! A collection source wraps one public art-collection API: a paginated
//! search endpoint that returns identifiers, and a per-identifier detail
//! endpoint. Adapters own their own resilience (throttle slot acquisition
//! happens inside the shared client; quota, breaker and cache live in the
//! adapter).

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::domain::{ArtworkDetail, ArtworkId, SearchPage, SearchQuery};
use crate::outcome::CallError;
use crate::source::SourceId;

/// Supported operation matrix for a collection source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    pub search: bool,
    pub detail: bool,
    pub images: bool,
}

impl CapabilitySet {
    pub const fn new(search: bool, detail: bool, images: bool) -> Self {
        Self {
            search,
            detail,
            images,
        }
    }

    pub const fn full() -> Self {
        Self::new(true, true, true)
    }

    pub fn supported_operations(self) -> Vec<&'static str> {
        let mut values = Vec::with_capacity(3);
        if self.search {
            values.push("search");
        }
        if self.detail {
            values.push("detail");
        }
        if self.images {
            values.push("images");
        }
        values
    }
}

/// Health state reported by `sources` command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Runtime source health snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub state: HealthState,
    pub rate_available: bool,
}

impl HealthStatus {
    pub const fn new(state: HealthState, rate_available: bool) -> Self {
        Self {
            state,
            rate_available,
        }
    }

    pub const fn healthy() -> Self {
        Self::new(HealthState::Healthy, true)
    }

    pub fn status_label(self) -> &'static str {
        if !self.rate_available {
            return "rate_limited";
        }

        match self.state {
            HealthState::Healthy => "healthy",
            HealthState::Degraded => "degraded",
            HealthState::Unhealthy => "unhealthy",
        }
    }
}

type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CallError>> + Send + 'a>>;

/// Collection adapter contract.
pub trait CollectionSource: Send + Sync {
    fn id(&self) -> SourceId;
    fn capabilities(&self) -> CapabilitySet;
    fn search<'a>(&'a self, query: &'a SearchQuery) -> SourceFuture<'a, SearchPage>;
    fn detail<'a>(&'a self, id: ArtworkId) -> SourceFuture<'a, ArtworkDetail>;
    fn health(&self) -> HealthStatus;
}
