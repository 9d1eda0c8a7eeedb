//! In-memory caching for artwork detail records.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::{ArtworkDetail, ArtworkId};

/// Defines how a detail fetch interacts with the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Read a non-expired entry if present; otherwise fetch and store.
    #[default]
    Use,
    /// Always fetch, then overwrite the cached entry.
    Refresh,
    /// Always fetch; do not read or write the cache.
    Bypass,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    detail: ArtworkDetail,
    expires_at: Instant,
}

#[derive(Debug)]
struct CacheInner {
    map: HashMap<ArtworkId, CacheEntry>,
    default_ttl: Duration,
}

impl CacheInner {
    fn new(default_ttl: Duration) -> Self {
        Self {
            map: HashMap::new(),
            default_ttl,
        }
    }

    fn get(&self, id: ArtworkId) -> Option<ArtworkDetail> {
        self.map.get(&id).and_then(|entry| {
            if Instant::now() <= entry.expires_at {
                Some(entry.detail.clone())
            } else {
                None
            }
        })
    }

    fn put(&mut self, id: ArtworkId, detail: ArtworkDetail) {
        let expires_at = Instant::now() + self.default_ttl;
        self.map.insert(id, CacheEntry { detail, expires_at });
    }

    fn clear_expired(&mut self) {
        let now = Instant::now();
        self.map.retain(|_, entry| entry.expires_at > now);
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

/// Thread-safe TTL'd store for artwork detail records.
///
/// Detail records are effectively immutable upstream, so a generous TTL
/// saves a network round trip every time an artwork reappears in a search.
#[derive(Debug, Clone)]
pub struct DetailCache {
    inner: Arc<tokio::sync::RwLock<CacheInner>>,
}

pub const DEFAULT_DETAIL_TTL: Duration = Duration::from_secs(15 * 60);

impl Default for DetailCache {
    fn default() -> Self {
        Self::new(DEFAULT_DETAIL_TTL)
    }
}

impl DetailCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner::new(default_ttl))),
        }
    }

    pub async fn get(&self, id: ArtworkId) -> Option<ArtworkDetail> {
        self.inner.read().await.get(id)
    }

    pub async fn put(&self, id: ArtworkId, detail: ArtworkDetail) {
        self.inner.write().await.put(id, detail);
    }

    pub async fn clear_expired(&self) {
        self.inner.write().await.clear_expired();
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
