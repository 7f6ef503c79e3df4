// src/cache/memory.rs
// =============================================================================
// In-memory response cache with a time-to-live.
//
// Entries live in a HashMap behind a tokio Mutex so several page fetches can
// share one cache. Freshness is measured with tokio's Instant, which tests
// can pause and fast-forward.
// =============================================================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::{CacheStats, ResponseCache};
use crate::config::DEFAULT_CACHE_TTL;
use crate::error::FetchError;

#[derive(Debug, Clone)]
struct CacheEntry {
    body: Vec<u8>,
    created_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}

#[derive(Debug, Default)]
struct MemoryCacheState {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

/// Response cache kept in process memory
#[derive(Debug)]
pub struct MemoryCache {
    ttl: Duration,
    state: Mutex<MemoryCacheState>,
}

impl MemoryCache {
    /// Creates an empty cache with the default 300 second TTL
    pub fn new() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            state: Mutex::new(MemoryCacheState::default()),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, FetchError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let expired = match state.entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl) => {
                let body = entry.body.clone();
                state.stats.hits += 1;
                debug!(key, "memory cache hit");
                return Ok(Some(body));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            state.entries.remove(key);
            state.stats.expirations += 1;
            state.stats.entries = state.entries.len();
            debug!(key, "memory cache entry expired");
        }
        state.stats.misses += 1;
        Ok(None)
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), FetchError> {
        let mut state = self.state.lock().await;
        state.entries.insert(
            key.to_string(),
            CacheEntry {
                body,
                created_at: Instant::now(),
            },
        );
        state.stats.entries = state.entries.len();
        Ok(())
    }

    async fn clear(&self) -> Result<(), FetchError> {
        let mut state = self.state.lock().await;
        state.entries.clear();
        state.stats.entries = 0;
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        self.state.lock().await.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("a").await.unwrap(), None);

        cache.put("a", b"314".to_vec()).await.unwrap();
        assert_eq!(cache.get("a").await.unwrap(), Some(b"314".to_vec()));

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new().with_ttl(Duration::from_secs(300));
        cache.put("a", b"314".to_vec()).await.unwrap();

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(cache.get("a").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("a").await.unwrap(), None);

        let stats = cache.stats().await;
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.entries, 0);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let cache = MemoryCache::new();
        cache.put("a", b"1".to_vec()).await.unwrap();
        cache.put("a", b"2".to_vec()).await.unwrap();
        assert_eq!(cache.get("a").await.unwrap(), Some(b"2".to_vec()));
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = MemoryCache::new();
        cache.put("a", b"1".to_vec()).await.unwrap();
        cache.clear().await.unwrap();
        assert_eq!(cache.get("a").await.unwrap(), None);
        assert_eq!(cache.stats().await.entries, 0);
    }
}
