// src/cache/mod.rs
// =============================================================================
// Response caching, keyed by full request URL.
//
// The same URL always returns the same digits, so a stored response is as
// good as a fresh one while it is younger than the TTL (300 seconds by
// default). After that it counts as missing and the network is asked again.
//
// Backends:
// - disk: JSON file that survives between CLI runs (the default)
// - memory: HashMap inside the process
// - noop: never stores anything
//
// The cache is handed to the fetcher explicitly; nothing here installs
// itself globally.
// =============================================================================

mod disk;
mod memory;
mod noop;

pub use disk::DiskCache;
pub use memory::MemoryCache;
pub use noop::NoOpCache;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::config::{CacheBackend, CacheConfig};
use crate::error::FetchError;

/// Counters describing how the cache has been used
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped because they outlived the TTL
    pub expirations: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, expirations={}, entries={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.expirations,
            self.entries,
            self.hit_rate()
        )
    }
}

/// A store of response bodies keyed by request URL
///
/// Implementations must be safe to share between tasks. When two tasks
/// store the same key, the last write wins.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Returns the stored body if it is still fresh
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, FetchError>;

    /// Stores a body, replacing any previous one for the key
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), FetchError>;

    /// Removes every entry
    async fn clear(&self) -> Result<(), FetchError>;

    async fn stats(&self) -> CacheStats;
}

/// Builds the cache backend described by `config`
pub fn build_cache(config: &CacheConfig) -> Arc<dyn ResponseCache> {
    match config.backend {
        CacheBackend::Disk => Arc::new(DiskCache::new(&config.path).with_ttl(config.ttl)),
        CacheBackend::Memory => Arc::new(MemoryCache::new().with_ttl(config.ttl)),
        CacheBackend::None => Arc::new(NoOpCache),
    }
}
