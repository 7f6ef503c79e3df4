// src/cache/noop.rs
// A cache that never remembers anything. Every request goes to the network.

use async_trait::async_trait;

use super::{CacheStats, ResponseCache};
use crate::error::FetchError;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCache;

#[async_trait]
impl ResponseCache for NoOpCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, FetchError> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _body: Vec<u8>) -> Result<(), FetchError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), FetchError> {
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}
