// src/cache/disk.rs
// =============================================================================
// Disk-backed response cache: one versioned JSON file.
//
// This is what makes repeated `pi-digits digits ...` runs cheap: the file
// outlives the process, so a second run within the TTL never touches the
// network.
//
// File layout:
//   {
//     "version": 1,
//     "entries": {
//       "https://api.pi.delivery/v1/pi?start=0&numberOfDigits=10": {
//         "body": "{\"content\":\"3141592653\"}",
//         "created_at": 1760000000000
//       }
//     }
//   }
//
// The file is loaded lazily on first use and rewritten (via a temp file and
// rename) on every put. A missing file is an empty cache; an unreadable or
// corrupt one is logged and treated as empty too.
// =============================================================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{CacheStats, ResponseCache};
use crate::config::DEFAULT_CACHE_TTL;
use crate::error::FetchError;

/// Current cache file format version
const CACHE_VERSION: u32 = 1;

// Wall-clock milliseconds since the Unix epoch
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    created_at: u64,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration, now: u64) -> bool {
        now.saturating_sub(self.created_at) >= ttl.as_millis() as u64
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheData {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

impl Default for CacheData {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION,
            entries: HashMap::new(),
        }
    }
}

#[derive(Debug, Default)]
struct DiskCacheState {
    // None until the file has been read
    data: Option<CacheData>,
    stats: CacheStats,
}

/// Response cache persisted to a JSON file
#[derive(Debug)]
pub struct DiskCache {
    path: PathBuf,
    ttl: Duration,
    state: Mutex<DiskCacheState>,
}

impl DiskCache {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ttl: DEFAULT_CACHE_TTL,
            state: Mutex::new(DiskCacheState::default()),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> CacheData {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cache file yet");
                return CacheData::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read cache file, starting empty");
                return CacheData::default();
            }
        };

        match serde_json::from_slice::<CacheData>(&raw) {
            Ok(data) if data.version == CACHE_VERSION => {
                debug!(path = %self.path.display(), entries = data.entries.len(), "loaded cache file");
                data
            }
            Ok(data) => {
                warn!(
                    path = %self.path.display(),
                    found = data.version,
                    expected = CACHE_VERSION,
                    "cache file version mismatch, starting empty"
                );
                CacheData::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt cache file, starting empty");
                CacheData::default()
            }
        }
    }

    async fn save(&self, data: &CacheData) -> Result<(), FetchError> {
        let json = serde_json::to_vec_pretty(data)
            .map_err(|e| FetchError::Cache(format!("serialize cache: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                FetchError::Cache(format!("create {}: {}", parent.display(), e))
            })?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| FetchError::Cache(format!("write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| FetchError::Cache(format!("rename to {}: {}", self.path.display(), e)))?;
        Ok(())
    }
}

#[async_trait]
impl ResponseCache for DiskCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, FetchError> {
        let mut guard = self.state.lock().await;
        if guard.data.is_none() {
            guard.data = Some(self.load().await);
        }
        let state = &mut *guard;
        let Some(data) = state.data.as_mut() else {
            return Ok(None);
        };

        let now = now_millis();
        let expired = data
            .entries
            .get(key)
            .map(|entry| entry.is_expired(self.ttl, now));
        let found = match expired {
            Some(false) => data.entries.get(key).map(|entry| entry.body.clone()),
            Some(true) => {
                // Dropped from memory now, from the file on the next put
                data.entries.remove(key);
                state.stats.expirations += 1;
                debug!(key, "disk cache entry expired");
                None
            }
            None => None,
        };
        state.stats.entries = data.entries.len();

        match found {
            Some(body) => {
                state.stats.hits += 1;
                debug!(key, "disk cache hit");
                Ok(Some(body.into_bytes()))
            }
            None => {
                state.stats.misses += 1;
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), FetchError> {
        let body = match String::from_utf8(body) {
            Ok(body) => body,
            Err(_) => {
                debug!(key, "response body is not UTF-8, not caching it");
                return Ok(());
            }
        };

        let mut guard = self.state.lock().await;
        if guard.data.is_none() {
            guard.data = Some(self.load().await);
        }
        let state = &mut *guard;
        let Some(data) = state.data.as_mut() else {
            return Ok(());
        };

        // Build the next state aside; memory only changes once the file does
        let now = now_millis();
        let ttl = self.ttl;
        let mut next = CacheData {
            version: CACHE_VERSION,
            entries: data
                .entries
                .iter()
                .filter(|(_, entry)| !entry.is_expired(ttl, now))
                .map(|(k, entry)| (k.clone(), entry.clone()))
                .collect(),
        };
        next.entries.insert(
            key.to_string(),
            CacheEntry {
                body,
                created_at: now,
            },
        );

        self.save(&next).await?;
        state.stats.entries = next.entries.len();
        *data = next;
        Ok(())
    }

    async fn clear(&self) -> Result<(), FetchError> {
        let mut state = self.state.lock().await;
        let data = CacheData::default();
        self.save(&data).await?;
        state.data = Some(data);
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
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");

        let first = DiskCache::new(&path);
        first.put("url", b"{\"content\":\"314\"}".to_vec()).await.unwrap();
        assert!(path.exists());

        let second = DiskCache::new(&path);
        assert_eq!(
            second.get("url").await.unwrap(),
            Some(b"{\"content\":\"314\"}".to_vec())
        );
        assert_eq!(second.stats().await.hits, 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_misses() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path().join("cache.json")).with_ttl(Duration::ZERO);

        cache.put("url", b"body".to_vec()).await.unwrap();
        assert_eq!(cache.get("url").await.unwrap(), None);
        assert_eq!(cache.stats().await.expirations, 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path().join("nothing-here.json"));
        assert_eq!(cache.get("url").await.unwrap(), None);
        assert_eq!(cache.stats().await.misses, 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "not json at all").unwrap();

        let cache = DiskCache::new(&path);
        assert_eq!(cache.get("url").await.unwrap(), None);

        // A put rewrites the file in the current format
        cache.put("url", b"body".to_vec()).await.unwrap();
        let reloaded = DiskCache::new(&path);
        assert_eq!(reloaded.get("url").await.unwrap(), Some(b"body".to_vec()));
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("cache.json");

        let cache = DiskCache::new(&path);
        cache.put("url", b"body".to_vec()).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_clear_empties_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");

        let cache = DiskCache::new(&path);
        cache.put("url", b"body".to_vec()).await.unwrap();
        cache.clear().await.unwrap();

        let reloaded = DiskCache::new(&path);
        assert_eq!(reloaded.get("url").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_memory_untouched() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "a regular file").unwrap();

        // The parent "directory" is a regular file, so nothing can be written
        let cache = DiskCache::new(blocker.join("cache.json"));
        let result = cache.put("url", b"body".to_vec()).await;

        assert!(matches!(result, Err(FetchError::Cache(_))));
        assert_eq!(cache.get("url").await.unwrap(), None);
        assert_eq!(cache.stats().await.entries, 0);
    }

    #[tokio::test]
    async fn test_entry_fresh_then_expired() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path().join("cache.json"))
            .with_ttl(Duration::from_millis(500));

        cache.put("url", b"body".to_vec()).await.unwrap();
        assert_eq!(cache.get("url").await.unwrap(), Some(b"body".to_vec()));

        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(cache.get("url").await.unwrap(), None);

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.entries, 0);
    }
}
