// src/config.rs
// =============================================================================
// Configuration for the fetcher and its response cache.
//
// These are plain structs with Default impls. The CLI (src/cli.rs) fills them
// in from command-line flags; library users can build them directly.
// =============================================================================

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// The pi.delivery endpoint that serves digits
pub const DEFAULT_BASE_URL: &str = "https://api.pi.delivery/v1/pi";

/// Most digits the API returns in a single call
pub const PAGE_LIMIT: u64 = 1000;

/// Digits fetched when the caller doesn't say how many
pub const DEFAULT_COUNT: u64 = 100;

/// Offset used when the caller doesn't give one
pub const DEFAULT_START: u64 = 0;

/// How long a cached response stays fresh
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// File used by the disk cache unless told otherwise
pub const DEFAULT_CACHE_PATH: &str = "pi_digits_cache.json";

/// How a range bigger than one page is split into pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionScheme {
    /// The pi.delivery paging formula: divmod on the absolute end offset,
    /// later pages start one past each 1000-digit boundary
    #[default]
    Reference,
    /// Back-to-back pages that cover the range exactly
    Contiguous,
}

/// Which cache backend sits in front of the network
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// JSON file on disk, survives between runs
    #[default]
    Disk,
    /// In-process map, gone when the process exits
    Memory,
    /// No caching at all
    None,
}

/// Settings for `DigitRangeFetcher`
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub base_url: String,
    pub page_limit: u64,
    pub partition: PartitionScheme,
    /// Pages fetched at the same time (1 = one after another)
    pub concurrency: usize,
    /// Per-request timeout; `None` waits as long as the server takes
    pub timeout: Option<Duration>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_limit: PAGE_LIMIT,
            partition: PartitionScheme::default(),
            concurrency: 1,
            timeout: None,
        }
    }
}

/// Settings for the response cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub path: PathBuf,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            path: PathBuf::from(DEFAULT_CACHE_PATH),
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}
