// src/lib.rs
// =============================================================================
// pi-digits: fetch decimal digits of pi from https://api.pi.delivery
//
// The API hands out at most 1000 digits per call. DigitRangeFetcher hides
// that: ask for any count from any offset and it pages, caches and stitches
// the answer back together.
//
//   let fetcher = DigitRangeFetcher::from_config(&FetcherConfig::default(),
//                                                &CacheConfig::default())?;
//   let digits = fetcher.fetch_digits(Some(10), Some(0)).await?;
//   assert_eq!(digits.as_str(), "3141592653");
// =============================================================================

pub mod cache;
pub mod config;
pub mod digits;
pub mod error;
pub mod fetch;

pub use cache::{build_cache, CacheStats, DiskCache, MemoryCache, NoOpCache, ResponseCache};
pub use config::{CacheBackend, CacheConfig, FetcherConfig, PartitionScheme};
pub use digits::DigitString;
pub use error::{DigitError, FetchError};
pub use fetch::{build_request_url, DigitRange, DigitRangeFetcher, HttpTransport, Page, Transport};
