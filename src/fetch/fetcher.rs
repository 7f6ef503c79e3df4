// src/fetch/fetcher.rs
// =============================================================================
// DigitRangeFetcher: ask for any number of digits, get them back in order.
//
// How it works:
// 1. Up to one page (1000 digits): build the URL, look in the cache, fall back
//    to the network, parse the JSON and pull out the `content` field
// 2. More than one page: split the range into pages (see range.rs), fetch
//    every page through step 1 and glue the results together in page order
//
// Pages are fetched one after another unless `concurrency` is raised. With
// several pages in flight, `buffered` still hands results back in page
// order, so the output is identical either way.
//
// Errors are never papered over: a failed page fails the whole call, and no
// digit is ever made up.
// =============================================================================

use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use super::range::{partition, DigitRange, Page};
use super::transport::{HttpTransport, Transport};
use super::request::build_request_url;
use crate::cache::{build_cache, ResponseCache};
use crate::config::{CacheConfig, FetcherConfig, PartitionScheme, DEFAULT_COUNT, DEFAULT_START};
use crate::digits::DigitString;
use crate::error::FetchError;

/// Fetches ranges of pi's digits, one page per API call
pub struct DigitRangeFetcher {
    base_url: Url,
    page_limit: u64,
    partition: PartitionScheme,
    concurrency: usize,
    transport: Arc<dyn Transport>,
    cache: Arc<dyn ResponseCache>,
}

impl DigitRangeFetcher {
    /// Creates a fetcher from its parts
    ///
    /// The transport and cache are injected so tests (and library users) can
    /// swap either one out.
    pub fn new(
        config: &FetcherConfig,
        transport: Arc<dyn Transport>,
        cache: Arc<dyn ResponseCache>,
    ) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url).map_err(|source| FetchError::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;

        Ok(Self {
            base_url,
            page_limit: config.page_limit.max(1),
            partition: config.partition,
            concurrency: config.concurrency.max(1),
            transport,
            cache,
        })
    }

    /// Creates a fetcher that talks HTTP through reqwest and caches as configured
    pub fn from_config(config: &FetcherConfig, cache: &CacheConfig) -> Result<Self, FetchError> {
        let transport = Arc::new(HttpTransport::new(config.timeout)?);
        Self::new(config, transport, build_cache(cache))
    }

    pub fn cache(&self) -> &Arc<dyn ResponseCache> {
        &self.cache
    }

    /// The URL a single API call for this count/offset would use
    pub fn request_url(&self, count: Option<u64>, start: Option<u64>) -> String {
        build_request_url(&self.base_url, count, start).to_string()
    }

    /// The pages `range` would be fetched as
    pub fn partition(&self, range: DigitRange) -> Result<Vec<Page>, FetchError> {
        partition(range, self.page_limit, self.partition)
    }

    /// Fetches `count` digits starting at offset `start`
    ///
    /// `None` means 100 digits and offset 0 respectively. Asking for zero
    /// digits is an error.
    ///
    /// Example:
    ///   fetcher.fetch_digits(Some(10), Some(0)).await? == "3141592653"
    pub async fn fetch_digits(
        &self,
        count: Option<u64>,
        start: Option<u64>,
    ) -> Result<DigitString, FetchError> {
        let count = count.unwrap_or(DEFAULT_COUNT);
        let start = start.unwrap_or(DEFAULT_START);
        if count == 0 {
            return Err(FetchError::InvalidCount);
        }

        let range = DigitRange::new(start, count);
        if range.end().is_none() {
            return Err(FetchError::RangeOverflow { start, count });
        }
        if count <= self.page_limit {
            return self.fetch_page(Page::new(start, count)).await;
        }

        let pages = self.partition(range)?;
        info!(
            start,
            count,
            pages = pages.len(),
            concurrency = self.concurrency,
            "fetching digits in pages"
        );

        let results: Vec<DigitString> = stream::iter(pages)
            .map(|page| self.fetch_page(page))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        Ok(results.into_iter().collect())
    }

    /// Fetches a single page with one (possibly cached) API call
    pub async fn fetch_page(&self, page: Page) -> Result<DigitString, FetchError> {
        let url = build_request_url(&self.base_url, Some(page.count), Some(page.start));
        let key = url.as_str();

        if let Some(body) = self.cache.get(key).await? {
            debug!(page = %page, "served from cache");
            return extract_content(key, &body);
        }

        let body = self.transport.fetch(&url).await?;
        let digits = extract_content(key, &body)?;

        // Only well-formed responses are worth keeping. A cache that can't
        // store them costs a future request, not these digits.
        if let Err(e) = self.cache.put(key, body).await {
            warn!(page = %page, error = %e, "could not cache response");
        }
        debug!(page = %page, digits = digits.len(), "fetched page");

        Ok(digits)
    }
}

// Pulls the `content` string out of an API response body
fn extract_content(url: &str, body: &[u8]) -> Result<DigitString, FetchError> {
    let json: serde_json::Value =
        serde_json::from_slice(body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })?;

    json.get("content")
        .and_then(serde_json::Value::as_str)
        .map(DigitString::from)
        .ok_or_else(|| FetchError::Schema {
            url: url.to_string(),
        })
}
