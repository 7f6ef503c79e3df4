// src/fetch/range.rs
// =============================================================================
// Digit ranges and how they are cut into API-sized pages.
//
// The API serves at most PAGE_LIMIT digits per call, so a bigger request
// has to be split. Two ways of splitting are offered:
//
// - Reference: the formula pi.delivery clients have always used. It does
//   divmod on the absolute END offset (not the count) and starts every page
//   after the first one digit past a 1000-digit boundary. With start = 0 the
//   page counts add up to the requested count; with start > 0 they don't.
//   Kept exactly as-is.
// - Contiguous: back-to-back pages that cover [start, start+count) exactly.
//
// Rust concepts:
// - Copy types: small structs that are duplicated instead of moved
// - Iterators: building the page list with map/chain/collect
// =============================================================================

use serde::Serialize;
use std::fmt;

use crate::config::PartitionScheme;
use crate::error::FetchError;

/// A requested run of digits: `count` digits starting at offset `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DigitRange {
    pub start: u64,
    pub count: u64,
}

impl DigitRange {
    pub fn new(start: u64, count: u64) -> Self {
        Self { start, count }
    }

    /// One past the last requested offset, `None` if that overflows u64
    pub fn end(&self) -> Option<u64> {
        self.start.checked_add(self.count)
    }

    fn overflow(&self) -> FetchError {
        FetchError::RangeOverflow {
            start: self.start,
            count: self.count,
        }
    }
}

/// One sub-request: `count` (at most the page limit) digits from `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub start: u64,
    pub count: u64,
}

impl Page {
    pub fn new(start: u64, count: u64) -> Self {
        Self { start, count }
    }

    /// One past the last offset this page covers
    pub fn end(&self) -> u64 {
        self.start + self.count
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{start: {}, count: {}}}", self.start, self.count)
    }
}

/// Splits `range` into pages of at most `limit` digits
///
/// A range that already fits in one page comes back as a single page,
/// whichever scheme is chosen. Ranges whose offsets would not fit in a u64
/// are refused with `FetchError::RangeOverflow`.
pub fn partition(
    range: DigitRange,
    limit: u64,
    scheme: PartitionScheme,
) -> Result<Vec<Page>, FetchError> {
    let end = range.end().ok_or_else(|| range.overflow())?;
    if range.count <= limit {
        return Ok(vec![Page::new(range.start, range.count)]);
    }

    match scheme {
        PartitionScheme::Reference => reference_pages(range, end, limit),
        PartitionScheme::Contiguous => Ok(contiguous_pages(range, end, limit)),
    }
}

// end = start + count, (k, m) = divmod(end, limit)
// [{start, limit}] ++ [{start + i*limit + 1, limit} | i in 1..k] ++ [{start + k*limit + 1, m}]
// the last page is dropped when m == 0
fn reference_pages(range: DigitRange, end: u64, limit: u64) -> Result<Vec<Page>, FetchError> {
    let k = end / limit;
    let m = end % limit;

    // start + k*limit + 1 + m bounds every offset below
    range
        .start
        .checked_add(k.checked_mul(limit).ok_or_else(|| range.overflow())?)
        .and_then(|last_start| last_start.checked_add(1 + m))
        .ok_or_else(|| range.overflow())?;

    let first = std::iter::once(Page::new(range.start, limit));
    let middle = (1..k).map(|i| Page::new(range.start + i * limit + 1, limit));
    let last = (m != 0).then(|| Page::new(range.start + k * limit + 1, m));

    Ok(first.chain(middle).chain(last).collect())
}

fn contiguous_pages(range: DigitRange, end: u64, limit: u64) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut offset = range.start;

    while offset < end {
        let count = limit.min(end - offset);
        pages.push(Page::new(offset, count));
        offset += count;
    }

    pages
}
