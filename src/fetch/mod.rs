// src/fetch/mod.rs
// =============================================================================
// This module contains everything that talks to the pi API.
//
// Submodules:
// - range: DigitRange/Page and the partition algorithms
// - request: builds the request URL for one page
// - transport: the Transport trait and the reqwest-backed HttpTransport
// - fetcher: DigitRangeFetcher, which ties the pieces together
// =============================================================================

mod fetcher;
mod range;
mod transport;
mod request;

pub use fetcher::DigitRangeFetcher;
pub use range::{partition, DigitRange, Page};
pub use transport::{HttpTransport, Transport};
pub use request::build_request_url;
