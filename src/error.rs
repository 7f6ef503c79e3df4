// src/error.rs
// =============================================================================
// Error types for the library side of pi-digits.
//
// The binary uses anyhow (easy, "any error will do"), but the library gives
// callers typed errors so they can tell a dead network apart from a server
// that answered with garbage.
//
// Rust concepts:
// - thiserror: derive macro that writes the Display/Error impls for us
// - #[source]/#[from]: keep the underlying error around for `{:#}` chains
// =============================================================================

use thiserror::Error;

/// Everything that can go wrong while fetching digits
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, body read, ...)
    #[error("network error while fetching {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered, but not with a 2xx status
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// The response body was not valid JSON
    #[error("could not decode JSON response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON, but no string `content` field in it
    #[error("response from {url} has no `content` field")]
    Schema { url: String },

    /// The response cache failed to read or write
    #[error("response cache error: {0}")]
    Cache(String),

    /// The HTTP client could not be constructed (TLS backend, bad settings)
    #[error("failed to build HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    /// The requested offsets do not fit in a u64
    #[error("digit range starting at {start} with {count} digits is out of bounds")]
    RangeOverflow { start: u64, count: u64 },

    /// A digit count of zero was requested
    #[error("number of digits must be greater than 0")]
    InvalidCount,

    /// The API base URL could not be parsed
    #[error("invalid API base URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Failure converting a digit string into integers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigitError {
    #[error("character {character:?} at position {index} is not a decimal digit")]
    NonDigit { index: usize, character: char },
}
