// src/fetch/request.rs
// =============================================================================
// Builds the request URL for one API call.
//
//   https://api.pi.delivery/v1/pi?start=0&numberOfDigits=100
//
// The url crate does the percent-encoding; we only decide the parameters.
// =============================================================================

use url::Url;

use crate::config::{DEFAULT_COUNT, DEFAULT_START};

/// Appends `start` and `numberOfDigits` to `base`
///
/// `None` falls back to the defaults (100 digits from offset 0). An explicit
/// `Some(0)` is kept as 0. Any query already on `base` is replaced.
pub fn build_request_url(base: &Url, count: Option<u64>, start: Option<u64>) -> Url {
    let count = count.unwrap_or(DEFAULT_COUNT);
    let start = start.unwrap_or(DEFAULT_START);

    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("start", &start.to_string())
        .append_pair("numberOfDigits", &count.to_string());
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_URL;

    fn base() -> Url {
        Url::parse(DEFAULT_BASE_URL).unwrap()
    }

    #[test]
    fn test_defaults() {
        let url = build_request_url(&base(), None, None);
        assert_eq!(
            url.as_str(),
            "https://api.pi.delivery/v1/pi?start=0&numberOfDigits=100"
        );
    }

    #[test]
    fn test_explicit_values() {
        let url = build_request_url(&base(), Some(500), Some(2001));
        assert_eq!(
            url.as_str(),
            "https://api.pi.delivery/v1/pi?start=2001&numberOfDigits=500"
        );
    }

    #[test]
    fn test_explicit_zero_start_is_kept() {
        let url = build_request_url(&base(), Some(10), Some(0));
        assert!(url.as_str().ends_with("?start=0&numberOfDigits=10"));
    }

    #[test]
    fn test_existing_query_is_replaced() {
        let base = Url::parse("http://localhost:8080/v1/pi?start=99").unwrap();
        let url = build_request_url(&base, Some(5), Some(1));
        assert_eq!(url.as_str(), "http://localhost:8080/v1/pi?start=1&numberOfDigits=5");
    }
}
