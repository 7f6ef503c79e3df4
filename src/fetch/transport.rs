// src/fetch/transport.rs
// =============================================================================
// The network side: turn a URL into response bytes.
//
// Key functionality:
// - A small Transport trait so the fetcher can be tested without a network
// - HttpTransport: the real thing, a reqwest Client doing plain GETs
// - Non-2xx answers and connection problems become distinct FetchError kinds
//
// Rust concepts:
// - Traits: an interface the fetcher depends on instead of a concrete type
// - async-trait: lets a trait have async methods and still be used as dyn
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::FetchError;

/// Fetches the raw body behind a URL
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// Transport backed by a reqwest HTTP client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a transport with an optional per-request timeout
    ///
    /// The client is reused for every page (connection pooling).
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|source| FetchError::Client { source })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "non-success status from API");
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| categorize_error(url, e))?;

        debug!(url = %url, bytes = body.len(), "response received");
        Ok(body.to_vec())
    }
}

// Logs what kind of network failure this was, then wraps it
fn categorize_error(url: &Url, error: reqwest::Error) -> FetchError {
    let kind = if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connect"
    } else if error.is_body() || error.is_decode() {
        "body"
    } else {
        "other"
    };
    warn!(url = %url, kind, error = %error, "request failed");

    FetchError::Network {
        url: url.to_string(),
        source: error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/pi"))
            .and(query_param("start", "0"))
            .and(query_param("numberOfDigits", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"content":"314"}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(None).unwrap();
        let url = Url::parse(&format!(
            "{}/v1/pi?start=0&numberOfDigits=3",
            mock_server.uri()
        ))
        .unwrap();

        let body = transport.fetch(&url).await.unwrap();
        assert_eq!(body, br#"{"content":"314"}"#.to_vec());
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(None).unwrap();
        let url = Url::parse(&format!("{}/v1/pi", mock_server.uri())).unwrap();

        match transport.fetch(&url).await {
            Err(FetchError::HttpStatus { status, .. }) => assert_eq!(status, 503),
            other => panic!("expected HttpStatus error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Bind a free port, then release it so nothing listens there
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let transport = HttpTransport::new(Some(Duration::from_secs(2))).unwrap();
        let url = Url::parse(&format!("http://127.0.0.1:{}/v1/pi", port)).unwrap();

        let result = transport.fetch(&url).await;
        assert!(matches!(result, Err(FetchError::Network { .. })));
    }
}
