//! Shared HTTP client for provider backends.
//!
//! Features:
//! - HTTP/2 when the server negotiates it, HTTP/1.1 otherwise
//! - TLS 1.3 via rustls
//! - Brotli, Zstd, Gzip compression (auto-negotiated)
//! - Connection pooling with keep-alive
//! - Non-success status codes surfaced as [`Error::Http`]

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("radioscout/", env!("CARGO_PKG_VERSION"));

/// HTTP client shared by providers.
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with the default user agent and timeout.
    pub fn new() -> Result<Self> {
        Self::with_settings(DEFAULT_USER_AGENT, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a specific user agent and request timeout.
    pub fn with_settings(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            // Let the server negotiate HTTP/2
            .http2_adaptive_window(true)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .brotli(true)
            .zstd(true)
            .gzip(true)
            .deflate(true)
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(Error::ClientBuild)?;

        Ok(Self { client })
    }

    /// Send a GET request and fail on non-success status codes.
    #[instrument(skip(self, query), fields(url = %url))]
    pub async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<Response> {
        debug!("Fetching");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| Error::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        debug!(status = %status, version = ?response.version(), "Response received");

        if !status.is_success() {
            return Err(Error::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// Fetch and return the body as a string.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.fetch(url, &[]).await?;
        response.text().await.map_err(|source| Error::Network {
            url: url.to_string(),
            source,
        })
    }

    /// Fetch with query parameters and decode the body as JSON.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let body = self
            .fetch(url, query)
            .await?
            .text()
            .await
            .map_err(|source| Error::Network {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|e| Error::Parse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Get the underlying reqwest client
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve `response` verbatim to every connection on a local port.
    async fn serve(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    #[test]
    fn builds_with_custom_settings() {
        let client = HttpClient::with_settings("radioscout-test/1.0", Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn default_user_agent_carries_version() {
        assert!(DEFAULT_USER_AGENT.starts_with("radioscout/"));
        assert!(DEFAULT_USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let client = HttpClient::with_settings("radioscout-test/1.0", Duration::from_secs(2))
            .unwrap();
        let err = client
            .fetch_text("http://127.0.0.1:9/unreachable")
            .await
            .unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let base = serve("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
            .await;
        let client = HttpClient::new().unwrap();

        let err = client
            .fetch_text(&format!("{base}/live/missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http { status: 404, .. }));
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn json_body_is_decoded() {
        let base = serve(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 11\r\nConnection: close\r\n\r\n{\"ok\":true}",
        )
        .await;
        let client = HttpClient::new().unwrap();

        let value: serde_json::Value = client
            .fetch_json(&format!("{base}/search"), &[("keywords", "jazz".to_string())])
            .await
            .unwrap();
        assert_eq!(value["ok"], serde_json::Value::Bool(true));
    }

    #[tokio::test]
    async fn invalid_json_is_parse_error() {
        let base = serve(
            "HTTP/1.1 200 OK\r\nContent-Length: 8\r\nConnection: close\r\n\r\nnot json",
        )
        .await;
        let client = HttpClient::new().unwrap();

        let err = client
            .fetch_json::<serde_json::Value>(&format!("{base}/search"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
