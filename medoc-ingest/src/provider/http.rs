//! HTTP metadata service client
//!
//! `GET <base_url>/title/<id>?info=<facet,facet,...>` returning one title
//! entity in the provider wire format. Requests are paced by a shared
//! governor limiter so all workers together respect the service's quota.

use super::{decode_payload, FetchError, MetadataProvider};
use crate::models::{FacetSet, RawObject};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::StatusCode;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("medoc-ingest/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Requests per second when none is configured
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 5;

pub struct HttpProvider {
    client: reqwest::Client,
    base_url: String,
    rate_limiter: DefaultDirectRateLimiter,
}

impl HttpProvider {
    pub fn new(base_url: impl Into<String>, requests_per_second: u32) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        // Zero would disable pacing entirely; clamp to one request per second
        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: RateLimiter::direct(Quota::per_second(rate)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn title_url(&self, id: &str) -> String {
        format!("{}/title/{}", self.base_url, id)
    }
}

#[async_trait]
impl MetadataProvider for HttpProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, id: &str, facets: &FacetSet) -> Result<RawObject, FetchError> {
        self.rate_limiter.until_ready().await;

        let url = self.title_url(id);
        debug!(id = %id, url = %url, facets = %facets, "Querying metadata service");

        let response = self
            .client
            .get(&url)
            .query(&[("info", facets.to_query())])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(id.to_string()));
        }

        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(FetchError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FetchError::Api(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        decode_payload(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityKind;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned response; the handle yields the request line
    async fn spawn_one_shot_http(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request_buf = [0u8; 2048];
            let n = stream.read(&mut request_buf).await.unwrap();
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.flush().await;

            let request = String::from_utf8_lossy(&request_buf[..n]).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });

        (format!("http://{addr}"), handle)
    }

    #[tokio::test]
    async fn test_fetch_success_sends_facets() {
        let (url, server) =
            spawn_one_shot_http("200 OK", r#"{"$kind": "movie", "$id": "0133093", "title": "The Matrix"}"#).await;
        let provider = HttpProvider::new(format!("{url}/"), 10).unwrap();

        let movie = provider
            .fetch("0133093", &FacetSet::with_extras(["plot"]))
            .await
            .unwrap();
        assert_eq!(movie.kind, EntityKind::Movie);
        assert_eq!(movie.id, "0133093");

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /title/0133093?info=main%2Cplot "));
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let (url, _server) = spawn_one_shot_http("404 Not Found", "").await;
        let provider = HttpProvider::new(url, 10).unwrap();

        let err = provider.fetch("9999999", &FacetSet::base()).await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(id) if id == "9999999"));
    }

    #[tokio::test]
    async fn test_fetch_rate_limited() {
        let (url, _server) = spawn_one_shot_http("429 Too Many Requests", "").await;
        let provider = HttpProvider::new(url, 10).unwrap();

        let err = provider.fetch("0133093", &FacetSet::base()).await.unwrap_err();
        assert!(matches!(err, FetchError::RateLimitExceeded));
    }

    #[tokio::test]
    async fn test_fetch_server_error_keeps_body() {
        let (url, _server) = spawn_one_shot_http("500 Internal Server Error", "boom").await;
        let provider = HttpProvider::new(url, 10).unwrap();

        let err = provider.fetch("0133093", &FacetSet::base()).await.unwrap_err();
        assert!(matches!(err, FetchError::Api(500, body) if body == "boom"));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let (url, _server) = spawn_one_shot_http("200 OK", "[1, 2, 3]").await;
        let provider = HttpProvider::new(url, 10).unwrap();

        let err = provider.fetch("0133093", &FacetSet::base()).await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = HttpProvider::new(format!("http://{addr}"), 10).unwrap();
        let err = provider.fetch("0133093", &FacetSet::base()).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }

    #[test]
    fn test_zero_rate_is_clamped() {
        let provider = HttpProvider::new("http://localhost:1", 0).unwrap();
        assert_eq!(provider.base_url(), "http://localhost:1");
    }
}
