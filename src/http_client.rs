use crate::error::{Result, SitemapError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, redirect};
use std::time::Duration;
use tokio::time::timeout;

/// Browser-like user agent; some sites reject unknown clients outright
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/79.0.3945.130 Safari/537.36";

/// Configuration for the HTTP client
#[derive(Debug, Clone, PartialEq)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Maximum number of redirects to follow
    pub max_redirects: usize,
    /// User agent string
    pub user_agent: String,
    /// Extra headers sent with every request
    pub headers: Vec<(String, String)>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_redirects: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: default_headers(),
        }
    }
}

/// Conventional browser request headers.
///
/// `Accept-Encoding` is left to reqwest so gzip bodies are decoded transparently.
pub fn default_headers() -> Vec<(String, String)> {
    [
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
        ("Cache-Control", "no-cache"),
        ("Pragma", "no-cache"),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect()
}

/// Source of raw sitemap documents
#[async_trait]
pub trait SitemapFetcher: Send + Sync {
    /// Fetch the document at `url` and return its body bytes
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Async HTTP client for downloading sitemap documents
pub struct AsyncHttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl AsyncHttpClient {
    /// Create a new async HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .default_headers(build_header_map(&config.headers)?)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .gzip(true)
            .build()
            .map_err(SitemapError::from)?;

        Ok(Self { client, config })
    }

    /// Download a document, failing on any non-success status
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "fetching sitemap document");

        let response = self.make_request(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SitemapError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                message: format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.map_error(url, e))?;
        tracing::debug!(url, bytes = bytes.len(), "fetched sitemap document");
        Ok(bytes.to_vec())
    }

    /// Make a single HTTP request with timeout
    async fn make_request(&self, url: &str) -> Result<Response> {
        let request_future = self.client.get(url).send();

        timeout(
            Duration::from_secs(self.config.timeout_seconds),
            request_future,
        )
        .await
        .map_err(|_| SitemapError::Timeout {
            url: url.to_string(),
            timeout_seconds: self.config.timeout_seconds,
        })?
        .map_err(|e| self.map_error(url, e))
    }

    fn map_error(&self, url: &str, error: reqwest::Error) -> SitemapError {
        if error.is_timeout() {
            SitemapError::Timeout {
                url: url.to_string(),
                timeout_seconds: self.config.timeout_seconds,
            }
        } else {
            SitemapError::Http(error)
        }
    }
}

#[async_trait]
impl SitemapFetcher for AsyncHttpClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.download(url).await
    }
}

fn build_header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| SitemapError::Config(format!("Invalid header name '{}': {}", name, e)))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            SitemapError::Config(format!("Invalid value for header '{}': {}", name, e))
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
