use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sitemap_audit::{Result, SitemapError, SitemapFetcher};

/// Mock fetcher for testing analysis workflows without network calls
#[derive(Clone)]
pub struct MockFetcher {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    request_log: Arc<Mutex<Vec<String>>>,
}

#[derive(Clone, Debug)]
pub struct MockResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub delay: Option<Duration>,
    pub failure_type: Option<MockFailureType>,
}

#[derive(Clone, Debug)]
pub enum MockFailureType {
    Timeout,
    Forbidden,
}

#[allow(dead_code)]
impl MockFetcher {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            request_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_response(&self, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    pub fn add_document(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.add_response(
            url,
            MockResponse {
                status: 200,
                body: body.into(),
                delay: None,
                failure_type: None,
            },
        );
    }

    pub fn add_delayed_document(&self, url: &str, body: impl Into<Vec<u8>>, delay: Duration) {
        self.add_response(
            url,
            MockResponse {
                status: 200,
                body: body.into(),
                delay: Some(delay),
                failure_type: None,
            },
        );
    }

    pub fn add_failure(&self, url: &str, failure_type: MockFailureType) {
        self.add_response(
            url,
            MockResponse {
                status: 0,
                body: Vec::new(),
                delay: None,
                failure_type: Some(failure_type),
            },
        );
    }

    pub fn requests(&self) -> Vec<String> {
        self.request_log.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.request_log.lock().unwrap().len()
    }
}

#[async_trait]
impl SitemapFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.request_log.lock().unwrap().push(url.to_string());

        let response = self.responses.lock().unwrap().get(url).cloned();
        let Some(response) = response else {
            return Err(SitemapError::HttpStatus {
                url: url.to_string(),
                status: 404,
                message: "HTTP 404: Not Found".to_string(),
            });
        };

        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }

        match response.failure_type {
            Some(MockFailureType::Timeout) => Err(SitemapError::Timeout {
                url: url.to_string(),
                timeout_seconds: 30,
            }),
            Some(MockFailureType::Forbidden) => Err(SitemapError::HttpStatus {
                url: url.to_string(),
                status: 403,
                message: "HTTP 403: Forbidden".to_string(),
            }),
            None => Ok(response.body),
        }
    }
}
