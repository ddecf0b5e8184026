use thiserror::Error;

/// Main error type for sitemap fetching and analysis
#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status error: {status} for {url} - {message}")]
    HttpStatus {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Request timeout: {url} after {timeout_seconds} seconds")]
    Timeout { url: String, timeout_seconds: u64 },

    #[error("XML parsing error: {url} - {details}")]
    Parse { url: String, details: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Concurrent operation error: {details}")]
    Concurrency { details: String },
}

impl SitemapError {
    /// Network or HTTP failure while fetching a document
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SitemapError::Http(_) | SitemapError::HttpStatus { .. } | SitemapError::Timeout { .. }
        )
    }

    /// Malformed or non-well-formed XML
    pub fn is_parse(&self) -> bool {
        matches!(self, SitemapError::Parse { .. })
    }

    /// Attach the document location to a parse error raised on raw bytes.
    pub fn with_url(self, url: &str) -> Self {
        match self {
            SitemapError::Parse { details, .. } => SitemapError::Parse {
                url: url.to_string(),
                details,
            },
            other => other,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SitemapError>;
