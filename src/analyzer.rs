//! Sitemap Analysis Workflow
//!
//! Sequences the fetch and parse steps for a single sitemap or a sitemap
//! index. Child sitemaps of an index are processed one at a time by default.
//! A concurrency limit above one fetches them in parallel behind a semaphore,
//! but results are always collected in index order so the report matches a
//! sequential run. The first failure aborts the whole batch.

use futures::future::try_join_all;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::Semaphore;
use url::Url;

use crate::error::{Result, SitemapError};
use crate::http_client::SitemapFetcher;
use crate::report::{IndexReport, SitemapReport};
use crate::sitemap::{
    DocumentKind, LocationResolution, SitemapDocument, aggregate_document, aggregate_sitemap,
    resolve_locations,
};

/// Analyzer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Number of child sitemaps fetched at once; 1 means sequential
    pub max_concurrent_fetches: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 1,
        }
    }
}

/// Phase of an analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    /// Fetching and reading the index document
    ResolvingIndex,
    /// A sitemap fetch has started
    Analyzing,
    /// A sitemap has been fetched and aggregated
    Analyzed,
    /// All sitemaps are done
    Complete,
}

/// Progress update for an analysis run
#[derive(Debug, Clone)]
pub struct AnalysisProgress {
    /// Sitemap currently being processed
    pub current: Option<String>,
    /// Number of sitemaps completed
    pub completed: usize,
    /// Total number of sitemaps to process
    pub total: usize,
    pub phase: AnalysisPhase,
}

/// Progress callback type for analysis updates
pub type ProgressCallback = Arc<dyn Fn(AnalysisProgress) + Send + Sync>;

/// Result of analyzing a sitemap index
#[derive(Debug, Clone, Serialize)]
pub struct IndexAnalysis {
    /// Root element kind of the index document
    pub kind: DocumentKind,
    /// One report per child sitemap, in index order
    pub report: IndexReport,
}

/// Fetches sitemap documents and turns them into reports
pub struct SitemapAnalyzer {
    fetcher: Arc<dyn SitemapFetcher>,
    config: AnalyzerConfig,
}

impl SitemapAnalyzer {
    pub fn new(fetcher: Arc<dyn SitemapFetcher>, config: AnalyzerConfig) -> Self {
        Self { fetcher, config }
    }

    /// Check a user-supplied URL before any network call.
    pub fn validate_input(url: &str) -> Result<String> {
        let url = url.trim();
        if url.is_empty() {
            return Err(SitemapError::InvalidInput(
                "Please enter a valid sitemap URL".to_string(),
            ));
        }

        let parsed = Url::parse(url)
            .map_err(|e| SitemapError::InvalidInput(format!("'{}' is not a URL: {}", url, e)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(url.to_string()),
            scheme => Err(SitemapError::InvalidInput(format!(
                "Unsupported URL scheme '{}': expected http or https",
                scheme
            ))),
        }
    }

    /// Fetch and aggregate a single sitemap, keeping its root element kind
    pub async fn analyze_sitemap(&self, url: &str) -> Result<SitemapDocument> {
        let url = Self::validate_input(url)?;
        let body = self.fetcher.fetch(&url).await?;
        let document = aggregate_document(&body).map_err(|e| e.with_url(&url))?;
        tracing::debug!(url, urls = document.report.url_count, "aggregated sitemap");
        Ok(document)
    }

    /// Fetch a document and list its `<loc>` entries
    pub async fn resolve_index(&self, url: &str) -> Result<LocationResolution> {
        let url = Self::validate_input(url)?;
        let body = self.fetcher.fetch(&url).await?;
        resolve_locations(&body).map_err(|e| e.with_url(&url))
    }

    /// Analyze every sitemap listed in an index
    pub async fn analyze_index(&self, url: &str) -> Result<IndexAnalysis> {
        self.analyze_index_with_progress(url, None).await
    }

    /// Analyze every sitemap listed in an index with progress tracking.
    ///
    /// When the document turns out to be a plain `urlset`, it is aggregated
    /// directly as the only sitemap instead of fetching each page it lists.
    pub async fn analyze_index_with_progress(
        &self,
        url: &str,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<IndexAnalysis> {
        let url = Self::validate_input(url)?;

        if let Some(ref callback) = progress_callback {
            callback(AnalysisProgress {
                current: Some(url.clone()),
                completed: 0,
                total: 0,
                phase: AnalysisPhase::ResolvingIndex,
            });
        }

        let body = self.fetcher.fetch(&url).await?;
        let resolution = resolve_locations(&body).map_err(|e| e.with_url(&url))?;
        tracing::info!(
            url = %url,
            kind = ?resolution.kind,
            sitemaps = resolution.locations.len(),
            "resolved sitemap index"
        );

        let report: IndexReport = match resolution.kind {
            DocumentKind::UrlSet => {
                let sitemap = aggregate_sitemap(&body).map_err(|e| e.with_url(&url))?;
                [(url.clone(), sitemap)].into_iter().collect()
            }
            _ if self.config.max_concurrent_fetches <= 1 => {
                self.analyze_sequential(&resolution.locations, &progress_callback)
                    .await?
            }
            _ => {
                self.analyze_concurrent(&resolution.locations, &progress_callback)
                    .await?
            }
        };

        if let Some(ref callback) = progress_callback {
            callback(AnalysisProgress {
                current: None,
                completed: report.len(),
                total: report.len(),
                phase: AnalysisPhase::Complete,
            });
        }

        Ok(IndexAnalysis {
            kind: resolution.kind,
            report,
        })
    }

    async fn analyze_sequential(
        &self,
        locations: &[String],
        progress_callback: &Option<ProgressCallback>,
    ) -> Result<IndexReport> {
        let total = locations.len();
        let mut report = IndexReport::new();

        for (idx, location) in locations.iter().enumerate() {
            notify(progress_callback, location, idx, total, AnalysisPhase::Analyzing);
            let sitemap = self.fetch_and_aggregate(location).await?;
            report.insert(location.clone(), sitemap);
            notify(progress_callback, location, idx + 1, total, AnalysisPhase::Analyzed);
        }

        Ok(report)
    }

    async fn analyze_concurrent(
        &self,
        locations: &[String],
        progress_callback: &Option<ProgressCallback>,
    ) -> Result<IndexReport> {
        let total = locations.len();
        let completed = AtomicUsize::new(0);
        let semaphore = Semaphore::new(self.config.max_concurrent_fetches);

        let tasks = locations.iter().map(|location| {
            let completed = &completed;
            let semaphore = &semaphore;
            async move {
                let _permit = semaphore.acquire().await.map_err(|_| SitemapError::Concurrency {
                    details: "Failed to acquire fetch semaphore".to_string(),
                })?;

                let started = completed.load(Ordering::SeqCst);
                notify(progress_callback, location, started, total, AnalysisPhase::Analyzing);

                let sitemap = self.fetch_and_aggregate(location).await?;

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                notify(progress_callback, location, done, total, AnalysisPhase::Analyzed);

                Ok::<(String, SitemapReport), SitemapError>((location.clone(), sitemap))
            }
        });

        let results = try_join_all(tasks).await?;
        Ok(results.into_iter().collect())
    }

    async fn fetch_and_aggregate(&self, url: &str) -> Result<SitemapReport> {
        let body = self.fetcher.fetch(url).await?;
        let report = aggregate_sitemap(&body).map_err(|e| e.with_url(url))?;
        tracing::debug!(url, urls = report.url_count, "aggregated sitemap");
        Ok(report)
    }
}

fn notify(
    progress_callback: &Option<ProgressCallback>,
    location: &str,
    completed: usize,
    total: usize,
    phase: AnalysisPhase,
) {
    if let Some(callback) = progress_callback {
        callback(AnalysisProgress {
            current: Some(location.to_string()),
            completed,
            total,
            phase,
        });
    }
}
