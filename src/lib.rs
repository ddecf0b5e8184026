//! # sitemap-audit Library
//!
//! Fetches sitemap and sitemap index documents, counts their URLs by
//! top-level directory, and merges per-sitemap counts into a summary table.

pub mod analyzer;
pub mod cli;
pub mod directory;
pub mod error;
pub mod error_reporter;
pub mod export;
pub mod http_client;
pub mod logging;
pub mod output;
pub mod report;
pub mod sitemap;

pub use analyzer::{
    AnalysisPhase, AnalysisProgress, AnalyzerConfig, IndexAnalysis, ProgressCallback,
    SitemapAnalyzer,
};
pub use cli::{AnalysisMode, Cli, Config, OutputFormat, VerbosityLevel};
pub use directory::{DirectoryCounts, HOMEPAGE_LABEL, OTHERS_LABEL, classify_path, classify_url};
pub use error::{Result, SitemapError};
pub use error_reporter::ErrorReporter;
pub use export::{export_url_csv, write_url_csv};
pub use http_client::{AsyncHttpClient, HttpClientConfig, SitemapFetcher};
pub use output::Output;
pub use report::{
    AggregateTable, IndexReport, SitemapReport, TOTAL_ROW_LABEL, TableRow, UrlEntry, UrlRow,
};
pub use sitemap::{
    DocumentKind, LocationResolution, SitemapDocument, aggregate_document, aggregate_sitemap,
    resolve_locations,
};
