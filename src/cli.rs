use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::analyzer::AnalyzerConfig;
use crate::error::{Result, SitemapError};
use crate::http_client::{DEFAULT_USER_AGENT, HttpClientConfig, default_headers};

/// Number of URL rows shown on screen before truncating
pub const DEFAULT_PREVIEW_ROWS: usize = 200;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum VerbosityLevel {
    /// Only show critical errors
    Quiet,
    /// Show standard information
    #[default]
    Normal,
    /// Show detailed information
    Verbose,
}

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
}

/// What kind of document the user points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// A sitemap index listing child sitemaps
    Index,
    /// A single sitemap file
    File,
}

/// Main application configuration derived from CLI
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mode: AnalysisMode,
    pub url: String,
    pub csv_path: Option<PathBuf>,
    pub preview_rows: usize,
    pub format: OutputFormat,
    pub verbose: bool,
    pub quiet: bool,
    pub progress: bool,
    pub http: HttpClientConfig,
    pub analyzer: AnalyzerConfig,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let (mode, target) = match &cli.command {
            Command::Index(target) => (AnalysisMode::Index, target),
            Command::File(target) => (AnalysisMode::File, target),
        };

        Self {
            mode,
            url: target.url.trim().to_string(),
            csv_path: cli.csv.clone(),
            preview_rows: cli.preview_rows,
            format: cli.format,
            verbose: cli.verbose,
            quiet: cli.quiet,
            progress: cli.progress && !cli.quiet,
            http: HttpClientConfig {
                timeout_seconds: cli.timeout,
                max_redirects: cli.max_redirects,
                user_agent: cli
                    .user_agent
                    .clone()
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                headers: default_headers(),
            },
            analyzer: AnalyzerConfig {
                max_concurrent_fetches: cli.concurrency,
            },
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Reject settings that cannot produce a run
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_seconds == 0 {
            return Err(SitemapError::Config(
                "Timeout must be greater than 0".to_string(),
            ));
        }
        if self.analyzer.max_concurrent_fetches == 0 {
            return Err(SitemapError::Config(
                "Concurrency must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sitemap coverage and structure auditing tool
#[derive(Parser, Debug, Clone)]
#[command(name = "sitemap-audit")]
#[command(about = "Count sitemap URLs by top-level directory")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Export every URL to a CSV file
    #[arg(long = "csv", global = true, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Number of URL rows shown before truncating the listing
    #[arg(long = "preview-rows", global = true, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub preview_rows: usize,

    /// Output format
    #[arg(long = "format", global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout", global = true, default_value = "30")]
    pub timeout: u64,

    /// Maximum number of HTTP redirects to follow
    #[arg(long = "max-redirects", global = true, default_value = "10")]
    pub max_redirects: usize,

    /// Override the browser-like User-Agent header
    #[arg(long = "user-agent", global = true)]
    pub user_agent: Option<String>,

    /// Number of child sitemaps fetched at once
    #[arg(long = "concurrency", global = true, default_value = "1")]
    pub concurrency: usize,

    /// Show progress indicators
    #[arg(long = "progress", global = true)]
    pub progress: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze a sitemap index and every sitemap it lists
    Index(Target),
    /// Analyze a single sitemap file
    File(Target),
}

#[derive(clap::Args, Debug, Clone)]
pub struct Target {
    /// URL of the sitemap index or sitemap
    pub url: String,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
