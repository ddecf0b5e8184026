use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use serde_json::json;

use sitemap_audit::{
    AggregateTable, AnalysisMode, AnalysisPhase, AnalysisProgress, AsyncHttpClient, Cli, Config,
    DocumentKind, ErrorReporter, Output, OutputFormat, ProgressCallback, SitemapAnalyzer,
    SitemapError, export_url_csv, logging,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let config = Config::from_cli(&cli);
    logging::init_logging(config.verbosity());

    let reporter = ErrorReporter::new(config.verbosity());
    match run(&config, &reporter).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match error.downcast_ref::<SitemapError>() {
                Some(sitemap_error) => reporter.report_error(sitemap_error),
                None => eprintln!("Error: {:#}", error),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config, reporter: &ErrorReporter) -> anyhow::Result<()> {
    config.validate()?;
    SitemapAnalyzer::validate_input(&config.url)?;

    let client = AsyncHttpClient::new(config.http.clone())?;
    let analyzer = SitemapAnalyzer::new(Arc::new(client), config.analyzer.clone());
    let output = Output::new(config.verbosity());

    match config.mode {
        AnalysisMode::Index => run_index(config, reporter, &analyzer, &output).await,
        AnalysisMode::File => run_file(config, reporter, &analyzer, &output).await,
    }
}

async fn run_index(
    config: &Config,
    reporter: &ErrorReporter,
    analyzer: &SitemapAnalyzer,
    output: &Output,
) -> anyhow::Result<()> {
    let progress = config.progress.then(progress_printer);
    let analysis = analyzer
        .analyze_index_with_progress(&config.url, progress)
        .await?;

    if let DocumentKind::Unknown(root) = &analysis.kind {
        reporter.report_warning(&output.format_unknown_format(root));
    }

    let table = AggregateTable::build(&analysis.report);
    match config.format {
        OutputFormat::Human => {
            print!("{}", output.format_index_summary(&analysis.report, &table));
            print!(
                "{}",
                output.format_url_preview(analysis.report.url_rows(), config.preview_rows, true)
            );
        }
        OutputFormat::Json => {
            let document = json!({
                "sitemap_index": config.url,
                "kind": analysis.kind,
                "total_urls": analysis.report.total_urls(),
                "table": table,
                "sitemaps": analysis.report,
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    if let Some(path) = &config.csv_path {
        let written = export_url_csv(path, analysis.report.url_rows(), true)
            .with_context(|| format!("exporting URLs to {}", path.display()))?;
        eprintln!("Wrote {} URLs to {}", written, path.display());
    }

    Ok(())
}

async fn run_file(
    config: &Config,
    reporter: &ErrorReporter,
    analyzer: &SitemapAnalyzer,
    output: &Output,
) -> anyhow::Result<()> {
    let document = analyzer.analyze_sitemap(&config.url).await?;
    if let Some(message) = output.format_not_a_urlset(&document.kind) {
        reporter.report_warning(&message);
    }
    let report = document.report;

    match config.format {
        OutputFormat::Human => {
            print!("{}", output.format_sitemap_summary(&report));
            print!(
                "{}",
                output.format_url_preview(report.url_rows(&config.url), config.preview_rows, false)
            );
        }
        OutputFormat::Json => {
            let summary = json!({
                "sitemap": config.url,
                "kind": document.kind,
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    if let Some(path) = &config.csv_path {
        let written = export_url_csv(path, report.url_rows(&config.url), false)
            .with_context(|| format!("exporting URLs to {}", path.display()))?;
        eprintln!("Wrote {} URLs to {}", written, path.display());
    }

    Ok(())
}

fn progress_printer() -> ProgressCallback {
    Arc::new(|progress: AnalysisProgress| match progress.phase {
        AnalysisPhase::ResolvingIndex => {
            if let Some(url) = progress.current {
                eprintln!("Reading sitemap index: {}", url);
            }
        }
        AnalysisPhase::Analyzing => {
            if let Some(url) = progress.current {
                eprintln!(
                    "({}/{}) Now Analyzing: {}",
                    progress.completed + 1,
                    progress.total,
                    url
                );
            }
        }
        AnalysisPhase::Analyzed => {}
        AnalysisPhase::Complete => eprintln!("Analysis Complete"),
    })
}
