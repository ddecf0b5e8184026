use std::sync::Arc;
use std::time::Duration;

use sitemap_audit::{
    AggregateTable, AnalysisPhase, AnalyzerConfig, DocumentKind, HOMEPAGE_LABEL, OTHERS_LABEL,
    SitemapAnalyzer, SitemapError, TOTAL_ROW_LABEL,
};

use crate::common::mocks::{MockFailureType, MockFetcher};
use crate::common::test_helpers::{page, recording_callback, rss_feed, sitemap_index, urlset};

fn analyzer(fetcher: &MockFetcher, max_concurrent_fetches: usize) -> SitemapAnalyzer {
    SitemapAnalyzer::new(
        Arc::new(fetcher.clone()),
        AnalyzerConfig {
            max_concurrent_fetches,
        },
    )
}

/// Index with a posts sitemap (blog only) and a pages sitemap (mixed)
fn blog_site() -> (MockFetcher, String, String, String) {
    let fetcher = MockFetcher::new();
    let index = page("/sitemap_index.xml");
    let posts = page("/post-sitemap.xml");
    let pages = page("/page-sitemap.xml");

    fetcher.add_document(&index, sitemap_index(&[&posts, &pages]));
    fetcher.add_document(
        &posts,
        urlset(&[
            &page("/blog/first-post/"),
            &page("/blog/second-post/"),
            &page("/blog/third-post/"),
        ]),
    );
    fetcher.add_document(
        &pages,
        urlset(&[
            &page("/"),
            &page("/about"),
            &page("/news/2024/launch"),
            &page("/news/2024/update"),
            &page("/blog/"),
        ]),
    );

    (fetcher, index, posts, pages)
}

#[tokio::test]
async fn test_index_end_to_end() {
    let (fetcher, index, posts, pages) = blog_site();
    let analysis = analyzer(&fetcher, 1).analyze_index(&index).await.unwrap();

    assert_eq!(analysis.kind, DocumentKind::SitemapIndex);
    assert_eq!(analysis.report.len(), 2);
    assert_eq!(analysis.report.total_urls(), 8);

    let posts_report = analysis.report.get(&posts).unwrap();
    assert_eq!(posts_report.url_count, 3);
    assert_eq!(posts_report.directories.get("blog"), 3);

    let pages_report = analysis.report.get(&pages).unwrap();
    assert_eq!(pages_report.url_count, 5);
    assert_eq!(pages_report.directories.get(HOMEPAGE_LABEL), 1);
    assert_eq!(pages_report.directories.get(OTHERS_LABEL), 1);
    assert_eq!(pages_report.directories.get("news"), 2);
    assert_eq!(pages_report.directories.get("blog"), 1);

    assert_eq!(fetcher.requests(), vec![index, posts, pages]);
}

#[tokio::test]
async fn test_index_table_merges_counts() {
    let (fetcher, index, posts, pages) = blog_site();
    let analysis = analyzer(&fetcher, 1).analyze_index(&index).await.unwrap();
    let table = AggregateTable::build(&analysis.report);

    assert_eq!(table.columns, vec!["blog", HOMEPAGE_LABEL, OTHERS_LABEL, "news"]);
    assert_eq!(table.rows[0].sitemap, TOTAL_ROW_LABEL);
    assert_eq!(table.total_row().url_count, 8);
    assert_eq!(table.total_row().cells, vec![4, 1, 1, 2]);

    // pages (5 URLs) ranks above posts (3 URLs)
    assert_eq!(table.rows[1].sitemap, pages);
    assert_eq!(table.rows[2].sitemap, posts);
    assert_eq!(table.cell(&posts, "news"), 0);
    assert_eq!(table.cell(&pages, "blog"), 1);
}

#[tokio::test]
async fn test_concurrent_matches_sequential() {
    let (fetcher, index, posts, pages) = blog_site();
    // Slow down the first sitemap so it finishes last
    fetcher.add_delayed_document(
        &posts,
        urlset(&[
            &page("/blog/first-post/"),
            &page("/blog/second-post/"),
            &page("/blog/third-post/"),
        ]),
        Duration::from_millis(50),
    );

    let sequential = analyzer(&fetcher, 1).analyze_index(&index).await.unwrap();
    let concurrent = analyzer(&fetcher, 4).analyze_index(&index).await.unwrap();

    assert_eq!(sequential.report, concurrent.report);
    let order: Vec<&str> = concurrent.report.iter().map(|(loc, _)| loc).collect();
    assert_eq!(order, vec![posts.as_str(), pages.as_str()]);
}

#[tokio::test]
async fn test_child_failure_aborts_batch() {
    let fetcher = MockFetcher::new();
    let index = page("/sitemap.xml");
    let first = page("/first.xml");
    let broken = page("/broken.xml");
    let never = page("/never.xml");

    fetcher.add_document(&index, sitemap_index(&[&first, &broken, &never]));
    fetcher.add_document(&first, urlset(&[&page("/a/b")]));
    fetcher.add_failure(&broken, MockFailureType::Forbidden);
    fetcher.add_document(&never, urlset(&[&page("/c/d")]));

    let error = analyzer(&fetcher, 1)
        .analyze_index(&index)
        .await
        .unwrap_err();

    assert!(matches!(error, SitemapError::HttpStatus { status: 403, .. }));
    assert!(error.is_transport());
    assert!(!fetcher.requests().contains(&never));
}

#[tokio::test]
async fn test_concurrent_failure_is_reported() {
    let fetcher = MockFetcher::new();
    let index = page("/sitemap.xml");
    let ok = page("/ok.xml");
    let slow = page("/slow.xml");

    fetcher.add_document(&index, sitemap_index(&[&ok, &slow]));
    fetcher.add_document(&ok, urlset(&[&page("/a/b")]));
    fetcher.add_failure(&slow, MockFailureType::Timeout);

    let error = analyzer(&fetcher, 2)
        .analyze_index(&index)
        .await
        .unwrap_err();
    assert!(matches!(error, SitemapError::Timeout { .. }));
}

#[tokio::test]
async fn test_malformed_child_reports_its_url() {
    let fetcher = MockFetcher::new();
    let index = page("/sitemap.xml");
    let child = page("/child.xml");

    fetcher.add_document(&index, sitemap_index(&[&child]));
    fetcher.add_document(&child, "<urlset><url><loc>https://example.com/a</loc></url>");

    let error = analyzer(&fetcher, 1)
        .analyze_index(&index)
        .await
        .unwrap_err();

    assert!(error.is_parse());
    match error {
        SitemapError::Parse { url, .. } => assert_eq!(url, child),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_input_rejected_before_fetch() {
    let fetcher = MockFetcher::new();
    let analyzer = analyzer(&fetcher, 1);

    for input in ["", "   ", "not a url", "ftp://example.com/sitemap.xml"] {
        let error = analyzer.analyze_index(input).await.unwrap_err();
        assert!(matches!(error, SitemapError::InvalidInput(_)));

        let error = analyzer.analyze_sitemap(input).await.unwrap_err();
        assert!(matches!(error, SitemapError::InvalidInput(_)));
    }

    assert_eq!(fetcher.request_count(), 0);
}

#[tokio::test]
async fn test_unknown_root_yields_empty_report() {
    let fetcher = MockFetcher::new();
    let index = page("/feed.xml");
    fetcher.add_document(&index, rss_feed());

    let analysis = analyzer(&fetcher, 1).analyze_index(&index).await.unwrap();

    assert_eq!(analysis.kind, DocumentKind::Unknown("rss".to_string()));
    assert!(analysis.report.is_empty());
    assert_eq!(fetcher.request_count(), 1);

    let table = AggregateTable::build(&analysis.report);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.total_row().url_count, 0);
}

#[tokio::test]
async fn test_empty_index() {
    let fetcher = MockFetcher::new();
    let index = page("/sitemap.xml");
    fetcher.add_document(&index, sitemap_index(&[]));

    let analysis = analyzer(&fetcher, 1).analyze_index(&index).await.unwrap();
    assert_eq!(analysis.kind, DocumentKind::SitemapIndex);
    assert!(analysis.report.is_empty());
}

#[tokio::test]
async fn test_urlset_given_as_index_is_aggregated_directly() {
    let fetcher = MockFetcher::new();
    let url = page("/sitemap.xml");
    fetcher.add_document(&url, urlset(&[&page("/"), &page("/docs/intro"), &page("/docs/api")]));

    let analysis = analyzer(&fetcher, 1).analyze_index(&url).await.unwrap();

    assert_eq!(analysis.kind, DocumentKind::UrlSet);
    assert_eq!(analysis.report.len(), 1);
    let report = analysis.report.get(&url).unwrap();
    assert_eq!(report.url_count, 3);
    assert_eq!(report.directories.get("docs"), 2);
    assert_eq!(fetcher.request_count(), 1);
}

#[tokio::test]
async fn test_analyze_single_sitemap() {
    let fetcher = MockFetcher::new();
    let url = page("/page-sitemap.xml");
    fetcher.add_document(
        &url,
        urlset(&[&page("/"), &page("/contact"), &page("/shop/item-1"), &page("/shop/item-2")]),
    );

    let document = analyzer(&fetcher, 1).analyze_sitemap(&url).await.unwrap();
    assert_eq!(document.kind, DocumentKind::UrlSet);

    let report = document.report;
    assert_eq!(report.url_count, 4);
    assert_eq!(
        report.directory_rows(),
        vec![("shop", 2), (HOMEPAGE_LABEL, 1), (OTHERS_LABEL, 1)]
    );
    let rows: Vec<_> = report.url_rows(&url).collect();
    assert_eq!(rows[2].url, page("/shop/item-1"));
    assert_eq!(rows[2].directory, "shop");
}

#[tokio::test]
async fn test_resolve_index_lists_locations() {
    let (fetcher, index, posts, pages) = blog_site();
    let resolution = analyzer(&fetcher, 1).resolve_index(&index).await.unwrap();

    assert_eq!(resolution.kind, DocumentKind::SitemapIndex);
    assert_eq!(resolution.locations, vec![posts, pages]);
    assert_eq!(fetcher.request_count(), 1);
}

#[tokio::test]
async fn test_progress_events_sequential() {
    let (fetcher, index, posts, pages) = blog_site();
    let (callback, events) = recording_callback();

    analyzer(&fetcher, 1)
        .analyze_index_with_progress(&index, Some(callback))
        .await
        .unwrap();

    let events = events.lock().unwrap();
    let phases: Vec<AnalysisPhase> = events.iter().map(|e| e.phase).collect();
    assert_eq!(
        phases,
        vec![
            AnalysisPhase::ResolvingIndex,
            AnalysisPhase::Analyzing,
            AnalysisPhase::Analyzed,
            AnalysisPhase::Analyzing,
            AnalysisPhase::Analyzed,
            AnalysisPhase::Complete,
        ]
    );

    assert_eq!(events[0].current.as_deref(), Some(index.as_str()));
    assert_eq!(events[1].current.as_deref(), Some(posts.as_str()));
    assert_eq!(events[1].completed, 0);
    assert_eq!(events[1].total, 2);
    assert_eq!(events[3].current.as_deref(), Some(pages.as_str()));
    assert_eq!(events[4].completed, 2);
    assert_eq!(events[5].completed, 2);
}

#[tokio::test]
async fn test_progress_events_concurrent_complete_once() {
    let (fetcher, index, _, _) = blog_site();
    let (callback, events) = recording_callback();

    analyzer(&fetcher, 3)
        .analyze_index_with_progress(&index, Some(callback))
        .await
        .unwrap();

    let events = events.lock().unwrap();
    let analyzed = events
        .iter()
        .filter(|e| e.phase == AnalysisPhase::Analyzed)
        .count();
    assert_eq!(analyzed, 2);
    assert_eq!(events.last().map(|e| e.phase), Some(AnalysisPhase::Complete));
}

#[tokio::test]
async fn test_single_sitemap_reports_non_urlset_root() {
    let fetcher = MockFetcher::new();
    let feed = page("/feed.xml");
    let index = page("/sitemap_index.xml");
    fetcher.add_document(&feed, rss_feed());
    fetcher.add_document(&index, sitemap_index(&[&page("/posts.xml")]));
    let analyzer = analyzer(&fetcher, 1);

    let document = analyzer.analyze_sitemap(&feed).await.unwrap();
    assert_eq!(document.kind, DocumentKind::Unknown("rss".to_string()));
    assert_eq!(document.report.url_count, 0);

    let document = analyzer.analyze_sitemap(&index).await.unwrap();
    assert_eq!(document.kind, DocumentKind::SitemapIndex);
    assert_eq!(document.report.url_count, 0);

    // Only the documents themselves are fetched, never the listed sitemaps
    assert_eq!(fetcher.requests(), vec![feed, index]);
}
