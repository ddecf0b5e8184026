//! XML fixture builders shared by the integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use sitemap_audit::{AnalysisProgress, ProgressCallback};

pub const BASE_URL: &str = "https://example.com";

/// A `<sitemapindex>` listing the given sitemap locations
pub fn sitemap_index(locations: &[&str]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for location in locations {
        xml.push_str(&format!(
            "  <sitemap>\n    <loc>{}</loc>\n    <lastmod>2024-01-01</lastmod>\n  </sitemap>\n",
            location
        ));
    }
    xml.push_str("</sitemapindex>\n");
    xml
}

/// A `<urlset>` listing the given page URLs
pub fn urlset(urls: &[&str]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for url in urls {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <changefreq>daily</changefreq>\n  </url>\n",
            url
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

/// A document whose root is neither an index nor a urlset
pub fn rss_feed() -> String {
    "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel><title>Feed</title></channel></rss>"
        .to_string()
}

/// Absolute URL on the fixture host
pub fn page(path: &str) -> String {
    format!("{}{}", BASE_URL, path)
}

/// Progress callback that records every event it receives
pub fn recording_callback() -> (ProgressCallback, Arc<Mutex<Vec<AnalysisProgress>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let callback: ProgressCallback = Arc::new(move |progress: AnalysisProgress| {
        sink.lock().unwrap().push(progress);
    });
    (callback, events)
}
