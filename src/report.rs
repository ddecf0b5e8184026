//! Sitemap reports and the consolidated index table
//!
//! A [`SitemapReport`] holds the result of aggregating one sitemap. An
//! [`IndexReport`] keeps one report per child sitemap in index order, and
//! [`AggregateTable`] merges them into rows and label columns with a
//! synthetic `TOTAL` row.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::directory::{DirectoryCounts, classify_url};

/// Row label of the column-sum row in an [`AggregateTable`]
pub const TOTAL_ROW_LABEL: &str = "TOTAL";

/// A single URL extracted from a `<url><loc>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlEntry {
    /// URL text as it appears in the sitemap
    pub url: String,
    /// Top-level directory label
    pub directory: String,
}

impl UrlEntry {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let directory = classify_url(&url);
        Self { url, directory }
    }
}

/// Aggregated contents of one sitemap document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SitemapReport {
    /// Number of `<url>` elements that carried a `<loc>`
    pub url_count: usize,
    /// URL count per top-level directory label
    pub directories: DirectoryCounts,
    /// Every URL in document order
    pub urls: Vec<UrlEntry>,
}

impl SitemapReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a URL, classifying it and updating the counts.
    pub fn push_url(&mut self, url: impl Into<String>) {
        let entry = UrlEntry::new(url);
        self.directories.increment(&entry.directory);
        self.urls.push(entry);
        self.url_count += 1;
    }

    /// Rows for a single-sitemap breakdown, most populated label first
    pub fn directory_rows(&self) -> Vec<(&str, usize)> {
        self.directories.sorted_by_count()
    }

    /// Flat listing of this sitemap's URLs, attributed to `sitemap`
    pub fn url_rows<'a>(&'a self, sitemap: &'a str) -> impl Iterator<Item = UrlRow<'a>> {
        self.urls.iter().map(move |entry| UrlRow {
            sitemap,
            url: entry.url.as_str(),
            directory: entry.directory.as_str(),
        })
    }
}

impl<S: Into<String>> FromIterator<S> for SitemapReport {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut report = SitemapReport::new();
        for url in iter {
            report.push_url(url);
        }
        report
    }
}

/// One row of the flat URL listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlRow<'a> {
    pub sitemap: &'a str,
    pub url: &'a str,
    pub directory: &'a str,
}

/// Reports for every child sitemap of an index, keyed by sitemap location.
///
/// Keys keep insertion order. Inserting a location that is already present
/// replaces its report in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    entries: Vec<(String, SitemapReport)>,
}

impl IndexReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: impl Into<String>, report: SitemapReport) {
        let location = location.into();
        match self.entries.iter_mut().find(|(loc, _)| *loc == location) {
            Some((_, existing)) => *existing = report,
            None => self.entries.push((location, report)),
        }
    }

    pub fn get(&self, location: &str) -> Option<&SitemapReport> {
        self.entries
            .iter()
            .find(|(loc, _)| loc == location)
            .map(|(_, report)| report)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SitemapReport)> {
        self.entries
            .iter()
            .map(|(loc, report)| (loc.as_str(), report))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total URLs across all sitemaps
    pub fn total_urls(&self) -> usize {
        self.entries.iter().map(|(_, report)| report.url_count).sum()
    }

    /// Flat listing of every URL, index order then document order
    pub fn url_rows(&self) -> impl Iterator<Item = UrlRow<'_>> {
        self.entries
            .iter()
            .flat_map(|(sitemap, report)| report.url_rows(sitemap))
    }
}

impl<S: Into<String>> FromIterator<(S, SitemapReport)> for IndexReport {
    fn from_iter<I: IntoIterator<Item = (S, SitemapReport)>>(iter: I) -> Self {
        let mut index = IndexReport::new();
        for (location, report) in iter {
            index.insert(location, report);
        }
        index
    }
}

impl Serialize for IndexReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (location, report) in &self.entries {
            map.serialize_entry(location, report)?;
        }
        map.end()
    }
}

/// One row of the consolidated index table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// Sitemap location, or [`TOTAL_ROW_LABEL`]
    pub sitemap: String,
    pub url_count: usize,
    /// Counts aligned with [`AggregateTable::columns`]
    pub cells: Vec<usize>,
}

impl TableRow {
    pub fn is_total(&self) -> bool {
        self.sitemap == TOTAL_ROW_LABEL
    }
}

/// Per-sitemap URL counts broken down by directory label.
///
/// Columns are the union of labels across all sitemaps in first-observed
/// order. The `TOTAL` row is always first; the remaining rows follow by
/// descending URL count, ties keeping index order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateTable {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl AggregateTable {
    pub fn build(index: &IndexReport) -> Self {
        let mut union = DirectoryCounts::new();
        for (_, report) in index.iter() {
            for (label, count) in report.directories.iter() {
                union.add(label, count);
            }
        }
        let columns: Vec<String> = union.labels().map(str::to_string).collect();

        let mut rows: Vec<TableRow> = index
            .iter()
            .map(|(location, report)| TableRow {
                sitemap: location.to_string(),
                url_count: report.url_count,
                cells: columns
                    .iter()
                    .map(|label| report.directories.get(label))
                    .collect(),
            })
            .collect();
        rows.sort_by(|a, b| b.url_count.cmp(&a.url_count));

        let total = TableRow {
            sitemap: TOTAL_ROW_LABEL.to_string(),
            url_count: index.total_urls(),
            cells: columns.iter().map(|label| union.get(label)).collect(),
        };
        rows.insert(0, total);

        Self { columns, rows }
    }

    pub fn total_row(&self) -> &TableRow {
        &self.rows[0]
    }

    /// Sitemap rows without the `TOTAL` row
    pub fn sitemap_rows(&self) -> &[TableRow] {
        &self.rows[1..]
    }

    /// Cell for `sitemap` and `label`, zero when either is absent
    pub fn cell(&self, sitemap: &str, label: &str) -> usize {
        let Some(column) = self.columns.iter().position(|c| c == label) else {
            return 0;
        };
        self.rows
            .iter()
            .find(|row| row.sitemap == sitemap)
            .map(|row| row.cells[column])
            .unwrap_or(0)
    }
}
