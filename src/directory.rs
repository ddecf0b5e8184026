//! Top-level directory classification
//!
//! Every URL found in a sitemap is assigned exactly one label derived from
//! its path: `Homepage` for the site root, `Others` for single-segment pages,
//! and otherwise the first path segment.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use url::Url;

/// Label for URLs whose path is empty or `/`
pub const HOMEPAGE_LABEL: &str = "Homepage";

/// Label for URLs with exactly one path segment, e.g. `/about`
pub const OTHERS_LABEL: &str = "Others";

/// Derive the top-level directory label for a URL.
pub fn classify_url(url: &str) -> String {
    classify_path(&extract_path(url))
}

/// Derive the top-level directory label for a URL path.
pub fn classify_path(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return HOMEPAGE_LABEL.to_string();
    }

    let parts: Vec<&str> = path.split('/').collect();
    match parts.as_slice() {
        [_, first, _, ..] => (*first).to_string(),
        // `/page`, or a bare relative segment such as `page.html`
        _ => OTHERS_LABEL.to_string(),
    }
}

/// Path component of a URL, without query or fragment.
///
/// Absolute URLs go through the `url` parser. Anything it rejects is split
/// generically so relative or odd entries still land in a bucket.
pub fn extract_path(raw: &str) -> String {
    let raw = raw.trim();
    match Url::parse(raw) {
        Ok(parsed) if !parsed.cannot_be_a_base() => parsed.path().to_string(),
        _ => fallback_path(raw).to_string(),
    }
}

fn fallback_path(raw: &str) -> &str {
    let mut rest = raw;

    if let Some(colon) = rest.find(':') {
        let scheme = &rest[..colon];
        let is_scheme = !scheme.is_empty()
            && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if is_scheme {
            rest = &rest[colon + 1..];
        }
    }

    if let Some(after_slashes) = rest.strip_prefix("//") {
        let authority_end = after_slashes
            .find(['/', '?', '#'])
            .unwrap_or(after_slashes.len());
        rest = &after_slashes[authority_end..];
    }

    let path_end = rest.find(['?', '#']).unwrap_or(rest.len());
    &rest[..path_end]
}

/// Count of URLs per top-level directory label.
///
/// Labels keep the order in which they were first observed. Looking up a
/// label that was never recorded yields zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryCounts {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl DirectoryCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one URL under `label`
    pub fn increment(&mut self, label: &str) {
        self.add(label, 1);
    }

    /// Add `amount` URLs under `label`
    pub fn add(&mut self, label: &str, amount: usize) {
        match self.counts.get_mut(label) {
            Some(count) => *count += amount,
            None => {
                self.order.push(label.to_string());
                self.counts.insert(label.to_string(), amount);
            }
        }
    }

    /// Count for `label`, zero when absent
    pub fn get(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.counts.contains_key(label)
    }

    /// Labels in first-observed order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(label, count)` pairs in first-observed order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.order
            .iter()
            .map(|label| (label.as_str(), self.get(label)))
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(label, count)` pairs sorted by descending count; ties keep first-observed order.
    pub fn sorted_by_count(&self) -> Vec<(&str, usize)> {
        let mut rows: Vec<(&str, usize)> = self.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows
    }
}

impl Serialize for DirectoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (label, count) in self.iter() {
            map.serialize_entry(label, &count)?;
        }
        map.end()
    }
}

impl<'a> FromIterator<&'a str> for DirectoryCounts {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut counts = DirectoryCounts::new();
        for label in iter {
            counts.increment(label);
        }
        counts
    }
}
