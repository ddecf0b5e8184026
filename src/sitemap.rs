//! Sitemap XML parsing
//!
//! Two entry points operate on raw document bytes:
//! - [`resolve_locations`] lists every `<loc>` of a sitemap index (or of a
//!   plain `urlset`), which is how child sitemaps are discovered.
//! - [`aggregate_sitemap`] extracts the `<url><loc>` entries of a single
//!   sitemap and buckets them by top-level directory.
//!
//! Only elements in the sitemaps.org namespace are considered. Both functions
//! read the whole document, so malformed XML is reported even when nothing of
//! interest was found.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use serde::Serialize;

use crate::error::{Result, SitemapError};
use crate::report::SitemapReport;

/// The sitemaps.org protocol namespace
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Kind of document, decided by the local name of the root element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DocumentKind {
    /// `<sitemapindex>`
    SitemapIndex,
    /// `<urlset>`
    UrlSet,
    /// Any other root element, holding its local name
    Unknown(String),
}

impl DocumentKind {
    fn from_root(local_name: &str) -> Self {
        match local_name {
            "sitemapindex" => DocumentKind::SitemapIndex,
            "urlset" => DocumentKind::UrlSet,
            other => DocumentKind::Unknown(other.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, DocumentKind::Unknown(_))
    }
}

/// Outcome of resolving the locations listed in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationResolution {
    pub kind: DocumentKind,
    /// `<loc>` texts in document order; empty for unknown documents
    pub locations: Vec<String>,
}

/// Extract the `<loc>` texts of a sitemap index or urlset.
///
/// An unrecognized root element is not an error: the resolution reports
/// [`DocumentKind::Unknown`] with no locations.
pub fn resolve_locations(xml: &[u8]) -> Result<LocationResolution> {
    let scanned = scan(xml, ScanMode::Locations)?;
    let kind = DocumentKind::from_root(&scanned.root);

    let locations = if kind.is_known() {
        scanned.locations
    } else {
        tracing::warn!(root = %scanned.root, "Unknown sitemap format");
        Vec::new()
    };

    Ok(LocationResolution { kind, locations })
}

/// A single sitemap's report along with the kind of its root element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapDocument {
    pub kind: DocumentKind,
    pub report: SitemapReport,
}

/// Extract and classify every `<url><loc>` of a single sitemap.
///
/// `<url>` elements without a `<loc>` child are skipped. A root other than
/// `<urlset>` is logged and reported through [`SitemapDocument::kind`].
pub fn aggregate_document(xml: &[u8]) -> Result<SitemapDocument> {
    let scanned = scan(xml, ScanMode::UrlEntries)?;
    let kind = DocumentKind::from_root(&scanned.root);
    if kind != DocumentKind::UrlSet {
        tracing::warn!(root = %scanned.root, "Document is not a urlset");
    }

    Ok(SitemapDocument {
        kind,
        report: scanned.locations.into_iter().collect(),
    })
}

/// Like [`aggregate_document`], keeping only the report
pub fn aggregate_sitemap(xml: &[u8]) -> Result<SitemapReport> {
    Ok(aggregate_document(xml)?.report)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanMode {
    /// Any `<loc>` below the root
    Locations,
    /// The first `<loc>` child of each `<url>` child of the root
    UrlEntries,
}

#[derive(Debug)]
struct ScannedDocument {
    root: String,
    locations: Vec<String>,
}

#[derive(Debug)]
struct OpenElement {
    local_name: String,
    in_sitemap_ns: bool,
}

/// State of the `<url>` element currently open, in [`ScanMode::UrlEntries`]
#[derive(Debug, Default)]
struct UrlState {
    loc: Option<String>,
}

fn parse_error(details: impl Into<String>) -> SitemapError {
    SitemapError::Parse {
        url: String::new(),
        details: details.into(),
    }
}

fn is_sitemap_namespace(ns: &ResolveResult<'_>) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(n)) if *n == SITEMAP_NAMESPACE.as_bytes())
}

fn scan(xml: &[u8], mode: ScanMode) -> Result<ScannedDocument> {
    let mut reader = NsReader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<String> = None;
    let mut locations = Vec::new();

    let mut capture: Option<String> = None;
    let mut capture_depth = 0;
    let mut current_url: Option<UrlState> = None;

    loop {
        let (in_sitemap_ns, event) = match reader.read_resolved_event_into(&mut buf) {
            Ok((ns, event)) => (is_sitemap_namespace(&ns), event),
            Err(e) => {
                return Err(parse_error(format!(
                    "{} at position {}",
                    e,
                    reader.error_position()
                )));
            }
        };

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let local_name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

                if stack.is_empty() {
                    if root.is_some() {
                        return Err(parse_error("multiple root elements"));
                    }
                    root = Some(local_name.clone());
                }

                let depth = stack.len() + 1;
                let is_loc = in_sitemap_ns && local_name == "loc";
                let is_url = in_sitemap_ns && local_name == "url";

                match mode {
                    ScanMode::Locations => {
                        if is_loc && depth > 1 && capture.is_none() && !is_empty {
                            capture = Some(String::new());
                            capture_depth = depth;
                        }
                    }
                    ScanMode::UrlEntries => {
                        if is_url && depth == 2 && !is_empty {
                            current_url = Some(UrlState::default());
                        } else if is_loc && depth == 3 && !is_empty {
                            if let Some(url) = &current_url
                                && url.loc.is_none()
                                && capture.is_none()
                            {
                                capture = Some(String::new());
                                capture_depth = depth;
                            }
                        }
                    }
                }

                if !is_empty {
                    stack.push(OpenElement {
                        local_name,
                        in_sitemap_ns,
                    });
                }
            }
            Event::End(_) => {
                let depth = stack.len();
                let Some(closed) = stack.pop() else {
                    return Err(parse_error("closing tag without matching opening tag"));
                };

                if depth == capture_depth
                    && let Some(text) = capture.take()
                {
                    let text = text.trim().to_string();
                    match mode {
                        ScanMode::Locations => {
                            if !text.is_empty() {
                                locations.push(text);
                            }
                        }
                        ScanMode::UrlEntries => {
                            if let Some(url) = current_url.as_mut()
                                && !text.is_empty()
                            {
                                url.loc = Some(text);
                            }
                        }
                    }
                    capture_depth = 0;
                }

                if mode == ScanMode::UrlEntries
                    && depth == 2
                    && closed.in_sitemap_ns
                    && closed.local_name == "url"
                    && let Some(url) = current_url.take()
                    && let Some(loc) = url.loc
                {
                    locations.push(loc);
                }
            }
            Event::Text(ref e) => {
                let text = e
                    .unescape()
                    .map_err(|err| parse_error(err.to_string()))?;
                if stack.is_empty() {
                    if !text.trim().is_empty() {
                        return Err(parse_error("text outside of the root element"));
                    }
                } else if stack.len() == capture_depth
                    && let Some(buffer) = capture.as_mut()
                {
                    buffer.push_str(&text);
                }
            }
            Event::CData(ref e) => {
                if stack.len() == capture_depth
                    && let Some(buffer) = capture.as_mut()
                {
                    buffer.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(parse_error(format!(
            "unexpected end of document, <{}> is not closed",
            open.local_name
        )));
    }

    let Some(root) = root else {
        return Err(parse_error("no root element found"));
    };

    Ok(ScannedDocument { root, locations })
}
