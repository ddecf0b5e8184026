//! Simple Output and Reporting
//!
//! This module renders analysis results as aligned text tables.

use crate::cli::VerbosityLevel;
use crate::report::{AggregateTable, IndexReport, SitemapReport, UrlRow};
use crate::sitemap::DocumentKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Simple output formatter for human-readable results
pub struct Output {
    verbosity: VerbosityLevel,
    show_colors: bool,
}

impl Output {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    pub fn with_colors(verbosity: VerbosityLevel, show_colors: bool) -> Self {
        Self {
            verbosity,
            show_colors,
        }
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn header(&self, title: &str) -> String {
        format!("{}\n", self.colorize(title, "1"))
    }

    /// Overview of a sitemap index: one row per sitemap plus TOTAL
    pub fn format_index_summary(&self, index: &IndexReport, table: &AggregateTable) -> String {
        let mut output = String::new();
        output.push_str(&format!("Found {} sitemap files.\n", index.len()));

        if self.verbosity == VerbosityLevel::Quiet {
            output.push_str(&format!("Total URLs: {}\n", index.total_urls()));
            return output;
        }

        output.push('\n');
        output.push_str(&self.header("Overview of the Sitemap Index"));

        let mut headers = vec!["Sitemap".to_string(), "URL Count".to_string()];
        headers.extend(table.columns.iter().cloned());

        let rows: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.sitemap.clone(), row.url_count.to_string()];
                cells.extend(row.cells.iter().map(|count| count.to_string()));
                cells
            })
            .collect();

        output.push_str(&render_table(&headers, &rows));
        output
    }

    /// Overview of a single sitemap: one row per directory label
    pub fn format_sitemap_summary(&self, report: &SitemapReport) -> String {
        let mut output = String::new();
        output.push_str(&format!("Found {} URLs in the sitemap.\n", report.url_count));

        if self.verbosity == VerbosityLevel::Quiet {
            return output;
        }

        output.push('\n');
        output.push_str(&self.header("Overview of the Sitemap File"));

        let headers = vec!["Top-Level Directory".to_string(), "URL Count".to_string()];
        let rows: Vec<Vec<String>> = report
            .directory_rows()
            .into_iter()
            .map(|(label, count)| vec![label.to_string(), count.to_string()])
            .collect();

        output.push_str(&render_table(&headers, &rows));
        output
    }

    /// First `limit` rows of the URL listing, followed by a note when truncated
    pub fn format_url_preview<'a, I>(&self, rows: I, limit: usize, include_sitemap: bool) -> String
    where
        I: IntoIterator<Item = UrlRow<'a>>,
    {
        if self.verbosity == VerbosityLevel::Quiet {
            return String::new();
        }

        let mut headers = vec![String::new()];
        if include_sitemap {
            headers.push("Sitemap".to_string());
        }
        headers.push("URL".to_string());
        headers.push("Top-Level Directory".to_string());

        let mut total = 0;
        let mut table_rows = Vec::new();
        for (index, row) in rows.into_iter().enumerate() {
            total += 1;
            if index >= limit {
                continue;
            }
            let mut cells = vec![index.to_string()];
            if include_sitemap {
                cells.push(row.sitemap.to_string());
            }
            cells.push(row.url.to_string());
            cells.push(row.directory.to_string());
            table_rows.push(cells);
        }

        let mut output = String::new();
        output.push('\n');
        output.push_str(&self.header("All URLs"));
        output.push_str(&render_table(&headers, &table_rows));

        if total > limit {
            output.push_str(&format!(
                "{}\n",
                self.colorize(
                    &format!(
                        "Note: This is just a preview. The full data set has a total of {} URLs. \
                         Use --csv <PATH> to export them all.",
                        total
                    ),
                    "2"
                )
            ));
        }

        output
    }

    /// Diagnostic for a document whose root is neither an index nor a urlset
    pub fn format_unknown_format(&self, root: &str) -> String {
        format!(
            "{} root element <{}> is neither <sitemapindex> nor <urlset>; no sitemaps found",
            self.colorize("Unknown sitemap format:", "33"),
            root
        )
    }

    /// Diagnostic for a single-sitemap run on something other than a urlset
    pub fn format_not_a_urlset(&self, kind: &DocumentKind) -> Option<String> {
        match kind {
            DocumentKind::UrlSet => None,
            DocumentKind::SitemapIndex => Some(format!(
                "{} this is a sitemap index; run `sitemap-audit index <URL>` to analyze \
                 the sitemaps it lists",
                self.colorize("No URLs counted:", "33")
            )),
            DocumentKind::Unknown(root) => Some(format!(
                "{} root element <{}> is not <urlset>; no URLs found",
                self.colorize("Unknown sitemap format:", "33"),
                root
            )),
        }
    }
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    // Everything after the first column is numeric except the listing's text columns
    let aligns: Vec<Align> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            if i == 0 || matches!(header.as_str(), "Sitemap" | "URL" | "Top-Level Directory") {
                Align::Left
            } else {
                Align::Right
            }
        })
        .collect();

    let mut output = String::new();
    output.push_str(&render_line(headers, &widths, &aligns));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(&render_line(&rule, &widths, &aligns));
    for row in rows {
        output.push_str(&render_line(row, &widths, &aligns));
    }
    output
}

fn render_line(cells: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let line: Vec<String> = cells
        .iter()
        .zip(widths.iter().zip(aligns.iter()))
        .map(|(cell, (width, align))| match align {
            Align::Left => format!("{:<width$}", cell, width = width),
            Align::Right => format!("{:>width$}", cell, width = width),
        })
        .collect();
    format!("{}\n", line.join("  ").trim_end())
}
