//! CSV export of the flat URL listing
//!
//! The file starts with an unnamed row-index column, then `Sitemap` (index
//! mode only), `URL` and `Top-Level Directory`. Output is UTF-8.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::report::UrlRow;

/// Write the URL listing as CSV to `writer`.
///
/// Returns the number of data rows written.
pub fn write_url_csv<'a, W, I>(writer: &mut W, rows: I, include_sitemap: bool) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = UrlRow<'a>>,
{
    if include_sitemap {
        writeln!(writer, ",Sitemap,URL,Top-Level Directory")?;
    } else {
        writeln!(writer, ",URL,Top-Level Directory")?;
    }

    let mut written = 0;
    for (index, row) in rows.into_iter().enumerate() {
        if include_sitemap {
            writeln!(
                writer,
                "{},{},{},{}",
                index,
                escape_field(row.sitemap),
                escape_field(row.url),
                escape_field(row.directory)
            )?;
        } else {
            writeln!(
                writer,
                "{},{},{}",
                index,
                escape_field(row.url),
                escape_field(row.directory)
            )?;
        }
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}

/// Create (or truncate) `path` and write the URL listing to it.
pub fn export_url_csv<'a, I>(path: &Path, rows: I, include_sitemap: bool) -> Result<usize>
where
    I: IntoIterator<Item = UrlRow<'a>>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    let written = write_url_csv(&mut writer, rows, include_sitemap)?;
    tracing::info!(path = %path.display(), rows = written, "exported URL listing");
    Ok(written)
}

/// Quote a field when it contains a delimiter, quote or line break.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
