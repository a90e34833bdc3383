use crate::config::SourceConfig;
use crate::error::{MailScrapeError, Result};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the URLs of a scrape come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SourceSpec {
    Url(String),
    ListFile(PathBuf),
}

impl SourceSpec {
    /// Expand the source into the ordered list of URLs to fetch.
    pub fn resolve(&self, config: &SourceConfig) -> Result<Vec<String>> {
        match self {
            SourceSpec::Url(url) => Ok(vec![url.clone()]),
            SourceSpec::ListFile(path) => load_url_list(path, config),
        }
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSpec::Url(url) => write!(f, "{}", url),
            SourceSpec::ListFile(path) => write!(f, "URL list {}", path.display()),
        }
    }
}

/// Message sent by the front end to start a scrape.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub source: SourceSpec,
}

impl ScrapeRequest {
    pub fn url<S: Into<String>>(url: S) -> Self {
        Self {
            source: SourceSpec::Url(url.into()),
        }
    }

    pub fn list_file<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            source: SourceSpec::ListFile(path.into()),
        }
    }
}

/// Read a delimited file and take the first field of every row as a URL.
///
/// Rows come from a single CSV reader, so a quoted field may span several
/// lines. Fields are trimmed. A row whose first field is empty, or an empty
/// line, is a blank row: it is dropped unless `keep_blank_rows` is set, in
/// which case it becomes an empty URL that will fail to fetch.
pub fn load_url_list(path: &Path, config: &SourceConfig) -> Result<Vec<String>> {
    let delimiter = config.delimiter_byte()?;
    let content = fs::read(path).map_err(|e| MailScrapeError::SourceFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(content.as_slice());

    let mut urls = Vec::new();
    let mut blank_rows = 0usize;
    let mut record = csv::StringRecord::new();
    let mut rows_read = 0usize;
    let mut cursor = 0usize;

    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|e| MailScrapeError::SourceFile {
                path: path.to_path_buf(),
                message: format!("row {}: {}", rows_read + 1, e),
            })?;

        // The reader skips empty lines; recover them from the bytes it consumed
        let end = if more {
            usize::try_from(reader.position().byte()).unwrap_or(content.len())
        } else {
            content.len()
        };
        let after_cr = cursor > 0 && content[cursor - 1] == b'\r';
        let empty_lines = leading_empty_lines(&content[cursor..end.max(cursor)], after_cr);
        cursor = end.max(cursor);

        let in_header = config.has_headers && rows_read == 0 && more;
        if !in_header {
            blank_rows += empty_lines;
            if config.keep_blank_rows {
                urls.extend(std::iter::repeat(String::new()).take(empty_lines));
            }
        }

        if !more {
            break;
        }
        rows_read += 1;
        if in_header {
            continue;
        }

        let url = record.get(0).unwrap_or_default();
        if url.is_empty() {
            blank_rows += 1;
            if !config.keep_blank_rows {
                continue;
            }
        }
        urls.push(url.to_string());
    }

    debug!(
        path = %path.display(),
        urls = urls.len(),
        blank_rows,
        kept_blank = config.keep_blank_rows,
        "Loaded URL list"
    );

    Ok(urls)
}

/// Number of line terminators at the start of `bytes`. `\r\n` counts once;
/// a leading `\n` that completes the previous row's `\r\n` is not counted.
fn leading_empty_lines(bytes: &[u8], after_cr: bool) -> usize {
    let mut i = usize::from(after_cr && bytes.first() == Some(&b'\n'));
    let mut count = 0;

    loop {
        match bytes.get(i) {
            Some(b'\r') => {
                count += 1;
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
            }
            Some(b'\n') => {
                count += 1;
                i += 1;
            }
            _ => return count,
        }
    }
}
