pub mod csv_writer;
pub mod json_writer;
pub mod xlsx_writer;
pub mod xml_writer;

use crate::error::ExportError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Column header shared by the tabular formats.
pub const EMAIL_HEADER: &str = "Email";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma separated values with an `Email` header
    #[default]
    Csv,
    /// JSON array of strings
    Json,
    /// Single-sheet spreadsheet (Office Open XML workbook)
    Xls,
    /// `<emails><email>..</email></emails>` document
    Xml,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xls => "xlsx",
            ExportFormat::Xml => "xml",
        }
    }

    /// Guess a format from a destination path. Only used when the caller did not pick one.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            "xls" | "xlsx" => Some(ExportFormat::Xls),
            "xml" => Some(ExportFormat::Xml),
            _ => None,
        }
    }

    /// True when the destination's extension names different content than
    /// what this format writes. `.xls` counts: the workbook is always OOXML.
    pub fn extension_mismatch(&self, path: &Path) -> bool {
        let is_xls = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xls"));

        is_xls || Self::from_extension(path).is_some_and(|inferred| inferred != *self)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
            ExportFormat::Xls => "XLS",
            ExportFormat::Xml => "XML",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub records: usize,
    pub bytes: u64,
}

/// Serialize `emails` to `destination` in the requested format.
///
/// The write is not atomic: a failure part way through can leave a partial
/// file behind.
pub fn export<S: AsRef<str>>(
    emails: &[S],
    format: ExportFormat,
    destination: &Path,
) -> Result<ExportSummary, ExportError> {
    if emails.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let emails: Vec<&str> = emails.iter().map(|e| e.as_ref()).collect();

    if format.extension_mismatch(destination) {
        warn!(
            path = %destination.display(),
            format = %format,
            "Destination extension does not match the written content (expected .{})",
            format.extension()
        );
    }

    ensure_parent_dir(destination)?;
    debug!(
        path = %destination.display(),
        format = %format,
        records = emails.len(),
        "Writing export"
    );

    match format {
        ExportFormat::Csv => csv_writer::write(&emails, destination)?,
        ExportFormat::Json => json_writer::write(&emails, destination)?,
        ExportFormat::Xls => xlsx_writer::write(&emails, destination)?,
        ExportFormat::Xml => xml_writer::write(&emails, destination)?,
    }

    let bytes = fs::metadata(destination)
        .map(|m| m.len())
        .map_err(|e| ExportError::write_failed(destination, e))?;

    info!(
        path = %destination.display(),
        format = %format,
        records = emails.len(),
        bytes,
        "Export complete"
    );

    Ok(ExportSummary {
        path: destination.to_path_buf(),
        format,
        records: emails.len(),
        bytes,
    })
}

fn ensure_parent_dir(destination: &Path) -> Result<(), ExportError> {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|e| ExportError::write_failed(destination, e))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_export_is_rejected() {
        let temp_dir = TempDir::new().unwrap();

        for format in [
            ExportFormat::Csv,
            ExportFormat::Json,
            ExportFormat::Xls,
            ExportFormat::Xml,
        ] {
            let path = temp_dir.path().join(format!("empty.{}", format.extension()));
            let result = export::<&str>(&[], format, &path);
            assert!(matches!(result, Err(ExportError::NothingToExport)));
            assert!(!path.exists(), "{} export should not create a file", format);
        }
    }

    #[test]
    fn test_export_summary() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.json");

        let summary = export(&["a@b.com", "c@d.com"], ExportFormat::Json, &path).unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.format, ExportFormat::Json);
        assert_eq!(summary.path, path);
        assert!(summary.bytes > 0);
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("out.csv");

        export(&["a@b.com"], ExportFormat::Csv, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_destination() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened as a file
        let result = export(&["a@b.com"], ExportFormat::Csv, temp_dir.path());
        assert!(matches!(result, Err(ExportError::WriteFailed { .. })));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ExportFormat::from_extension(Path::new("out.CSV")),
            Some(ExportFormat::Csv)
        );
        assert_eq!(
            ExportFormat::from_extension(Path::new("a/b.xls")),
            Some(ExportFormat::Xls)
        );
        assert_eq!(
            ExportFormat::from_extension(Path::new("a/b.xlsx")),
            Some(ExportFormat::Xls)
        );
        assert_eq!(
            ExportFormat::from_extension(Path::new("emails.xml")),
            Some(ExportFormat::Xml)
        );
        assert_eq!(ExportFormat::from_extension(Path::new("emails.txt")), None);
        assert_eq!(ExportFormat::from_extension(Path::new("emails")), None);
    }

    #[test]
    fn test_extension_mismatch() {
        assert!(ExportFormat::Xls.extension_mismatch(Path::new("out.xls")));
        assert!(ExportFormat::Xls.extension_mismatch(Path::new("out.XLS")));
        assert!(!ExportFormat::Xls.extension_mismatch(Path::new("out.xlsx")));
        assert!(ExportFormat::Json.extension_mismatch(Path::new("out.csv")));
        assert!(!ExportFormat::Csv.extension_mismatch(Path::new("out.csv")));
        assert!(!ExportFormat::Csv.extension_mismatch(Path::new("out.txt")));
        assert!(!ExportFormat::Xml.extension_mismatch(Path::new("emails")));
    }

    #[test]
    fn test_mismatched_extension_still_exports() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("emails.xls");

        let summary = export(&["a@b.com"], ExportFormat::Xls, &path).unwrap();
        assert_eq!(summary.path, path);
        assert_eq!(&fs::read(&path).unwrap()[..4], b"PK\x03\x04");
    }

    #[test]
    fn test_format_display() {
        assert_eq!(ExportFormat::Csv.to_string(), "CSV");
        assert_eq!(ExportFormat::Xls.to_string(), "XLS");
        assert_eq!(ExportFormat::default(), ExportFormat::Csv);
    }
}
