use crate::error::ExportError;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn write(emails: &[&str], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|e| ExportError::write_failed(path, e))?;
    let mut writer = BufWriter::new(file);

    // Four-space indentation, one address per line
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    emails
        .serialize(&mut serializer)
        .map_err(|e| ExportError::write_failed(path, e))?;

    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| ExportError::write_failed(path, e))?;

    Ok(())
}
