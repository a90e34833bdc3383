use super::EMAIL_HEADER;
use crate::error::ExportError;
use std::path::Path;

/// Header row `Email`, then one quoted-as-needed row per address.
pub fn write(emails: &[&str], path: &Path) -> Result<(), ExportError> {
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| ExportError::write_failed(path, e))?;

    writer
        .write_record([EMAIL_HEADER])
        .map_err(|e| ExportError::write_failed(path, e))?;

    for email in emails {
        writer
            .write_record([email])
            .map_err(|e| ExportError::write_failed(path, e))?;
    }

    writer.flush().map_err(|e| ExportError::write_failed(path, e))?;
    Ok(())
}
