use super::EMAIL_HEADER;
use crate::error::ExportError;
use rust_xlsxwriter::Workbook;
use std::path::Path;

const SHEET_NAME: &str = "Emails";

/// One sheet, `Email` in A1 and one address per row below it. No styling.
pub fn write(emails: &[&str], path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| ExportError::write_failed(path, e))?;
    worksheet
        .write_string(0, 0, EMAIL_HEADER)
        .map_err(|e| ExportError::write_failed(path, e))?;

    for (index, email) in emails.iter().enumerate() {
        let row = u32::try_from(index + 1).map_err(|e| ExportError::write_failed(path, e))?;
        worksheet
            .write_string(row, 0, *email)
            .map_err(|e| ExportError::write_failed(path, e))?;
    }

    workbook
        .save(path)
        .map_err(|e| ExportError::write_failed(path, e))?;

    Ok(())
}
