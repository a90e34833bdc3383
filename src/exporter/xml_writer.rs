use crate::error::ExportError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const ROOT_ELEMENT: &str = "emails";
const ITEM_ELEMENT: &str = "email";

pub fn write(emails: &[&str], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|e| ExportError::write_failed(path, e))?;
    let mut writer = Writer::new(BufWriter::new(file));

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)), path)?;
    emit(&mut writer, Event::Start(BytesStart::new(ROOT_ELEMENT)), path)?;
    for email in emails {
        emit(&mut writer, Event::Start(BytesStart::new(ITEM_ELEMENT)), path)?;
        emit(&mut writer, Event::Text(BytesText::new(email)), path)?;
        emit(&mut writer, Event::End(BytesEnd::new(ITEM_ELEMENT)), path)?;
    }
    emit(&mut writer, Event::End(BytesEnd::new(ROOT_ELEMENT)), path)?;

    let mut inner = writer.into_inner();
    inner
        .write_all(b"\n")
        .and_then(|_| inner.flush())
        .map_err(|e| ExportError::write_failed(path, e))?;

    Ok(())
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>, path: &Path) -> Result<(), ExportError> {
    writer
        .write_event(event)
        .map_err(|e| ExportError::write_failed(path, e))
}
