// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Workbook writing: CSV, XLSX, and ODS targets.

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use rust_xlsxwriter::Workbook;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use formwerk_core::error::{FormwerkError, Result};
use formwerk_core::types::Format;

use super::reader::SheetCell;

const ODS_MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

const ODS_MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0" manifest:version="1.2">
  <manifest:file-entry manifest:full-path="/" manifest:media-type="application/vnd.oasis.opendocument.spreadsheet"/>
  <manifest:file-entry manifest:full-path="content.xml" manifest:media-type="text/xml"/>
</manifest:manifest>
"#;

/// Serialize rows into the requested spreadsheet format.
pub fn write_rows(rows: &[Vec<SheetCell>], target: Format) -> Result<Vec<u8>> {
    match target {
        Format::Csv => rows_to_csv(rows),
        Format::Xlsx => rows_to_xlsx(rows),
        Format::Ods => rows_to_ods(rows),
        other => Err(FormwerkError::WriteFailure(format!(
            "not a spreadsheet target: {other}"
        ))),
    }
}

// -- CSV ------------------------------------------------------------------

fn rows_to_csv(rows: &[Vec<SheetCell>]) -> Result<Vec<u8>> {
    let csv_err = |e: csv::Error| FormwerkError::WriteFailure(format!("csv write: {e}"));
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .write_record(row.iter().map(SheetCell::as_text))
            .map_err(csv_err)?;
    }
    writer
        .into_inner()
        .map_err(|e| FormwerkError::WriteFailure(format!("csv write: {e}")))
}

// -- XLSX -----------------------------------------------------------------

fn rows_to_xlsx(rows: &[Vec<SheetCell>]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match cell {
                SheetCell::Empty => {}
                SheetCell::Text(v) => {
                    worksheet.write_string(r, c, v.as_str()).map_err(xlsx_err)?;
                }
                SheetCell::Number(v) => {
                    worksheet.write_number(r, c, *v).map_err(xlsx_err)?;
                }
                SheetCell::Bool(v) => {
                    worksheet.write_boolean(r, c, *v).map_err(xlsx_err)?;
                }
            }
        }
    }
    workbook.save_to_buffer().map_err(xlsx_err)
}

fn xlsx_err(e: rust_xlsxwriter::XlsxError) -> FormwerkError {
    FormwerkError::WriteFailure(format!("xlsx write: {e}"))
}

// -- ODS ------------------------------------------------------------------

fn rows_to_ods(rows: &[Vec<SheetCell>]) -> Result<Vec<u8>> {
    let content = ods_content_xml(rows)?;

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    // The mimetype entry must come first and must be stored uncompressed.
    archive
        .start_file(
            "mimetype",
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
        )
        .map_err(zip_err)?;
    archive.write_all(ODS_MIMETYPE.as_bytes())?;

    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    archive
        .start_file("META-INF/manifest.xml", deflated)
        .map_err(zip_err)?;
    archive.write_all(ODS_MANIFEST.as_bytes())?;
    archive.start_file("content.xml", deflated).map_err(zip_err)?;
    archive.write_all(&content)?;

    let cursor = archive.finish().map_err(zip_err)?;
    Ok(cursor.into_inner())
}

fn ods_content_xml(rows: &[Vec<SheetCell>]) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_err)?;
    let mut root = BytesStart::new("office:document-content");
    root.push_attribute((
        "xmlns:office",
        "urn:oasis:names:tc:opendocument:xmlns:office:1.0",
    ));
    root.push_attribute((
        "xmlns:table",
        "urn:oasis:names:tc:opendocument:xmlns:table:1.0",
    ));
    root.push_attribute((
        "xmlns:text",
        "urn:oasis:names:tc:opendocument:xmlns:text:1.0",
    ));
    root.push_attribute(("office:version", "1.2"));
    writer.write_event(Event::Start(root)).map_err(write_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("office:body")))
        .map_err(write_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("office:spreadsheet")))
        .map_err(write_err)?;
    let mut table = BytesStart::new("table:table");
    table.push_attribute(("table:name", "Sheet1"));
    writer.write_event(Event::Start(table)).map_err(write_err)?;

    for row in rows {
        writer
            .write_event(Event::Start(BytesStart::new("table:table-row")))
            .map_err(write_err)?;
        for cell in row {
            write_ods_cell(&mut writer, cell)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("table:table-row")))
            .map_err(write_err)?;
    }

    for tag in [
        "table:table",
        "office:spreadsheet",
        "office:body",
        "office:document-content",
    ] {
        writer
            .write_event(Event::End(BytesEnd::new(tag)))
            .map_err(write_err)?;
    }
    Ok(writer.into_inner().into_inner())
}

fn write_ods_cell(writer: &mut Writer<Cursor<Vec<u8>>>, cell: &SheetCell) -> Result<()> {
    if matches!(cell, SheetCell::Empty) {
        return writer
            .write_event(Event::Empty(BytesStart::new("table:table-cell")))
            .map_err(write_err);
    }

    let mut open = BytesStart::new("table:table-cell");
    match cell {
        SheetCell::Text(_) => open.push_attribute(("office:value-type", "string")),
        SheetCell::Number(v) => {
            open.push_attribute(("office:value-type", "float"));
            open.push_attribute(("office:value", v.to_string().as_str()));
        }
        SheetCell::Bool(v) => {
            open.push_attribute(("office:value-type", "boolean"));
            open.push_attribute(("office:boolean-value", v.to_string().as_str()));
        }
        SheetCell::Empty => {}
    }
    writer.write_event(Event::Start(open)).map_err(write_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("text:p")))
        .map_err(write_err)?;
    writer
        .write_event(Event::Text(BytesText::new(&cell.as_text())))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("text:p")))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("table:table-cell")))
        .map_err(write_err)
}

fn zip_err(e: zip::result::ZipError) -> FormwerkError {
    FormwerkError::WriteFailure(format!("ods package: {e}"))
}

fn write_err(e: impl std::fmt::Display) -> FormwerkError {
    FormwerkError::WriteFailure(format!("ods write: {e}"))
}
