// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX read and write. Writing produces a minimal OOXML package whose
// document body is a single paragraph holding the whole text; reading
// collects paragraph text and joins paragraphs with newlines.

use std::io::{Cursor, Read, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use formwerk_core::error::{FormwerkError, Result};

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>
"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>
"#;

// -- Writing --------------------------------------------------------------

/// Package plain text as a DOCX document with one paragraph.
pub fn text_to_docx(text: &str) -> Result<Vec<u8>> {
    let document = document_xml(text)?;

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    archive
        .start_file("[Content_Types].xml", options)
        .map_err(zip_err)?;
    archive.write_all(CONTENT_TYPES.as_bytes())?;
    archive.start_file("_rels/.rels", options).map_err(zip_err)?;
    archive.write_all(PACKAGE_RELS.as_bytes())?;
    archive
        .start_file("word/document.xml", options)
        .map_err(zip_err)?;
    archive.write_all(&document)?;

    let cursor = archive.finish().map_err(zip_err)?;
    Ok(cursor.into_inner())
}

fn document_xml(text: &str) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(write_err)?;
    let mut document = BytesStart::new("w:document");
    document.push_attribute(("xmlns:w", WORD_NS));
    writer
        .write_event(Event::Start(document))
        .map_err(write_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("w:body")))
        .map_err(write_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("w:p")))
        .map_err(write_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("w:r")))
        .map_err(write_err)?;

    let mut run_text = BytesStart::new("w:t");
    run_text.push_attribute(("xml:space", "preserve"));
    writer
        .write_event(Event::Start(run_text))
        .map_err(write_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("w:t")))
        .map_err(write_err)?;

    for tag in ["w:r", "w:p", "w:body", "w:document"] {
        writer
            .write_event(Event::End(BytesEnd::new(tag)))
            .map_err(write_err)?;
    }
    Ok(writer.into_inner().into_inner())
}

// -- Reading --------------------------------------------------------------

/// Extract document text: one string per paragraph, joined with newlines.
pub fn docx_to_text(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| FormwerkError::MalformedInput(format!("docx open: {e}")))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| FormwerkError::MalformedInput(format!("docx body: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| FormwerkError::MalformedInput(format!("docx body: {e}")))?;

    let mut reader = Reader::from_str(&xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_run_text = false;

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| FormwerkError::MalformedInput(format!("docx parse: {e}")))?
        {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => current.clear(),
                b"t" => in_run_text = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                b"t" => in_run_text = false,
                _ => {}
            },
            // Self-closed <w:p/> is an empty paragraph.
            Event::Empty(e) if e.local_name().as_ref() == b"p" => {
                paragraphs.push(String::new());
            }
            Event::Text(e) if in_run_text => {
                let text = e
                    .unescape()
                    .map_err(|e| FormwerkError::MalformedInput(format!("docx parse: {e}")))?;
                current.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(paragraphs.join("\n"))
}

fn zip_err(e: zip::result::ZipError) -> FormwerkError {
    FormwerkError::WriteFailure(format!("docx package: {e}"))
}

fn write_err(e: impl std::fmt::Display) -> FormwerkError {
    FormwerkError::WriteFailure(format!("docx write: {e}"))
}
