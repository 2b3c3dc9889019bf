// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion orchestration: route a (source, target) pair to its family
// handler and move bytes through it.

use std::path::Path;

use tracing::{info, instrument};

use formwerk_core::error::{FormwerkError, Result};
use formwerk_core::types::{route, ConversionCategory, Format};

use crate::pdf::writer::PdfWriter;
use crate::{data, document, image, pdf, sheet};

/// Title stamped into generated PDF metadata.
const PDF_TITLE: &str = "Formwerk";
/// Scale factor applied when rasterizing a PDF page.
const PDF_RASTER_SCALE: f32 = 2.0;

/// Convert a file on disk, writing the result to `output`.
///
/// The pair is validated before any filesystem access, so an unsupported
/// conversion never reports a missing input. A failed write leaves no
/// partial output behind.
#[instrument(skip_all, fields(source = %source, target = %target))]
pub fn convert_file(input: &Path, output: &Path, source: Format, target: Format) -> Result<()> {
    if route(source, target).is_none() {
        return Err(FormwerkError::UnsupportedConversion {
            from: source,
            to: target,
        });
    }

    let bytes = std::fs::read(input).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FormwerkError::InputNotFound(input.display().to_string()),
        _ => FormwerkError::Io(e),
    })?;

    let converted = convert_bytes(&bytes, source, target)?;
    if let Err(e) = std::fs::write(output, &converted) {
        let _ = std::fs::remove_file(output);
        return Err(FormwerkError::WriteFailure(format!(
            "{}: {e}",
            output.display()
        )));
    }

    info!(
        input_bytes = bytes.len(),
        output_bytes = converted.len(),
        "Conversion complete"
    );
    Ok(())
}

/// Convert an in-memory payload between two formats.
#[instrument(skip_all, fields(source = %source, target = %target))]
pub fn convert_bytes(bytes: &[u8], source: Format, target: Format) -> Result<Vec<u8>> {
    let category = route(source, target).ok_or(FormwerkError::UnsupportedConversion {
        from: source,
        to: target,
    })?;

    match category {
        ConversionCategory::ImageToImage => {
            let decoded = image::decode(bytes, source)?;
            image::encode(&decoded, target)
        }
        ConversionCategory::ImageToPdf => {
            let decoded = image::decode(bytes, source)?;
            PdfWriter::new(PDF_TITLE).create_from_image(&decoded)
        }
        ConversionCategory::PdfToImage => {
            let page = pdf::raster::first_page_to_image(bytes, PDF_RASTER_SCALE)?;
            image::encode(&page, target)
        }
        ConversionCategory::DocumentToDocument => match (source, target) {
            (Format::Txt, Format::Docx) => document::text_to_docx(utf8_text(bytes)?),
            (Format::Docx, Format::Txt) => {
                document::docx_to_text(bytes).map(String::into_bytes)
            }
            (s, t) => Err(FormwerkError::Unknown(format!(
                "no document path from {s} to {t}"
            ))),
        },
        ConversionCategory::DocumentToPdf => {
            let text = match source {
                Format::Txt => utf8_text(bytes)?.to_string(),
                Format::Docx => document::docx_to_text(bytes)?,
                Format::Doc => {
                    return Err(FormwerkError::MalformedInput(
                        "legacy .doc documents cannot be parsed".to_string(),
                    ));
                }
                other => {
                    return Err(FormwerkError::Unknown(format!(
                        "no document reader for {other}"
                    )));
                }
            };
            PdfWriter::new(PDF_TITLE).create_from_text(&text)
        }
        ConversionCategory::DataToData => {
            let value = data::parse(bytes, source)?;
            data::serialize(&value, target)
        }
        ConversionCategory::DataToPdf => {
            let value = data::parse(bytes, source)?;
            let (headers, rows) = data::as_table(&value)?;
            PdfWriter::new(PDF_TITLE).create_from_table(&headers, &rows)
        }
        ConversionCategory::SpreadsheetToSpreadsheet => {
            let rows = sheet::read_rows(bytes)?;
            sheet::write_rows(&rows, target)
        }
    }
}

fn utf8_text(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| FormwerkError::MalformedInput(format!("text is not utf-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfReader;

    const PEOPLE_CSV: &[u8] = b"name,age,city\nalice,30,berlin\nbob,25,paris\ncarol,41,oslo\n";

    #[test]
    fn csv_to_json_produces_ordered_records() {
        let json = convert_bytes(PEOPLE_CSV, Format::Csv, Format::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&json).unwrap();

        let records = parsed.as_array().expect("array of records");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_object().unwrap().len(), 3);
        assert_eq!(records[2]["city"], "oslo");

        // serde_json::Value reorders keys on re-parse, so header order is
        // asserted on the emitted text.
        let text = std::str::from_utf8(&json).unwrap();
        let name = text.find("\"name\"").unwrap();
        let age = text.find("\"age\"").unwrap();
        let city = text.find("\"city\"").unwrap();
        assert!(name < age && age < city);
    }

    #[test]
    fn xml_to_json_follows_the_structural_mapping() {
        let xml = b"<root><a>1</a><b><c>2</c></b></root>";
        let json = convert_bytes(xml, Format::Xml, Format::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(parsed["a"], "1");
        assert_eq!(parsed["b"]["c"], "2");
    }

    #[test]
    fn unsupported_pairs_fail_before_touching_the_filesystem() {
        let missing = Path::new("/nonexistent/input.docx");
        let out = Path::new("/nonexistent/output.xlsx");
        assert!(matches!(
            convert_file(missing, out, Format::Docx, Format::Xlsx),
            Err(FormwerkError::UnsupportedConversion { .. })
        ));
    }

    #[test]
    fn missing_input_is_reported_as_such() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.json");
        assert!(matches!(
            convert_file(
                Path::new("/nonexistent/input.csv"),
                &out,
                Format::Csv,
                Format::Json
            ),
            Err(FormwerkError::InputNotFound(_))
        ));
    }

    #[test]
    fn convert_file_writes_the_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("people.csv");
        let output = dir.path().join("people.json");
        std::fs::write(&input, PEOPLE_CSV).unwrap();

        convert_file(&input, &output, Format::Csv, Format::Json).unwrap();

        let written = std::fs::read(&output).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 3);
    }

    #[test]
    fn transparent_png_corners_become_white_in_jpeg() {
        let mut img = ::image::RgbaImage::new(2, 2);
        img.put_pixel(0, 0, ::image::Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 0, ::image::Rgba([200, 10, 10, 255]));
        img.put_pixel(0, 1, ::image::Rgba([10, 200, 10, 255]));
        img.put_pixel(1, 1, ::image::Rgba([10, 10, 200, 255]));
        let mut png = Vec::new();
        ::image::DynamicImage::ImageRgba8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut png),
                ::image::ImageFormat::Png,
            )
            .unwrap();

        let jpeg = convert_bytes(&png, Format::Png, Format::Jpg).unwrap();
        let back = ::image::load_from_memory(&jpeg).unwrap().to_rgb8();
        let [r, g, b] = back.get_pixel(0, 0).0;
        assert!(r > 200 && g > 200 && b > 200);
    }

    #[test]
    fn text_round_trips_through_docx() {
        let text = b"alpha\nbeta\ngamma";
        let docx = convert_bytes(text, Format::Txt, Format::Docx).unwrap();
        let back = convert_bytes(&docx, Format::Docx, Format::Txt).unwrap();
        assert_eq!(back, text);
    }

    #[test]
    fn csv_to_pdf_renders_a_single_page() {
        let pdf = convert_bytes(PEOPLE_CSV, Format::Csv, Format::Pdf).unwrap();
        let reader = PdfReader::from_bytes(&pdf).unwrap();
        assert_eq!(reader.page_count(), 1);
    }

    #[test]
    fn legacy_doc_input_is_rejected() {
        assert!(matches!(
            convert_bytes(b"old word file", Format::Doc, Format::Pdf),
            Err(FormwerkError::MalformedInput(_))
        ));
    }

    #[test]
    fn scalar_json_root_cannot_become_pdf() {
        assert!(matches!(
            convert_bytes(b"5", Format::Json, Format::Pdf),
            Err(FormwerkError::MalformedInput(_))
        ));
    }

    #[test]
    fn yml_reads_as_yaml_but_is_never_a_target() {
        let yaml = b"- name: alice\n- name: bob\n";
        assert!(convert_bytes(yaml, Format::Yml, Format::Json).is_ok());
        assert!(matches!(
            convert_bytes(yaml, Format::Yaml, Format::Yml),
            Err(FormwerkError::UnsupportedConversion { .. })
        ));
    }
}
