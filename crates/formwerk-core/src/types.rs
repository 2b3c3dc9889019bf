// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Formwerk conversion service.

use serde::{Deserialize, Serialize};

/// Every file format the service accepts at upload.
///
/// One variant per extension token. `jpg`/`jpeg` and `yaml`/`yml` stay
/// distinct variants because routing treats them differently on the target
/// side (`yml` is never a target, `jpg` and `jpeg` both are).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    // Raster and vector images
    Png,
    Jpg,
    Jpeg,
    Gif,
    Bmp,
    Svg,
    Webp,
    // Paged documents
    Pdf,
    // Text documents
    Txt,
    Docx,
    Doc,
    Rtf,
    // Structured data
    Csv,
    Json,
    Xml,
    Yaml,
    Yml,
    // Spreadsheets
    Xlsx,
    Xls,
    Ods,
}

/// All accepted formats, in family order. Used for table-driven tests and
/// the capability listing on the index page.
pub const ALL_FORMATS: [Format; 20] = [
    Format::Png,
    Format::Jpg,
    Format::Jpeg,
    Format::Gif,
    Format::Bmp,
    Format::Svg,
    Format::Webp,
    Format::Pdf,
    Format::Txt,
    Format::Docx,
    Format::Doc,
    Format::Rtf,
    Format::Csv,
    Format::Json,
    Format::Xml,
    Format::Yaml,
    Format::Yml,
    Format::Xlsx,
    Format::Xls,
    Format::Ods,
];

impl Format {
    /// Parse a format from a file extension. Accepts an optional leading dot
    /// and any letter case; returns `None` for extensions outside the
    /// accepted set.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" => Some(Self::Jpg),
            "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "svg" => Some(Self::Svg),
            "webp" => Some(Self::Webp),
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Txt),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            "rtf" => Some(Self::Rtf),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            "yaml" => Some(Self::Yaml),
            "yml" => Some(Self::Yml),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            "ods" => Some(Self::Ods),
            _ => None,
        }
    }

    /// Parse the format of an uploaded file from its filename.
    pub fn from_filename(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// Canonical lowercase extension token, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Svg => "svg",
            Self::Webp => "webp",
            Self::Pdf => "pdf",
            Self::Txt => "txt",
            Self::Docx => "docx",
            Self::Doc => "doc",
            Self::Rtf => "rtf",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
            Self::Yml => "yml",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
            Self::Ods => "ods",
        }
    }

    /// MIME type string for the HTTP Content-Type of a converted file.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg | Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Svg => "image/svg+xml",
            Self::Webp => "image/webp",
            Self::Pdf => "application/pdf",
            Self::Txt => "text/plain",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Doc => "application/msword",
            Self::Rtf => "application/rtf",
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::Yaml | Self::Yml => "application/x-yaml",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Xls => "application/vnd.ms-excel",
            Self::Ods => "application/vnd.oasis.opendocument.spreadsheet",
        }
    }

    /// Family bucket this format belongs to for routing purposes.
    ///
    /// Classification precedence is image, pdf, document, data, spreadsheet;
    /// no format appears in two buckets by construction. `rtf` is accepted
    /// at upload but belongs to no family, so every conversion involving it
    /// is unsupported.
    pub fn family(&self) -> Option<FormatFamily> {
        match self {
            Self::Png | Self::Jpg | Self::Jpeg | Self::Gif | Self::Bmp | Self::Svg
            | Self::Webp => Some(FormatFamily::Image),
            Self::Pdf => Some(FormatFamily::Pdf),
            Self::Txt | Self::Docx | Self::Doc => Some(FormatFamily::Document),
            Self::Csv | Self::Json | Self::Xml | Self::Yaml | Self::Yml => {
                Some(FormatFamily::Data)
            }
            Self::Xlsx | Self::Xls | Self::Ods => Some(FormatFamily::Spreadsheet),
            Self::Rtf => None,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// The five family buckets of the capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatFamily {
    Image,
    Pdf,
    Document,
    Data,
    Spreadsheet,
}

/// Handler class for a supported (source, target) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionCategory {
    ImageToImage,
    ImageToPdf,
    PdfToImage,
    DocumentToDocument,
    DocumentToPdf,
    DataToData,
    DataToPdf,
    SpreadsheetToSpreadsheet,
}

// ---------------------------------------------------------------------------
// Capability routing
// ---------------------------------------------------------------------------

/// Decide whether converting `source` to `target` is supported, and if so
/// which handler category applies.
///
/// Pure and total: every pair resolves to a category or `None`, never an
/// error. Unsupported is a normal outcome, not a failure. The capability
/// table, family by family:
///
/// - image → any image format or pdf
/// - pdf → png, jpg, jpeg, bmp, gif (first page only)
/// - document → pdf for txt/docx/doc; txt ↔ docx
/// - data → csv, json, xml, yaml (never yml), or pdf
/// - spreadsheet → csv, xlsx, ods (never xls)
pub fn route(source: Format, target: Format) -> Option<ConversionCategory> {
    use Format as F;
    use FormatFamily::*;

    let category = match (source.family()?, target.family()?) {
        (Image, Image) => ConversionCategory::ImageToImage,
        (Image, Pdf) => ConversionCategory::ImageToPdf,
        (Pdf, Image) => match target {
            F::Png | F::Jpg | F::Jpeg | F::Bmp | F::Gif => ConversionCategory::PdfToImage,
            _ => return None,
        },
        (Document, Document) => match (source, target) {
            (F::Txt, F::Docx) | (F::Docx, F::Txt) => ConversionCategory::DocumentToDocument,
            _ => return None,
        },
        (Document, Pdf) => ConversionCategory::DocumentToPdf,
        (Data, Data) => match target {
            F::Yml => return None,
            _ => ConversionCategory::DataToData,
        },
        (Data, Pdf) => ConversionCategory::DataToPdf,
        (Spreadsheet, Spreadsheet) => match target {
            F::Xls => return None,
            _ => ConversionCategory::SpreadsheetToSpreadsheet,
        },
        // csv sits in the data family, but spreadsheets export to it.
        (Spreadsheet, Data) => match target {
            F::Csv => ConversionCategory::SpreadsheetToSpreadsheet,
            _ => return None,
        },
        _ => return None,
    };
    Some(category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConversionCategory::*;
    use Format::*;

    const IMAGES: [Format; 7] = [Png, Jpg, Jpeg, Gif, Bmp, Svg, Webp];

    #[test]
    fn extension_parse_normalizes_case_and_dot() {
        assert_eq!(Format::from_extension("PNG"), Some(Png));
        assert_eq!(Format::from_extension(".Jpeg"), Some(Jpeg));
        assert_eq!(Format::from_extension("yml"), Some(Yml));
        assert_eq!(Format::from_extension("exe"), None);
        assert_eq!(Format::from_extension(""), None);
    }

    #[test]
    fn filename_parse_takes_final_extension() {
        assert_eq!(Format::from_filename("report.final.CSV"), Some(Csv));
        assert_eq!(Format::from_filename("archive.tar.gz"), None);
        assert_eq!(Format::from_filename("noextension"), None);
    }

    #[test]
    fn every_format_has_unique_extension() {
        for (i, a) in ALL_FORMATS.iter().enumerate() {
            for b in &ALL_FORMATS[i + 1..] {
                assert_ne!(a.extension(), b.extension());
            }
            assert_eq!(Format::from_extension(a.extension()), Some(*a));
        }
    }

    #[test]
    fn rtf_has_no_family() {
        assert_eq!(Rtf.family(), None);
        for target in ALL_FORMATS {
            assert_eq!(route(Rtf, target), None);
            assert_eq!(route(target, Rtf), None);
        }
    }

    #[test]
    fn image_sources_reach_all_images_and_pdf() {
        for source in IMAGES {
            for target in IMAGES {
                assert_eq!(route(source, target), Some(ImageToImage));
            }
            assert_eq!(route(source, Pdf), Some(ImageToPdf));
            assert_eq!(route(source, Csv), None);
            assert_eq!(route(source, Docx), None);
            assert_eq!(route(source, Xlsx), None);
        }
    }

    #[test]
    fn pdf_rasterizes_to_raster_formats_only() {
        for target in [Png, Jpg, Jpeg, Bmp, Gif] {
            assert_eq!(route(Pdf, target), Some(PdfToImage));
        }
        assert_eq!(route(Pdf, Svg), None);
        assert_eq!(route(Pdf, Webp), None);
        assert_eq!(route(Pdf, Pdf), None);
        assert_eq!(route(Pdf, Docx), None);
        assert_eq!(route(Pdf, Txt), None);
    }

    #[test]
    fn document_pairs_follow_the_table() {
        for source in [Txt, Docx, Doc] {
            assert_eq!(route(source, Pdf), Some(DocumentToPdf));
        }
        assert_eq!(route(Txt, Docx), Some(DocumentToDocument));
        assert_eq!(route(Docx, Txt), Some(DocumentToDocument));
        assert_eq!(route(Txt, Txt), None);
        assert_eq!(route(Docx, Docx), None);
        assert_eq!(route(Doc, Txt), None);
        assert_eq!(route(Doc, Docx), None);
        assert_eq!(route(Txt, Doc), None);
    }

    #[test]
    fn data_sources_reach_data_targets_and_pdf() {
        for source in [Csv, Json, Xml, Yaml, Yml] {
            for target in [Csv, Json, Xml, Yaml] {
                assert_eq!(route(source, target), Some(DataToData));
            }
            assert_eq!(route(source, Yml), None);
            assert_eq!(route(source, Pdf), Some(DataToPdf));
            assert_eq!(route(source, Xlsx), None);
            assert_eq!(route(source, Png), None);
        }
    }

    #[test]
    fn spreadsheet_sources_reach_csv_xlsx_ods() {
        for source in [Xlsx, Xls, Ods] {
            assert_eq!(route(source, Csv), Some(SpreadsheetToSpreadsheet));
            assert_eq!(route(source, Xlsx), Some(SpreadsheetToSpreadsheet));
            assert_eq!(route(source, Ods), Some(SpreadsheetToSpreadsheet));
            assert_eq!(route(source, Xls), None);
            assert_eq!(route(source, Json), None);
            assert_eq!(route(source, Pdf), None);
        }
    }

    #[test]
    fn routing_is_total_over_all_pairs() {
        // Every pair resolves without panicking; cross-family pairs outside
        // the table come back unsupported.
        let mut supported = 0;
        for source in ALL_FORMATS {
            for target in ALL_FORMATS {
                if route(source, target).is_some() {
                    supported += 1;
                }
            }
        }
        // 7 image sources x 8 targets, 5 pdf targets, 5 document source
        // targets (txt: docx+pdf, docx: txt+pdf, doc: pdf), 5 data sources
        // x 5 targets, 3 spreadsheet sources x 3 targets.
        assert_eq!(supported, 7 * 8 + 5 + 5 + 5 * 5 + 3 * 3);
    }

    #[test]
    fn mime_types_cover_common_targets() {
        assert_eq!(Pdf.mime_type(), "application/pdf");
        assert_eq!(Jpg.mime_type(), Jpeg.mime_type());
        assert_eq!(Csv.mime_type(), "text/csv");
        assert_eq!(Svg.mime_type(), "image/svg+xml");
    }
}
