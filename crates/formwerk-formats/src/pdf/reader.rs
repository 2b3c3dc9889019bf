// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structural PDF inspection.

use formwerk_core::error::{FormwerkError, Result};

/// Parsed view of a PDF document.
pub struct PdfReader {
    document: lopdf::Document,
}

impl PdfReader {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let document = lopdf::Document::load_mem(bytes)
            .map_err(|e| FormwerkError::MalformedInput(format!("pdf parse: {e}")))?;
        Ok(Self { document })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::writer::PdfWriter;

    #[test]
    fn counts_pages_of_a_generated_document() {
        let pdf = PdfWriter::new("doc").create_from_text("one line").unwrap();
        let reader = PdfReader::from_bytes(&pdf).unwrap();
        assert_eq!(reader.page_count(), 1);
    }

    #[test]
    fn rejects_bytes_that_are_not_a_pdf() {
        assert!(matches!(
            PdfReader::from_bytes(b"plain text"),
            Err(FormwerkError::MalformedInput(_))
        ));
    }
}
