// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF rasterization through Pdfium.

use image::DynamicImage;
use pdfium_render::prelude::*;

use formwerk_core::error::{FormwerkError, Result};

/// Bind to a Pdfium library, preferring a copy shipped next to the binary
/// and falling back to a system install.
fn bind() -> Result<Pdfium> {
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| FormwerkError::RasterUnavailable(format!("pdfium: {e}")))
}

/// Render the first page of a PDF at the given scale factor.
pub fn first_page_to_image(bytes: &[u8], scale: f32) -> Result<DynamicImage> {
    let pdfium = bind()?;
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| FormwerkError::MalformedInput(format!("pdf load: {e}")))?;
    let page = document
        .pages()
        .get(0)
        .map_err(|e| FormwerkError::MalformedInput(format!("pdf has no pages: {e}")))?;

    let config = PdfRenderConfig::new().scale_page_by_factor(scale);
    let rendered = page
        .render_with_config(&config)
        .map_err(|e| FormwerkError::Unknown(format!("pdf render: {e}")))?;
    Ok(rendered.as_image())
}
