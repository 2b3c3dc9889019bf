// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SVG support: rasterize vector sources at their natural size, and wrap
// raster output in an SVG shell embedding the pixels as a PNG data URI.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::DynamicImage;
use resvg::{tiny_skia, usvg};

use formwerk_core::error::{FormwerkError, Result};

/// Rasterize an SVG document at its declared size.
pub fn rasterize(bytes: &[u8]) -> Result<DynamicImage> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| FormwerkError::MalformedInput(format!("svg is not utf-8: {e}")))?;
    let tree = usvg::Tree::from_str(text, &usvg::Options::default())
        .map_err(|e| FormwerkError::MalformedInput(format!("svg parse: {e}")))?;

    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        FormwerkError::MalformedInput("svg has no drawable area".to_string())
    })?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    // Going through PNG sidesteps tiny-skia's premultiplied alpha layout.
    let png = pixmap
        .encode_png()
        .map_err(|e| FormwerkError::Unknown(format!("svg rasterize: {e}")))?;
    ::image::load_from_memory(&png)
        .map_err(|e| FormwerkError::Unknown(format!("svg rasterize: {e}")))
}

/// Wrap a raster image in an SVG document that embeds it as a PNG data URI.
pub fn wrap_as_svg(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    image
        .write_to(
            &mut std::io::Cursor::new(&mut png),
            ::image::ImageFormat::Png,
        )
        .map_err(|e| FormwerkError::WriteFailure(format!("svg wrap: {e}")))?;

    let w = image.width();
    let h = image.height();
    let data = STANDARD.encode(&png);
    let svg = format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\">\n",
            "  <image width=\"{w}\" height=\"{h}\" href=\"data:image/png;base64,{data}\"/>\n",
            "</svg>\n"
        ),
        w = w,
        h = h,
        data = data
    );
    Ok(svg.into_bytes())
}
