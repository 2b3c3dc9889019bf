// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster image decode and encode for the conversion pipeline.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use formwerk_core::error::{FormwerkError, Result};
use formwerk_core::types::Format;

use super::svg;

/// JPEG encode quality.
const JPEG_QUALITY: u8 = 85;

/// Decode an image payload in the given source format.
pub fn decode(bytes: &[u8], source: Format) -> Result<DynamicImage> {
    match source {
        Format::Svg => svg::rasterize(bytes),
        _ => ::image::load_from_memory(bytes)
            .map_err(|e| FormwerkError::MalformedInput(format!("image decode: {e}"))),
    }
}

/// Encode an image for the given target format.
///
/// JPEG cannot carry alpha, so transparent sources are flattened onto a
/// white background first. Every other raster target keeps the alpha
/// channel.
pub fn encode(image: &DynamicImage, target: Format) -> Result<Vec<u8>> {
    match target {
        Format::Png => encode_to_format(image, ImageFormat::Png),
        Format::Jpg | Format::Jpeg => encode_jpeg(image),
        Format::Gif => encode_to_format(image, ImageFormat::Gif),
        Format::Bmp => encode_to_format(image, ImageFormat::Bmp),
        Format::Webp => encode_to_format(image, ImageFormat::WebP),
        Format::Svg => svg::wrap_as_svg(image),
        other => Err(FormwerkError::WriteFailure(format!(
            "not an image target: {other}"
        ))),
    }
}

fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    match format {
        // PNG handles every sample layout the decoders produce.
        ImageFormat::Png => image.write_to(&mut buffer, format),
        // The remaining encoders only accept 8-bit RGB(A).
        _ => DynamicImage::ImageRgba8(image.to_rgba8()).write_to(&mut buffer, format),
    }
    .map_err(|e| FormwerkError::WriteFailure(format!("image encode: {e}")))?;
    Ok(buffer.into_inner())
}

fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>> {
    let flattened = flatten_onto_white(image);
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    flattened
        .write_with_encoder(encoder)
        .map_err(|e| FormwerkError::WriteFailure(format!("jpeg encode: {e}")))?;
    Ok(buffer.into_inner())
}

/// Alpha-blend every pixel onto a white background.
fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend =
            |c: u8| ((u16::from(c) * u16::from(a) + 255 * (255 - u16::from(a))) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}
