// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rasterizer — decode one user image and re-encode it as fixed-quality JPEG
// at its original pixel size, ready for embedding in a PDF page.

use std::io::Cursor;
use std::num::NonZeroU32;

use folio_core::{DecodeError, ImageInput};
use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::{debug, instrument};

/// JPEG quality used for every embedded image (the 0.8 quality factor).
pub const JPEG_QUALITY: u8 = 80;

/// An image normalised for embedding.
///
/// Produced from exactly one [`ImageInput`] and handed straight to the
/// document sink, which consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterResult {
    /// JPEG bytes at the original resolution.
    pub encoded: Vec<u8>,
    pub pixel_width: NonZeroU32,
    pub pixel_height: NonZeroU32,
}

/// Decodes image blobs and re-encodes them as JPEG.
///
/// Never resamples: resizing happens only when the sink scales the image
/// onto its page.
#[derive(Debug, Clone, Copy)]
pub struct Rasterizer {
    quality: u8,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self {
            quality: JPEG_QUALITY,
        }
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterise a single image.
    ///
    /// Fails with a [`DecodeError`] when the declared media type is not an
    /// image type, disagrees with the content, or the bytes cannot be
    /// decoded into a non-empty bitmap.
    #[instrument(skip(self, input), fields(name = input.name(), bytes_len = input.byte_size()))]
    pub fn rasterize(&self, input: &ImageInput) -> Result<RasterResult, DecodeError> {
        if !input.is_image_type() {
            return Err(DecodeError::UnsupportedMediaType(
                input.media_type().to_string(),
            ));
        }

        let bitmap = decode_scoped(input)?;

        let (width, height) = (bitmap.width(), bitmap.height());
        let (Some(pixel_width), Some(pixel_height)) =
            (NonZeroU32::new(width), NonZeroU32::new(height))
        else {
            return Err(DecodeError::ZeroDimension { width, height });
        };

        let encoded = encode_jpeg(&bitmap, self.quality)?;
        debug!(
            width,
            height,
            jpeg_bytes = encoded.len(),
            "Image rasterised"
        );

        Ok(RasterResult {
            encoded,
            pixel_width,
            pixel_height,
        })
    }
}

/// Decode the blob into a bitmap.
///
/// The reader borrows the input bytes only for the duration of this call and
/// is dropped on every return path, so no per-item decode state outlives
/// the item.
fn decode_scoped(input: &ImageInput) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(input.data()))
        .with_guessed_format()
        .map_err(|err| DecodeError::Corrupt(err.to_string()))?;

    let detected = reader
        .format()
        .ok_or_else(|| DecodeError::Corrupt("unrecognised image format".into()))?;

    let declared_mime = input.media_type().to_ascii_lowercase();
    if let Some(declared) = ImageFormat::from_mime_type(&declared_mime)
        && declared != detected
    {
        return Err(DecodeError::MediaTypeMismatch {
            declared: input.media_type().to_string(),
            detected: format!("{detected:?}"),
        });
    }

    reader
        .decode()
        .map_err(|err| DecodeError::Corrupt(err.to_string()))
}

/// Encode as baseline JPEG. Alpha is dropped; JPEG has no alpha channel.
fn encode_jpeg(bitmap: &DynamicImage, quality: u8) -> Result<Vec<u8>, DecodeError> {
    let mut buffer = Vec::new();
    let rgb = bitmap.to_rgb8();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|err| DecodeError::Encode(err.to_string()))?;
    Ok(buffer)
}
