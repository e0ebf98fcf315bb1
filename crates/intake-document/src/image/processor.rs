// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decode uploaded image bytes with the `image` crate and
// prepare them for placement on a PDF page.

use std::io::Cursor;

use image::{DynamicImage, ImageReader, Limits};
use intake_core::error::IntakeError;
use printpdf::{RawImage, RawImageData, RawImageFormat};
use tracing::{debug, instrument};

/// Largest accepted width or height, in pixels.
pub const MAX_IMAGE_DIMENSION: u32 = 16_384;

/// Where a scaled image lands inside its fit box, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    /// Drawn width.
    pub width: f32,
    /// Drawn height.
    pub height: f32,
    /// Uniform scale applied to the image's natural size.
    pub scale: f32,
    /// Offset from the left edge of the fit box.
    pub offset_x: f32,
    /// Offset from the top edge of the fit box.
    pub offset_y: f32,
}

/// Scale an image of `img_w` x `img_h` to fit inside `box_w` x `box_h`,
/// preserving aspect ratio, and center it on both axes.
///
/// Images smaller than the box are scaled up. Returns `None` when either the
/// image or the box has no area.
pub fn fit_within(img_w: u32, img_h: u32, box_w: f32, box_h: f32) -> Option<Fit> {
    if img_w == 0 || img_h == 0 || !(box_w > 0.0) || !(box_h > 0.0) {
        return None;
    }

    let (iw, ih) = (img_w as f32, img_h as f32);
    let scale = (box_w / iw).min(box_h / ih);
    let width = iw * scale;
    let height = ih * scale;

    Some(Fit {
        width,
        height,
        scale,
        offset_x: (box_w - width) / 2.0,
        offset_y: (box_h - height) / 2.0,
    })
}

/// A decoded image ready to be embedded in a PDF.
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    /// Decode raw encoded bytes (PNG, JPEG, GIF, ...), sniffing the format
    /// from the content rather than trusting the declared type.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, IntakeError> {
        let mut reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|err| IntakeError::ImageError(format!("failed to read image: {err}")))?;

        let mut limits = Limits::default();
        limits.max_image_width = Some(MAX_IMAGE_DIMENSION);
        limits.max_image_height = Some(MAX_IMAGE_DIMENSION);
        reader.limits(limits);

        let image = reader
            .decode()
            .map_err(|err| IntakeError::ImageError(format!("failed to decode image: {err}")))?;

        debug!(
            width = image.width(),
            height = image.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Convert to an 8-bit RGB raster for printpdf.
    ///
    /// Transparent pixels are composited onto white so they do not come out
    /// black on the page.
    pub fn into_raw_image(self) -> RawImage {
        let width = self.image.width() as usize;
        let height = self.image.height() as usize;

        let pixels = if self.image.color().has_alpha() {
            let rgba = self.image.into_rgba8();
            let mut rgb = Vec::with_capacity(width * height * 3);
            for px in rgba.pixels() {
                let [r, g, b, a] = px.0;
                let alpha = a as u16;
                for channel in [r, g, b] {
                    let blended = (channel as u16 * alpha + 255 * (255 - alpha)) / 255;
                    rgb.push(blended as u8);
                }
            }
            rgb
        } else {
            self.image.into_rgb8().into_raw()
        };

        RawImage {
            pixels: RawImageData::U8(pixels),
            width,
            height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        }
    }
}
