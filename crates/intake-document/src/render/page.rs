// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page renderer: draw one strategy's content into an open document stream.
//
// Every strategy returns `Result<(), RenderStepFailure>`. A failure never
// escapes this module: it is turned into a centered placeholder line on the
// same document and recorded as a `RenderNotice`, so one bad upload still
// yields a complete PDF.

use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};

use intake_core::{RenderConfig, Strategy};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::image::processor::{ImageProcessor, fit_within};
use crate::pdf::writer::{Align, DocumentStream};

/// Appended to text that exceeds the character ceiling.
pub const TRUNCATION_MARKER: &str = "\n\n[... Content truncated due to length ...]";

pub const IMAGE_PLACEHOLDER: &str = "Could not embed image in PDF.";
pub const TEXT_PLACEHOLDER: &str = "Could not read text content.";
pub const GENERIC_PLACEHOLDER: &str = "Error processing file content.";
pub const UNSUPPORTED_NOTICE: &str = "This file type cannot be converted to PDF.";

/// A recoverable failure inside one rendering step.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RenderStepFailure {
    #[error("image could not be decoded: {0}")]
    ImageDecode(String),

    #[error("image could not be placed: {0}")]
    ImagePlacement(String),

    #[error("text is not valid UTF-8: {0}")]
    TextDecode(String),

    #[error("unexpected failure while drawing: {0}")]
    Unexpected(String),
}

impl RenderStepFailure {
    /// Line drawn in place of the content that failed.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::ImageDecode(_) | Self::ImagePlacement(_) => IMAGE_PLACEHOLDER,
            Self::TextDecode(_) => TEXT_PLACEHOLDER,
            Self::Unexpected(_) => GENERIC_PLACEHOLDER,
        }
    }
}

/// Something the caller may want to know about a successful render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum RenderNotice {
    /// The declared type has no renderer; a placeholder page was produced.
    UnsupportedType { declared_mime_type: String },
    /// Text was cut at the character ceiling.
    TextTruncated { original_chars: usize, kept_chars: usize },
    /// A step failed and its placeholder line was drawn instead.
    StepFailed { failure: RenderStepFailure },
}

/// Result of rendering one piece of content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    pub notices: Vec<RenderNotice>,
}

impl StepReport {
    /// The step failure, if the content had to be replaced by a placeholder.
    pub fn failure(&self) -> Option<&RenderStepFailure> {
        self.notices.iter().find_map(|n| match n {
            RenderNotice::StepFailed { failure } => Some(failure),
            _ => None,
        })
    }
}

/// Content handed to the page renderer.
#[derive(Debug, Clone, Copy)]
pub struct PageContent<'a> {
    pub strategy: Strategy,
    pub bytes: &'a [u8],
    pub declared_mime_type: &'a str,
    pub declared_byte_size: u64,
}

/// Draws classified content using the configured typesetting policy.
pub struct PageRenderer<'a> {
    config: &'a RenderConfig,
}

impl<'a> PageRenderer<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    /// Render `content` into `stream`. Never fails and never unwinds.
    #[instrument(skip_all, fields(strategy = %content.strategy, bytes = content.bytes.len()))]
    pub fn render(&self, stream: &mut DocumentStream, content: &PageContent<'_>) -> StepReport {
        let mut report = StepReport::default();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.render_strategy(stream, content, &mut report)
        }))
        .unwrap_or_else(|payload| Err(RenderStepFailure::Unexpected(panic_message(payload.as_ref()))));

        if let Err(failure) = outcome {
            warn!(%failure, "Rendering step failed; drawing placeholder");
            stream.centered_text(failure.placeholder(), self.config.notice_font_size_pt);
            report.notices.push(RenderNotice::StepFailed { failure });
        }

        report
    }

    fn render_strategy(
        &self,
        stream: &mut DocumentStream,
        content: &PageContent<'_>,
        report: &mut StepReport,
    ) -> Result<(), RenderStepFailure> {
        match content.strategy {
            Strategy::Image => self.render_image(stream, content.bytes),
            Strategy::Text => self.render_text(stream, content.bytes, report),
            Strategy::Unsupported => {
                self.render_unsupported(stream, content);
                report.notices.push(RenderNotice::UnsupportedType {
                    declared_mime_type: content.declared_mime_type.to_owned(),
                });
                Ok(())
            }
            Strategy::PassthroughPdf => Err(RenderStepFailure::Unexpected(
                "PDF content is passed through, not drawn".into(),
            )),
        }
    }

    // -- Image ----------------------------------------------------------------

    fn render_image(&self, stream: &mut DocumentStream, bytes: &[u8]) -> Result<(), RenderStepFailure> {
        let processor = ImageProcessor::from_bytes(bytes)
            .map_err(|err| RenderStepFailure::ImageDecode(err.to_string()))?;

        let box_w = stream.page_width() - self.config.content_inset_pt;
        let box_h = stream.page_height() - self.config.content_inset_pt;
        let fit = fit_within(processor.width(), processor.height(), box_w, box_h).ok_or_else(|| {
            RenderStepFailure::ImagePlacement(format!(
                "{}x{}px image cannot fit a {box_w}x{box_h}pt box",
                processor.width(),
                processor.height()
            ))
        })?;

        stream.place_image(&processor.into_raw_image(), &fit);
        debug!(scale = fit.scale, "Image rendered");
        Ok(())
    }

    // -- Text -----------------------------------------------------------------

    fn render_text(
        &self,
        stream: &mut DocumentStream,
        bytes: &[u8],
        report: &mut StepReport,
    ) -> Result<(), RenderStepFailure> {
        let text = std::str::from_utf8(bytes)
            .map_err(|err| RenderStepFailure::TextDecode(err.to_string()))?;

        let display = truncate_text(text, self.config.max_text_chars);
        if let Cow::Owned(_) = display {
            let original_chars = text.chars().count();
            debug!(original_chars, kept = self.config.max_text_chars, "Text truncated");
            report.notices.push(RenderNotice::TextTruncated {
                original_chars,
                kept_chars: self.config.max_text_chars,
            });
        }

        let width = stream.page_width() - self.config.content_inset_pt;
        stream.text(&display, self.config.body_font_size_pt, width, Align::Left);
        Ok(())
    }

    // -- Unsupported ----------------------------------------------------------

    fn render_unsupported(&self, stream: &mut DocumentStream, content: &PageContent<'_>) {
        stream.centered_text(
            &format!("File Type: {}", content.declared_mime_type),
            self.config.notice_font_size_pt,
        );
        stream.move_down();
        stream.centered_text(UNSUPPORTED_NOTICE, self.config.detail_font_size_pt);
        stream.centered_text(
            &format!("File Size: {} KB", format_kib(content.declared_byte_size)),
            self.config.detail_font_size_pt,
        );
    }
}

/// Keep at most `max_chars` characters of `text`, appending
/// [`TRUNCATION_MARKER`] when anything was cut. Borrows when nothing changes.
pub fn truncate_text(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
            out.push_str(&text[..cut]);
            out.push_str(TRUNCATION_MARKER);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(text),
    }
}

/// Byte count as kibibytes with two decimals, e.g. `1536` → `1.50`.
pub fn format_kib(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic while drawing".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn render(strategy: Strategy, bytes: &[u8], mime: &str, size: u64) -> (StepReport, Vec<u8>) {
        let config = RenderConfig::default();
        let mut stream = DocumentStream::new("test", &config);
        let report = PageRenderer::new(&config).render(
            &mut stream,
            &PageContent {
                strategy,
                bytes,
                declared_mime_type: mime,
                declared_byte_size: size,
            },
        );
        (report, stream.finish().expect("finish"))
    }

    fn png() -> Vec<u8> {
        let img = RgbImage::from_pixel(64, 32, Rgb([200, 30, 30]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .expect("encode");
        out.into_inner()
    }

    #[test]
    fn truncation_keeps_exact_prefix_and_marker() {
        let text = "a".repeat(600_000);
        let out = truncate_text(&text, 500_000);
        assert!(matches!(out, Cow::Owned(_)));
        assert_eq!(out.len(), 500_000 + TRUNCATION_MARKER.len());
        assert_eq!(&out[..500_000], &text[..500_000]);
        assert!(out.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn short_text_is_unmodified() {
        let out = truncate_text("0123456789", 500_000);
        assert!(matches!(out, Cow::Borrowed("0123456789")));
    }

    #[test]
    fn text_at_ceiling_is_not_truncated() {
        let text = "é".repeat(8);
        assert_eq!(truncate_text(&text, 8), text);
        assert_eq!(truncate_text(&text, 7), format!("{}{TRUNCATION_MARKER}", "é".repeat(7)));
    }

    #[test]
    fn kib_formatting() {
        assert_eq!(format_kib(0), "0.00");
        assert_eq!(format_kib(1024), "1.00");
        assert_eq!(format_kib(1536), "1.50");
        assert_eq!(format_kib(20 * 1024 * 1024), "20480.00");
    }

    #[test]
    fn image_renders_without_notices() {
        let (report, bytes) = render(Strategy::Image, &png(), "image/png", 100);
        assert!(report.notices.is_empty());
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn bad_image_degrades_to_placeholder() {
        let (report, bytes) = render(Strategy::Image, b"not a png", "image/png", 9);
        let failure = report.failure().expect("failure recorded");
        assert!(matches!(failure, RenderStepFailure::ImageDecode(_)));
        assert_eq!(failure.placeholder(), IMAGE_PLACEHOLDER);
        assert!(!bytes.is_empty());
    }

    #[test]
    fn invalid_utf8_degrades_to_placeholder() {
        let (report, _) = render(Strategy::Text, &[0xff, 0xfe, 0x00], "text/plain", 3);
        assert!(matches!(report.failure(), Some(RenderStepFailure::TextDecode(_))));
    }

    #[test]
    fn oversized_text_reports_truncation() {
        let config = RenderConfig {
            max_text_chars: 100,
            ..RenderConfig::default()
        };
        let mut stream = DocumentStream::new("t", &config);
        let text = "word ".repeat(100);
        let report = PageRenderer::new(&config).render(
            &mut stream,
            &PageContent {
                strategy: Strategy::Text,
                bytes: text.as_bytes(),
                declared_mime_type: "text/plain",
                declared_byte_size: text.len() as u64,
            },
        );
        assert_eq!(
            report.notices,
            vec![RenderNotice::TextTruncated {
                original_chars: 500,
                kept_chars: 100
            }]
        );
    }

    #[test]
    fn unsupported_records_notice() {
        let (report, bytes) = render(Strategy::Unsupported, b"PK\x03\x04", "application/zip", 2048);
        assert_eq!(
            report.notices,
            vec![RenderNotice::UnsupportedType {
                declared_mime_type: "application/zip".into()
            }]
        );
        assert!(report.failure().is_none());
        assert!(!bytes.is_empty());
    }

    #[test]
    fn passthrough_is_not_drawable() {
        let (report, _) = render(Strategy::PassthroughPdf, b"%PDF-1.4", "application/pdf", 8);
        let failure = report.failure().expect("failure");
        assert_eq!(failure.placeholder(), GENERIC_PLACEHOLDER);
    }

    #[test]
    fn failures_serialise_with_kind() {
        let json = serde_json::to_value(RenderStepFailure::TextDecode("bad byte".into()))
            .expect("serialise");
        assert_eq!(json["kind"], "text_decode");
        assert_eq!(json["detail"], "bad byte");
    }
}
