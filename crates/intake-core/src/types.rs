// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Intake rendering engine.

use serde::{Deserialize, Serialize};

/// Points per millimetre (1 pt = 1/72 in, 1 in = 25.4 mm).
const PT_PER_MM: f32 = 72.0 / 25.4;

/// Everything the rendering engine needs to know about one stored upload.
///
/// Built by the caller from the persisted upload record; the engine never
/// mutates or persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Identifier of the result record being downloaded.
    pub record_id: i64,
    /// Filename or path recorded by the upload layer at upload time.
    pub stored_file_locator: String,
    /// MIME type declared by the client when uploading.
    pub declared_mime_type: String,
    /// Size in bytes recorded at upload time.
    pub declared_byte_size: u64,
    /// The client's original filename.
    pub logical_file_name: String,
}

impl RenderRequest {
    pub fn new(
        record_id: i64,
        stored_file_locator: impl Into<String>,
        declared_mime_type: impl Into<String>,
        declared_byte_size: u64,
        logical_file_name: impl Into<String>,
    ) -> Self {
        Self {
            record_id,
            stored_file_locator: stored_file_locator.into(),
            declared_mime_type: declared_mime_type.into(),
            declared_byte_size,
            logical_file_name: logical_file_name.into(),
        }
    }

    /// Suggested download filename: the logical name with its extension
    /// replaced by `.pdf`.
    pub fn output_file_name(&self) -> String {
        pdf_file_name(&self.logical_file_name, self.record_id)
    }
}

/// Compute `<name-without-extension>.pdf` for a logical file name.
///
/// Only the final path component is used. The extension is the text after
/// the last `.`, provided that dot is neither the first nor the last
/// character (`.env` and `notes.` keep their dots). An empty name falls back
/// to `file_<record_id>`.
///
/// Dotfiles are deliberately treated as having no extension: `.env` becomes
/// `.env.pdf`, not a bare `.pdf` as a plain "strip the last `.xxx`" rule
/// would give, so the download name never loses the whole stem.
pub fn pdf_file_name(logical_file_name: &str, record_id: i64) -> String {
    let name = logical_file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let stem = match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => &name[..idx],
        _ => name,
    };

    if stem.is_empty() {
        format!("file_{record_id}.pdf")
    } else {
        format!("{stem}.pdf")
    }
}

/// How a stored file is turned into PDF output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Already a PDF: stream the stored bytes unchanged.
    PassthroughPdf,
    /// Raster image placed on a single page.
    Image,
    /// UTF-8 text laid out as body copy.
    Text,
    /// Anything else: a metadata placeholder page.
    Unsupported,
}

impl Strategy {
    /// Short lowercase label used in logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PassthroughPdf => "passthrough-pdf",
            Self::Image => "image",
            Self::Text => "text",
            Self::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Dimensions in PostScript points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            Self::A4 => (595.28, 841.89),
            Self::A3 => (841.89, 1190.55),
            Self::A5 => (419.53, 595.28),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::Tabloid => (792.0, 1224.0),
            Self::Custom {
                width_mm,
                height_mm,
            } => (width_mm * PT_PER_MM, height_mm * PT_PER_MM),
        }
    }

    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        let (w, h) = self.dimensions_pt();
        (w / PT_PER_MM, h / PT_PER_MM)
    }
}
