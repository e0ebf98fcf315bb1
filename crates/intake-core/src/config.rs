// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{IntakeError, Result};
use crate::upload::UploadPolicy;

/// Character ceiling applied to text uploads before layout.
pub const DEFAULT_MAX_TEXT_CHARS: usize = 500_000;

/// Page margin on every side, in points.
pub const DEFAULT_MARGIN_PT: f32 = 50.0;

/// Combined inset subtracted from the page size to get the image fit box and
/// the text column width.
pub const DEFAULT_CONTENT_INSET_PT: f32 = 100.0;

/// Page geometry and typesetting policy for generated documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Page size for every generated page.
    pub paper_size: crate::PaperSize,
    /// Margin on all four sides, in points.
    pub margin_pt: f32,
    /// Subtracted from page width/height for the image fit box and text width.
    pub content_inset_pt: f32,
    /// Text longer than this (in characters) is truncated with a marker.
    pub max_text_chars: usize,
    /// Font size for text-file body copy.
    pub body_font_size_pt: f32,
    /// Font size for notices and placeholder headings.
    pub notice_font_size_pt: f32,
    /// Font size for secondary placeholder lines.
    pub detail_font_size_pt: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            paper_size: crate::PaperSize::Letter,
            margin_pt: DEFAULT_MARGIN_PT,
            content_inset_pt: DEFAULT_CONTENT_INSET_PT,
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            body_font_size_pt: 10.0,
            notice_font_size_pt: 12.0,
            detail_font_size_pt: 10.0,
        }
    }
}

impl RenderConfig {
    /// Reject geometry that would leave no room for content.
    pub fn validate(&self) -> Result<()> {
        let (w, h) = self.paper_size.dimensions_pt();
        let min_side = w.min(h);
        if !(self.margin_pt >= 0.0 && self.margin_pt * 2.0 < min_side) {
            return Err(IntakeError::Config(format!(
                "margin {}pt does not fit a {}x{}pt page",
                self.margin_pt, w, h
            )));
        }
        if !(self.content_inset_pt >= 0.0 && self.content_inset_pt < min_side) {
            return Err(IntakeError::Config(format!(
                "content inset {}pt does not fit a {}x{}pt page",
                self.content_inset_pt, w, h
            )));
        }
        for size in [
            self.body_font_size_pt,
            self.notice_font_size_pt,
            self.detail_font_size_pt,
        ] {
            if !(size > 0.0) {
                return Err(IntakeError::Config(format!(
                    "font size must be positive, got {size}"
                )));
            }
        }
        Ok(())
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Document geometry and typesetting.
    pub render: RenderConfig,
    /// Directories probed, in order, when a stored locator is not a direct
    /// path. Earlier entries win.
    pub search_roots: Vec<PathBuf>,
    /// Limits the upload layer enforces before files reach storage.
    pub upload: UploadPolicy,
}

impl AppConfig {
    /// Load settings from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&data)?;
        config.render.validate()?;
        info!(
            path = %path.display(),
            roots = config.search_roots.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Write settings as pretty-printed JSON.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        debug!(path = %path.as_ref().display(), "Configuration written");
        Ok(())
    }
}
