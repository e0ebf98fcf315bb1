// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF inspector: parse finished or passed-through PDFs with `lopdf` to
// report page counts and version for diagnostics.

use intake_core::error::IntakeError;
use lopdf::Document;
use tracing::{debug, instrument};

/// Read-only view of a parsed PDF.
pub struct PdfInspector {
    document: Document,
}

impl PdfInspector {
    /// Parse PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, IntakeError> {
        let document = Document::load_mem(data).map_err(|err| {
            IntakeError::Render(format!("failed to parse PDF: {err}"))
        })?;
        debug!(pages = document.get_pages().len(), "PDF parsed");
        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Header version string, e.g. `1.3`.
    pub fn version(&self) -> &str {
        &self.document.version
    }
}

/// Whether `data` starts with the `%PDF-` magic.
pub fn has_pdf_header(data: &[u8]) -> bool {
    data.starts_with(b"%PDF-")
}
