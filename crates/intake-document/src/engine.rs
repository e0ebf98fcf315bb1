// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rendering engine: resolve a stored upload, classify it, and produce one
// complete PDF or one terminal failure.
//
// Flow for a single call:
//
//   resolving ──> not found (terminal)
//       │
//       └──> resolved ──> classifying ──> passthrough ──> done
//                               │
//                               └──> rendering ──> finalised ──> done
//
// The output is fully buffered before it is returned, so a caller never sees
// a partial document. The engine holds no mutable state and can be shared
// across threads.

use std::path::PathBuf;

use intake_core::error::IntakeError;
use intake_core::{AppConfig, RenderConfig, RenderRequest, Strategy};
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::classify::classify;
use crate::pdf::writer::DocumentStream;
use crate::render::page::{PageContent, PageRenderer, RenderNotice};
use crate::resolve::{NotFoundDiagnostics, ResolvedFile, SearchPath};

/// Terminal failure of a render call.
#[derive(Debug, Error)]
pub enum RenderFailure {
    /// The locator matched nothing in any search root. Not retryable.
    #[error("stored file {:?} not found in any search root", .0.locator)]
    FileNotFound(NotFoundDiagnostics),

    /// Reading the resolved file or finalising the document failed.
    #[error("internal render error: {0}")]
    Internal(#[source] IntakeError),
}

impl From<RenderFailure> for IntakeError {
    fn from(failure: RenderFailure) -> Self {
        match failure {
            RenderFailure::FileNotFound(diagnostics) => IntakeError::FileNotFound {
                locator: diagnostics.locator,
            },
            RenderFailure::Internal(err) => err,
        }
    }
}

/// A finished PDF ready to send.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    /// Suggested download name, always ending in `.pdf`.
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub strategy: Strategy,
    /// Soft failures absorbed during rendering.
    pub notices: Vec<RenderNotice>,
    /// The file the content came from.
    pub source_path: PathBuf,
}

impl RenderedPdf {
    /// Whether the stored bytes were sent unchanged.
    pub fn is_passthrough(&self) -> bool {
        self.strategy == Strategy::PassthroughPdf
    }

    /// Whether any placeholder replaced real content.
    pub fn is_degraded(&self) -> bool {
        self.notices.iter().any(|n| {
            matches!(
                n,
                RenderNotice::StepFailed { .. } | RenderNotice::UnsupportedType { .. }
            )
        })
    }
}

/// One complete PDF, or one terminal failure.
pub type RenderOutcome = Result<RenderedPdf, RenderFailure>;

/// Renders stored uploads to PDF.
#[derive(Debug, Clone, Default)]
pub struct RenderEngine {
    config: RenderConfig,
    search_path: SearchPath,
}

impl RenderEngine {
    pub fn new(config: RenderConfig, search_path: SearchPath) -> Self {
        Self {
            config,
            search_path,
        }
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(
            config.render.clone(),
            SearchPath::new(config.search_roots.iter().cloned()),
        )
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    /// Render the upload described by `request`.
    #[instrument(
        skip(self, request),
        fields(
            record_id = request.record_id,
            locator = %request.stored_file_locator,
            mime = %request.declared_mime_type,
        )
    )]
    pub fn render(&self, request: &RenderRequest) -> RenderOutcome {
        let file_name = request.output_file_name();

        let resolved = self
            .search_path
            .resolve(&request.stored_file_locator)
            .map_err(RenderFailure::FileNotFound)?;

        let file = match ResolvedFile::read(resolved) {
            Ok(file) => file,
            // Removed between the existence probe and the read.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(RenderFailure::FileNotFound(NotFoundDiagnostics {
                    locator: request.stored_file_locator.clone(),
                    probes: Vec::new(),
                }));
            }
            Err(err) => {
                error!(error = %err, "Failed to read stored file");
                return Err(RenderFailure::Internal(IntakeError::Io(err)));
            }
        };
        debug!(path = %file.absolute_path.display(), rule = ?file.rule, bytes = file.bytes.len(), "Stored file resolved");

        let strategy = classify(&request.declared_mime_type);
        debug!(%strategy, "Content classified");

        if strategy == Strategy::PassthroughPdf {
            info!(file_name = %file_name, bytes = file.bytes.len(), "Passing PDF through unchanged");
            return Ok(RenderedPdf {
                file_name,
                bytes: file.bytes,
                strategy,
                notices: Vec::new(),
                source_path: file.absolute_path,
            });
        }

        let mut stream = DocumentStream::new(&file_name, &self.config);
        let report = PageRenderer::new(&self.config).render(
            &mut stream,
            &PageContent {
                strategy,
                bytes: &file.bytes,
                declared_mime_type: &request.declared_mime_type,
                declared_byte_size: request.declared_byte_size,
            },
        );

        let bytes = stream.finish().map_err(|err| {
            error!(error = %err, "Failed to finalise document");
            RenderFailure::Internal(err)
        })?;

        info!(
            file_name = %file_name,
            %strategy,
            bytes = bytes.len(),
            notices = report.notices.len(),
            "PDF rendered"
        );

        Ok(RenderedPdf {
            file_name,
            bytes,
            strategy,
            notices: report.notices,
            source_path: file.absolute_path,
        })
    }
}

/// Render with the default page layout against the given search roots.
pub fn render_to_pdf(request: &RenderRequest, search_roots: &[PathBuf]) -> RenderOutcome {
    RenderEngine::new(
        RenderConfig::default(),
        SearchPath::new(search_roots.iter().cloned()),
    )
    .render(request)
}
