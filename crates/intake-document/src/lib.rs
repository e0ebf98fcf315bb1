// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// intake-document: File-to-PDF rendering for the Intake upload service.
//
// Classifies uploads by declared MIME type, locates stored files across the
// configured search roots, and produces a finished PDF: passthrough for PDFs,
// a fitted page for images, flowed body text for text files, and a metadata
// placeholder page for everything else.

pub mod classify;
pub mod download;
pub mod engine;
pub mod image;
pub mod pdf;
pub mod render;
pub mod resolve;

// Re-export the primary entry points so callers can use `intake_document::RenderEngine` etc.
pub use classify::classify;
pub use download::DownloadResponse;
pub use engine::{RenderEngine, RenderFailure, RenderOutcome, RenderedPdf, render_to_pdf};
pub use image::processor::ImageProcessor;
pub use pdf::reader::PdfInspector;
pub use pdf::writer::DocumentStream;
pub use render::page::{PageContent, PageRenderer, RenderNotice, RenderStepFailure, StepReport};
pub use resolve::{NotFoundDiagnostics, ResolvedFile, SearchPath};
