// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Intake.

use thiserror::Error;

/// Top-level error type for all Intake operations.
#[derive(Debug, Error)]
pub enum IntakeError {
    // -- Rendering errors --
    #[error("stored file not found: {locator}")]
    FileNotFound { locator: String },

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Upload policy --
    #[error("upload rejected: {0}")]
    UploadRejected(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, IntakeError>;
