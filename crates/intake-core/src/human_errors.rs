// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing error messages.
//
// Every error is mapped to a short message, a suggestion, and the HTTP status
// the download endpoint should answer with.

use crate::error::IntakeError;

/// Severity of an error from the caller's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The client asked for something that does not exist or is not allowed.
    ClientError,
    /// Something broke on our side; the request itself was fine.
    ServerError,
}

/// A user-facing error with a plain message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short summary shown to the client.
    pub message: String,
    /// What the client could try next.
    pub suggestion: String,
    /// HTTP status code for this failure.
    pub status: u16,
    pub severity: Severity,
}

/// Convert an `IntakeError` into a `HumanError`.
pub fn humanize_error(err: &IntakeError) -> HumanError {
    match err {
        IntakeError::FileNotFound { .. } => HumanError {
            message: "File not found. The uploaded file may have been removed or the path is incorrect."
                .into(),
            suggestion: "Upload the file again, then retry the download.".into(),
            status: 404,
            severity: Severity::ClientError,
        },

        IntakeError::UploadRejected(detail) => HumanError {
            message: "This upload was not accepted.".into(),
            suggestion: format!("Check the file type and size, then upload again. ({detail})"),
            status: 400,
            severity: Severity::ClientError,
        },

        IntakeError::Render(detail) | IntakeError::ImageError(detail) => HumanError {
            message: "Failed to generate report".into(),
            suggestion: format!("Try the download again later. ({detail})"),
            status: 500,
            severity: Severity::ServerError,
        },

        IntakeError::Config(detail) => HumanError {
            message: "The service is misconfigured.".into(),
            suggestion: format!("Fix the configuration file and restart. ({detail})"),
            status: 500,
            severity: Severity::ServerError,
        },

        IntakeError::Io(io) => HumanError {
            message: "Failed to generate report".into(),
            suggestion: format!("The stored file could not be read. ({io})"),
            status: 500,
            severity: Severity::ServerError,
        },

        IntakeError::Serialization(detail) => HumanError {
            message: "Failed to generate report".into(),
            suggestion: format!("Internal data could not be encoded. ({detail})"),
            status: 500,
            severity: Severity::ServerError,
        },
    }
}
