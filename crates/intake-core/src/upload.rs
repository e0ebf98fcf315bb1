// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upload acceptance policy: which declared types and sizes the upload layer
// lets through to storage. The rendering engine never enforces these; they
// live here so the upload layer and the engine share one configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{IntakeError, Result};

/// 20 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// MIME types accepted at upload time.
pub const DEFAULT_ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "application/pdf",
    "text/plain",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/csv",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/html",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadPolicy {
    /// Largest accepted upload, in bytes.
    pub max_bytes: u64,
    /// Exact MIME types accepted.
    pub allowed_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl UploadPolicy {
    pub fn is_allowed_type(&self, mime: &str) -> bool {
        self.allowed_types.iter().any(|t| t == mime)
    }

    /// Check a declared type and size against the policy.
    pub fn validate(&self, mime: &str, size: u64) -> Result<()> {
        if !self.is_allowed_type(mime) {
            warn!(mime, "Upload rejected: type not allowed");
            return Err(IntakeError::UploadRejected(format!(
                "invalid file type {mime:?}; allowed types: txt, pdf, docx, csv, xlsx, html, jpg, jpeg, png, gif"
            )));
        }
        if size > self.max_bytes {
            warn!(size, max = self.max_bytes, "Upload rejected: too large");
            return Err(IntakeError::UploadRejected(format!(
                "file is {size} bytes; the limit is {} bytes",
                self.max_bytes
            )));
        }
        Ok(())
    }
}
