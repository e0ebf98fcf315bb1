// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Download responses: the status, headers, and body an HTTP layer sends for
// a render outcome, without tying the engine to any web framework.

use intake_core::error::IntakeError;
use intake_core::human_errors::humanize_error;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::engine::{RenderFailure, RenderOutcome};

/// Compute the SHA-256 of `data` as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Make a filename safe to place inside a quoted header parameter.
fn header_safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// A framework-agnostic HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl DownloadResponse {
    /// Map a render outcome to the response the download endpoint sends.
    ///
    /// Success streams the PDF as an attachment; a missing file answers 404
    /// with a JSON diagnostic body; anything else answers 500.
    pub fn from_outcome(outcome: RenderOutcome) -> Self {
        match outcome {
            Ok(rendered) => {
                let etag = format!("\"{}\"", hash_bytes(&rendered.bytes));
                let disposition = format!(
                    "attachment; filename=\"{}\"",
                    header_safe_file_name(&rendered.file_name)
                );
                debug!(status = 200, bytes = rendered.bytes.len(), "Download response built");
                Self {
                    status: 200,
                    headers: vec![
                        ("Content-Type".into(), "application/pdf".into()),
                        ("Content-Disposition".into(), disposition),
                        ("Content-Length".into(), rendered.bytes.len().to_string()),
                        ("ETag".into(), etag),
                    ],
                    body: rendered.bytes,
                }
            }
            Err(RenderFailure::FileNotFound(diagnostics)) => {
                let human = humanize_error(&IntakeError::FileNotFound {
                    locator: diagnostics.locator.clone(),
                });
                Self::json(
                    human.status,
                    json!({
                        "success": false,
                        "message": human.message,
                        "debug": {
                            "storedPath": diagnostics.locator,
                            "resolvedPath": null,
                            "probes": diagnostics.probes,
                        },
                    }),
                )
            }
            Err(RenderFailure::Internal(err)) => {
                let human = humanize_error(&err);
                Self::json(
                    human.status,
                    json!({
                        "success": false,
                        "message": human.message,
                        "error": err.to_string(),
                    }),
                )
            }
        }
    }

    fn json(status: u16, body: serde_json::Value) -> Self {
        let body = serde_json::to_vec(&body)
            .unwrap_or_else(|_| br#"{"success":false}"#.to_vec());
        debug!(status, "Download error response built");
        Self {
            status,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body,
        }
    }

    /// First header value with a case-insensitive name match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RenderedPdf;
    use crate::resolve::{NotFoundDiagnostics, RootProbe};
    use intake_core::Strategy;
    use std::path::PathBuf;

    fn rendered(name: &str, bytes: &[u8]) -> RenderedPdf {
        RenderedPdf {
            file_name: name.into(),
            bytes: bytes.to_vec(),
            strategy: Strategy::Text,
            notices: Vec::new(),
            source_path: PathBuf::from("/srv/uploads/file-1.txt"),
        }
    }

    #[test]
    fn hash_known_value() {
        let expected = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
        assert_eq!(hash_bytes(b"hello"), expected);
    }

    #[test]
    fn success_is_pdf_attachment() {
        let resp = DownloadResponse::from_outcome(Ok(rendered("report.final.pdf", b"%PDF-1.7")));
        assert_eq!(resp.status, 200);
        assert_eq!(resp.header("content-type"), Some("application/pdf"));
        assert_eq!(
            resp.header("Content-Disposition"),
            Some("attachment; filename=\"report.final.pdf\"")
        );
        assert_eq!(resp.header("Content-Length"), Some("8"));
        assert_eq!(resp.body, b"%PDF-1.7");
        let etag = resp.header("ETag").expect("etag");
        assert_eq!(etag, format!("\"{}\"", hash_bytes(b"%PDF-1.7")));
    }

    #[test]
    fn quotes_in_names_are_neutralised() {
        let resp = DownloadResponse::from_outcome(Ok(rendered("a\"b\\c.pdf", b"x")));
        assert_eq!(
            resp.header("Content-Disposition"),
            Some("attachment; filename=\"a_b_c.pdf\"")
        );
    }

    #[test]
    fn not_found_is_404_with_diagnostics() {
        let diagnostics = NotFoundDiagnostics {
            locator: "file-404.png".into(),
            probes: vec![RootProbe {
                root: PathBuf::from("/srv/uploads"),
                exists: false,
                sample_entries: Vec::new(),
            }],
        };
        let resp = DownloadResponse::from_outcome(Err(RenderFailure::FileNotFound(diagnostics)));
        assert_eq!(resp.status, 404);
        assert_eq!(resp.header("Content-Type"), Some("application/json"));

        let body: serde_json::Value = serde_json::from_slice(&resp.body).expect("json body");
        assert_eq!(body["success"], false);
        assert_eq!(body["debug"]["storedPath"], "file-404.png");
        assert_eq!(body["debug"]["probes"][0]["exists"], false);
    }

    #[test]
    fn internal_failure_is_500() {
        let resp = DownloadResponse::from_outcome(Err(RenderFailure::Internal(
            IntakeError::Render("PDF serialisation produced no bytes".into()),
        )));
        assert_eq!(resp.status, 500);
        let body: serde_json::Value = serde_json::from_slice(&resp.body).expect("json body");
        assert_eq!(body["message"], "Failed to generate report");
    }
}
