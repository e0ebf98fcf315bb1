// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content classification: map a declared MIME type to a rendering strategy.

use intake_core::Strategy;

/// Declared types that are laid out as body text.
pub const TEXT_TYPES: &[&str] = &["text/plain", "text/csv", "text/html"];

/// Classify a declared MIME type.
///
/// Total and deterministic: every input, including the empty string, maps to
/// exactly one strategy. Matching is case-sensitive because the stored type is
/// whatever the upload layer recorded verbatim.
///
/// Precedence: PDF, then image, then text, then unsupported. The PDF and text
/// checks are substring matches so parameterised types such as
/// `text/plain; charset=utf-8` still classify.
pub fn classify(declared_mime_type: &str) -> Strategy {
    if declared_mime_type.contains("application/pdf") {
        Strategy::PassthroughPdf
    } else if declared_mime_type.starts_with("image/") {
        Strategy::Image
    } else if TEXT_TYPES.iter().any(|t| declared_mime_type.contains(t)) {
        Strategy::Text
    } else {
        Strategy::Unsupported
    }
}
