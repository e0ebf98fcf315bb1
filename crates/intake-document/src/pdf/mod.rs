// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: building new documents, measuring text, and inspecting
// finished ones.

pub mod metrics;
pub mod reader;
pub mod writer;

pub use reader::PdfInspector;
pub use writer::{Align, DocumentStream};
