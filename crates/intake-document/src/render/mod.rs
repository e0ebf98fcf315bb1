// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render module: turning classified content into page operations.

pub mod page;

pub use page::{PageContent, PageRenderer, RenderNotice, RenderStepFailure, StepReport};
