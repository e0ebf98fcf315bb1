// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: decoding uploads and fitting them onto a page.

pub mod processor;

pub use processor::{Fit, ImageProcessor, fit_within};
