// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intake: Core types, configuration, and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;
pub mod upload;

pub use config::{AppConfig, RenderConfig};
pub use error::IntakeError;
pub use types::*;
pub use upload::UploadPolicy;
