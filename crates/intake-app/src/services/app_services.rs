// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: loads configuration once and exposes the rendering
// engine and upload policy to the command handlers.

use std::path::{Path, PathBuf};

use intake_core::error::Result;
use intake_core::{AppConfig, RenderRequest, Strategy};
use intake_document::render::RenderNotice;
use intake_document::{PdfInspector, RenderEngine, RenderOutcome, RenderedPdf, classify};
use serde::Serialize;
use tracing::{info, warn};

use super::data_dir;

/// Shared services for one CLI invocation.
pub struct AppServices {
    config: AppConfig,
    engine: RenderEngine,
}

impl AppServices {
    /// Load configuration and build the engine.
    ///
    /// An explicit `config_path` must exist. Without one, the default config
    /// file is used when present, else built-in defaults. Non-empty
    /// `roots_override` replaces the configured search roots; if no roots are
    /// configured at all the default upload directories are used.
    pub fn init(config_path: Option<&Path>, roots_override: Vec<PathBuf>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => AppConfig::load(path)?,
            None => load_config(&data_dir::default_config_path()).unwrap_or_default(),
        };

        if !roots_override.is_empty() {
            config.search_roots = roots_override;
        }
        if config.search_roots.is_empty() {
            config.search_roots = data_dir::default_search_roots();
        }
        config.render.validate()?;

        info!(
            roots = ?config.search_roots,
            paper = ?config.render.paper_size,
            "App services initialised"
        );

        let engine = RenderEngine::from_app_config(&config);
        Ok(Self { config, engine })
    }

    /// Render one stored upload.
    pub fn render(&self, request: &RenderRequest) -> RenderOutcome {
        self.engine.render(request)
    }

    /// Size of the file a locator resolves to, or 0 if it resolves to nothing.
    pub fn stored_size(&self, locator: &str) -> u64 {
        self.engine
            .search_path()
            .resolve(locator)
            .ok()
            .and_then(|resolved| std::fs::metadata(resolved.path).ok())
            .map(|meta| meta.len())
            .unwrap_or(0)
    }

    /// Check a prospective upload against the configured policy.
    pub fn check_upload(&self, mime: &str, size: u64) -> Result<Strategy> {
        self.config.upload.validate(mime, size)?;
        Ok(classify(mime))
    }
}

fn load_config(path: &Path) -> Option<AppConfig> {
    if !path.exists() {
        return None;
    }
    match AppConfig::load(path) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
            None
        }
    }
}

/// Machine-readable summary of a successful render.
#[derive(Debug, Serialize)]
pub struct RenderSummary {
    pub file_name: String,
    pub strategy: Strategy,
    pub bytes: usize,
    /// Page count, when the output parses as a PDF.
    pub pages: Option<usize>,
    pub passthrough: bool,
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub notices: Vec<RenderNotice>,
}

impl RenderSummary {
    pub fn new(rendered: &RenderedPdf, output_path: PathBuf) -> Self {
        let pages = match PdfInspector::from_bytes(&rendered.bytes) {
            Ok(pdf) => Some(pdf.page_count()),
            Err(e) => {
                warn!(error = %e, "Output does not parse as PDF");
                None
            }
        };
        Self {
            file_name: rendered.file_name.clone(),
            strategy: rendered.strategy,
            bytes: rendered.bytes.len(),
            pages,
            passthrough: rendered.is_passthrough(),
            source_path: rendered.source_path.clone(),
            output_path,
            notices: rendered.notices.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::IntakeError;

    #[test]
    fn roots_override_replaces_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("intake.json");
        std::fs::write(&path, r#"{ "search_roots": ["/configured"] }"#).expect("write");

        let svc = AppServices::init(Some(&path), vec![dir.path().to_path_buf()]).expect("init");
        assert_eq!(svc.config.search_roots, vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = AppServices::init(Some(&dir.path().join("nope.json")), Vec::new());
        assert!(matches!(result, Err(IntakeError::Io(_))));
    }

    #[test]
    fn render_and_summarise() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("notes.txt"), "a,b\n1,2\n").expect("write");
        let svc = AppServices::init(None, vec![dir.path().to_path_buf()]).expect("init");

        assert_eq!(svc.stored_size("notes.txt"), 8);
        assert_eq!(svc.stored_size("absent.txt"), 0);

        let request = RenderRequest::new(5, "notes.txt", "text/csv", 8, "notes.csv");
        let rendered = svc.render(&request).expect("render");
        let summary = RenderSummary::new(&rendered, dir.path().join("notes.pdf"));
        assert_eq!(summary.file_name, "notes.pdf");
        assert_eq!(summary.pages, Some(1));
        assert!(!summary.passthrough);
    }

    #[test]
    fn upload_check_uses_policy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let svc = AppServices::init(None, vec![dir.path().to_path_buf()]).expect("init");
        assert_eq!(svc.check_upload("image/gif", 10).expect("allowed"), Strategy::Image);
        assert!(svc.check_upload("application/zip", 10).is_err());
    }
}
