// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stored-file resolution.
//
// Uploads written by different versions of the upload layer recorded their
// locators differently: some as absolute paths, some as paths relative to an
// old working directory, some as bare filenames. Resolution therefore tries,
// in order:
//
//   1. the locator itself, if it names an existing file;
//   2. the locator's final path segment inside each search root;
//   3. for separator-free locators, the verbatim locator inside each root.
//
// The first existing file wins. When nothing matches, the caller gets a
// `NotFoundDiagnostics` describing every root that was probed.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Directory entries listed per root in not-found diagnostics.
const SAMPLE_ENTRIES: usize = 5;

/// Which resolution step located the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionRule {
    DirectPath,
    BasenameInRoot,
    VerbatimInRoot,
}

/// A locator matched to a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub rule: ResolutionRule,
}

/// A resolved file with its contents loaded.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    pub absolute_path: PathBuf,
    pub bytes: Vec<u8>,
    pub rule: ResolutionRule,
}

impl ResolvedFile {
    /// Read the file behind `resolved`.
    pub fn read(resolved: ResolvedPath) -> std::io::Result<Self> {
        let bytes = std::fs::read(&resolved.path)?;
        let absolute_path = std::path::absolute(&resolved.path).unwrap_or(resolved.path);
        Ok(Self {
            absolute_path,
            bytes,
            rule: resolved.rule,
        })
    }
}

/// State of one search root at the time resolution failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootProbe {
    pub root: PathBuf,
    pub exists: bool,
    /// Up to five entry names, sorted, to help spot misplaced files.
    pub sample_entries: Vec<String>,
}

/// Why a locator could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotFoundDiagnostics {
    pub locator: String,
    pub probes: Vec<RootProbe>,
}

impl NotFoundDiagnostics {
    fn collect(locator: &str, roots: &[PathBuf]) -> Self {
        let probes = roots
            .iter()
            .map(|root| {
                let sample_entries = match std::fs::read_dir(root) {
                    Ok(entries) => {
                        let mut names: Vec<String> = entries
                            .filter_map(|e| e.ok())
                            .take(SAMPLE_ENTRIES)
                            .map(|e| e.file_name().to_string_lossy().into_owned())
                            .collect();
                        names.sort();
                        names
                    }
                    Err(_) => Vec::new(),
                };
                RootProbe {
                    root: root.clone(),
                    exists: root.is_dir(),
                    sample_entries,
                }
            })
            .collect();

        Self {
            locator: locator.to_owned(),
            probes,
        }
    }
}

/// Final path segment of a locator, splitting on both `/` and `\`.
pub fn basename(locator: &str) -> &str {
    locator.rsplit(['/', '\\']).next().unwrap_or(locator)
}

fn has_separator(locator: &str) -> bool {
    locator.contains(['/', '\\'])
}

/// Ordered list of directories that may hold stored uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    roots: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Locate the file for `locator`. First match wins.
    #[instrument(skip(self), fields(roots = self.roots.len()))]
    pub fn resolve(&self, locator: &str) -> Result<ResolvedPath, NotFoundDiagnostics> {
        if !locator.is_empty() && Path::new(locator).is_file() {
            debug!("Found at stored path");
            return Ok(ResolvedPath {
                path: PathBuf::from(locator),
                rule: ResolutionRule::DirectPath,
            });
        }

        let name = basename(locator);
        if !name.is_empty() {
            if let Some(path) = self.probe(name) {
                debug!(path = %path.display(), "Found by basename");
                return Ok(ResolvedPath {
                    path,
                    rule: ResolutionRule::BasenameInRoot,
                });
            }
        }

        if !locator.is_empty() && !has_separator(locator) {
            if let Some(path) = self.probe(locator) {
                debug!(path = %path.display(), "Found by verbatim locator");
                return Ok(ResolvedPath {
                    path,
                    rule: ResolutionRule::VerbatimInRoot,
                });
            }
        }

        let diagnostics = NotFoundDiagnostics::collect(locator, &self.roots);
        warn!(?diagnostics, "Stored file not found");
        Err(diagnostics)
    }

    fn probe(&self, file_name: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .map(|root| root.join(file_name))
            .find(|candidate| candidate.is_file())
    }
}
