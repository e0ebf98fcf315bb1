// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intake: file-to-PDF rendering from the command line.
//
// Entry point. Initialises logging, loads configuration, and dispatches to the
// `render`, `classify`, `check-upload`, and `init-config` commands.

mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use intake_core::human_errors::humanize_error;
use intake_core::{AppConfig, IntakeError, RenderRequest};
use intake_document::{DownloadResponse, RenderFailure, classify};
use tracing::{error, info};

use services::app_services::{AppServices, RenderSummary};

const EXIT_SUCCESS: u8 = 0;
/// Exit code when the stored file cannot be found.
const EXIT_NOT_FOUND: u8 = 2;
/// Exit code for any other failure.
const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Parser)]
#[command(name = "intake", version, about = "Render stored uploads to PDF")]
struct Cli {
    /// JSON configuration file (defaults to $XDG_DATA_HOME/intake/intake.json).
    #[arg(long, global = true, env = "INTAKE_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a stored upload to a PDF file.
    Render {
        /// Stored file locator: a path or a bare filename.
        #[arg(long)]
        locator: String,
        /// Declared MIME type of the upload.
        #[arg(long = "type")]
        mime: String,
        /// Client's original filename (defaults to the locator's basename).
        #[arg(long)]
        name: Option<String>,
        /// Declared size in bytes (defaults to the stored file's size).
        #[arg(long)]
        size: Option<u64>,
        /// Record id used for fallback filenames.
        #[arg(long, default_value_t = 0)]
        record_id: i64,
        /// Search root, repeatable; earlier roots win. Overrides the config.
        #[arg(long = "root")]
        roots: Vec<PathBuf>,
        /// Output file (defaults to the computed name in the current directory).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the rendering strategy for each MIME type.
    Classify {
        #[arg(required = true)]
        types: Vec<String>,
    },
    /// Check a prospective upload against the upload policy.
    CheckUpload {
        #[arg(long = "type")]
        mime: String,
        #[arg(long)]
        size: u64,
    },
    /// Write the default configuration as JSON.
    InitConfig {
        /// Destination file.
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            let human = humanize_error(&e);
            error!(error = %e, "Command failed");
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<u8, IntakeError> {
    match cli.command {
        Command::Render {
            locator,
            mime,
            name,
            size,
            record_id,
            roots,
            output,
        } => {
            let svc = AppServices::init(cli.config.as_deref(), roots)?;
            let logical_name = name.unwrap_or_else(|| {
                intake_document::resolve::basename(&locator).to_owned()
            });
            let size = size.unwrap_or_else(|| svc.stored_size(&locator));
            let request = RenderRequest::new(record_id, locator, mime, size, logical_name);
            render(&svc, &request, output)
        }

        Command::Classify { types } => {
            for t in types {
                println!("{t}\t{}", classify(&t));
            }
            Ok(EXIT_SUCCESS)
        }

        Command::CheckUpload { mime, size } => {
            let svc = AppServices::init(cli.config.as_deref(), Vec::new())?;
            let strategy = svc.check_upload(&mime, size)?;
            println!("accepted\t{strategy}");
            Ok(EXIT_SUCCESS)
        }

        Command::InitConfig { path } => {
            AppConfig::default().persist(&path)?;
            info!(path = %path.display(), "Default configuration written");
            Ok(EXIT_SUCCESS)
        }
    }
}

fn render(
    svc: &AppServices,
    request: &RenderRequest,
    output: Option<PathBuf>,
) -> Result<u8, IntakeError> {
    match svc.render(request) {
        Ok(rendered) => {
            let output = output.unwrap_or_else(|| PathBuf::from(&rendered.file_name));
            std::fs::write(&output, &rendered.bytes)?;
            let summary = RenderSummary::new(&rendered, output);
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(EXIT_SUCCESS)
        }
        Err(failure @ RenderFailure::FileNotFound(_)) => {
            // Same body the download endpoint would send.
            let response = DownloadResponse::from_outcome(Err(failure));
            eprintln!("{}", String::from_utf8_lossy(&response.body));
            Ok(EXIT_NOT_FOUND)
        }
        Err(RenderFailure::Internal(e)) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_render_with_roots() {
        let cli = Cli::try_parse_from([
            "intake", "render", "--locator", "file-1.png", "--type", "image/png", "--root", "/a",
            "--root", "/b",
        ])
        .expect("parse");
        match cli.command {
            Command::Render { roots, mime, .. } => {
                assert_eq!(roots, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
                assert_eq!(mime, "image/png");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn render_writes_output_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("file-1.txt"), "hello").expect("write");
        let svc = AppServices::init(None, vec![dir.path().to_path_buf()]).expect("init");

        let output = dir.path().join("out.pdf");
        let request = RenderRequest::new(1, "file-1.txt", "text/plain", 5, "hello.txt");
        let code = render(&svc, &request, Some(output.clone())).expect("render");
        assert_eq!(code, EXIT_SUCCESS);
        assert!(std::fs::read(&output).expect("read").starts_with(b"%PDF"));
    }

    #[test]
    fn render_missing_file_exits_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let svc = AppServices::init(None, vec![dir.path().to_path_buf()]).expect("init");
        let request = RenderRequest::new(1, "missing.txt", "text/plain", 5, "missing.txt");
        let code = render(&svc, &request, Some(dir.path().join("out.pdf"))).expect("render");
        assert_eq!(code, EXIT_NOT_FOUND);
    }
}
