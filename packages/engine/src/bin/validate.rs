//! Consistency report for parametrization files.
//!
//! Usage:
//!   validate [--document tree.json] <parametrization.json|yaml> [...]
//!
//! Every file is loaded (which runs the consistency checker); with
//! `--document`, referenced sections and alineas must exist in that tree.

use std::path::{Path, PathBuf};
use std::process;

use arrete_engine::Parametrization;
use arrete_shared::StructuredText;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Check parametrization files for consistency.
#[derive(Parser)]
#[command(name = "validate", version, about, long_about = None)]
struct Args {
    /// Structured document whose sections the parametrizations must reference
    #[arg(long)]
    document: Option<PathBuf>,

    /// Parametrization files (JSON, or YAML by extension)
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn load_parametrization(path: &Path) -> Result<Parametrization, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("read: {e}"))?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );
    let loaded = if is_yaml {
        Parametrization::from_yaml(&content)
    } else {
        Parametrization::from_json(&content)
    };
    loaded.map_err(|e| format!("{e}"))
}

fn load_document(path: &Path) -> Result<StructuredText, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("read: {e}"))?;
    serde_json::from_str(&content).map_err(|e| format!("document: {e}"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let document = args.document.as_deref().map(|path| match load_document(path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("FATAL: {}: {e}", path.display());
            process::exit(2);
        }
    });

    let mut failed = false;
    for path in &args.files {
        let parametrization = match load_parametrization(path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("FAIL: {}: {e}", path.display());
                failed = true;
                continue;
            }
        };

        if let Some(document) = &document {
            if let Err(e) = parametrization.check_against(document) {
                eprintln!("FAIL: {}: {e}", path.display());
                failed = true;
                continue;
            }
        }

        eprintln!(
            "OK: {} ({} application conditions, {} alternative sections, {} parameters)",
            path.display(),
            parametrization.application_conditions().len(),
            parametrization.alternative_sections().len(),
            parametrization.extract_parameters().len()
        );
    }

    if failed {
        process::exit(1);
    }
}
