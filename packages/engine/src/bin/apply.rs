//! CLI binary applying a parametrization to a document via stdin.
//!
//! Usage:
//!   echo '{"document": {...}, "parametrization": {...}, "values": {"regime": "A"}}' \
//!     | cargo run --bin apply
//!
//! Input (JSON on stdin):
//!   - document: Object: the structured document
//!   - parametrization: Object: application_conditions, alternative_sections, warnings
//!   - values: Object: parameter values keyed by parameter id (dates as YYYY-MM-DD or timestamps)
//!   - check_paths: Optional<bool>: reject parametrizations referencing absent sections
//!
//! Output (JSON on stdout):
//!   - document: Object: the annotated document
//!   - parameters: Object: the values that were used, keyed by parameter id
//!   - error: Optional<String>: error message if the request failed

use std::collections::BTreeMap;
use std::io::Read;

use arrete_engine::{apply, parse_values, values_by_id, ParameterValue, Parametrization};
use arrete_shared::StructuredText;
use tracing_subscriber::EnvFilter;

#[derive(serde::Deserialize)]
struct ApplyRequest {
    document: StructuredText,
    parametrization: Parametrization,
    #[serde(default)]
    values: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    check_paths: bool,
}

#[derive(serde::Serialize)]
struct ApplyResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<StructuredText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<BTreeMap<String, ParameterValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn error_response(msg: String) -> ApplyResponse {
    ApplyResponse {
        document: None,
        parameters: None,
        error: Some(msg),
    }
}

fn fail(msg: String) -> ! {
    let resp = error_response(msg);
    println!("{}", serde_json::to_string(&resp).unwrap_or_default());
    std::process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        fail(format!("Failed to read stdin: {e}"));
    }

    let request: ApplyRequest = match serde_json::from_str(&input) {
        Ok(r) => r,
        Err(e) => fail(format!("Failed to parse request JSON: {e}")),
    };

    if request.check_paths {
        if let Err(e) = request.parametrization.check_against(&request.document) {
            fail(format!("{e}"));
        }
    }

    let values = match parse_values(
        &request.parametrization.extract_parameters(),
        &request.values,
    ) {
        Ok(v) => v,
        Err(e) => fail(format!("{e}")),
    };

    let document = apply(&request.document, &request.parametrization, &values);
    let resp = ApplyResponse {
        document: Some(document),
        parameters: Some(values_by_id(&values)),
        error: None,
    };
    println!("{}", serde_json::to_string(&resp).unwrap_or_default());
}
