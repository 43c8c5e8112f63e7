//! CLI binary generating every version of a document via stdin.
//!
//! Usage:
//!   echo '{"document": {...}, "parametrization": {...}}' | cargo run --bin versions
//!
//! Input (JSON on stdin):
//!   - document: Object: the structured document
//!   - parametrization: Object: application_conditions, alternative_sections, warnings
//!   - include_unknown: Optional<bool>: also enumerate unknown parameter values
//!   - dates_only: Optional<bool>: only enumerate the commissioning and procedure dates
//!   - regime: Optional<String>: regime of the order (A, E, D, DC, NC), selects the procedure date
//!
//! Output (JSON on stdout):
//!   - versions: Object: keyed by version name (labels joined with " && "), each with
//!     the parameter values used and the applied document
//!   - distinct: Number: how many versions differ materially
//!   - error: Optional<String>: error message if the request failed

use std::collections::BTreeMap;
use std::io::Read;

use arrete_engine::{
    apply, count_distinct, enumerate_versions, values_by_id, version_label, ParameterValue,
    Parametrization, Regime, VersionOptions,
};
use arrete_shared::StructuredText;
use tracing_subscriber::EnvFilter;

#[derive(serde::Deserialize)]
struct VersionsRequest {
    document: StructuredText,
    parametrization: Parametrization,
    #[serde(default)]
    include_unknown: bool,
    #[serde(default)]
    dates_only: bool,
    #[serde(default)]
    regime: Option<Regime>,
}

#[derive(serde::Serialize)]
struct Version {
    parameters: BTreeMap<String, ParameterValue>,
    document: StructuredText,
}

#[derive(serde::Serialize)]
struct VersionsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    versions: Option<BTreeMap<String, Version>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distinct: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn error_response(msg: String) -> VersionsResponse {
    VersionsResponse {
        versions: None,
        distinct: None,
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

    let request: VersionsRequest = match serde_json::from_str(&input) {
        Ok(r) => r,
        Err(e) => fail(format!("Failed to parse request JSON: {e}")),
    };

    let options = VersionOptions {
        include_unknown: request.include_unknown,
        dates_only: request.dates_only,
        regime: request.regime,
    };
    let assignments = match enumerate_versions(&request.parametrization, options) {
        Ok(a) => a,
        Err(e) => fail(format!("{e}")),
    };

    let mut documents = BTreeMap::new();
    let mut versions = BTreeMap::new();
    for (name, values) in assignments {
        let document = apply(&request.document, &request.parametrization, &values);
        documents.insert(name.clone(), document.clone());
        versions.insert(
            version_label(&name),
            Version {
                parameters: values_by_id(&values),
                document,
            },
        );
    }

    let distinct = match count_distinct(&documents) {
        Ok(n) => n,
        Err(e) => fail(format!("{e}")),
    };

    let resp = VersionsResponse {
        versions: Some(versions),
        distinct: Some(distinct),
        error: None,
    };
    println!("{}", serde_json::to_string(&resp).unwrap_or_default());
}
