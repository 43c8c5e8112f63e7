//! Then step definitions
//!
//! Steps that verify applied documents, versions and rejections.

use arrete_engine::{version_label, ParameterValue};
use cucumber::{gherkin::Step, then};
use pretty_assertions::assert_eq;

use crate::helpers::parse_path;
use crate::world::ArreteWorld;

// =============================================================================
// Structure steps
// =============================================================================

#[then(expr = "the document has {int} top-level section(s)")]
fn assert_top_level_count(world: &mut ArreteWorld, expected: usize) {
    assert_eq!(world.result().sections.len(), expected);
}

#[then(expr = "the section at path {string} has title {string}")]
fn assert_section_title(world: &mut ArreteWorld, path: String, expected: String) {
    assert_eq!(world.section(&parse_path(&path)).title.text, expected);
}

#[then(expr = "the section at path {string} has {int} subsection(s)")]
fn assert_subsection_count(world: &mut ArreteWorld, path: String, expected: usize) {
    assert_eq!(world.section(&parse_path(&path)).sections.len(), expected);
}

// =============================================================================
// Applicability steps
// =============================================================================

#[then(regex = r#"^the section at path "([\d.]*)" is (active|inactive)$"#)]
fn assert_section_activity(world: &mut ArreteWorld, path: String, state: String) {
    let section = world.section(&parse_path(&path));
    assert_eq!(
        section.is_active(),
        state == "active",
        "Section {path} applicability: {:?}",
        section.applicability
    );
}

#[then(regex = r#"^the section at path "([\d.]*)" is (modified|not modified)$"#)]
fn assert_section_modification(world: &mut ArreteWorld, path: String, state: String) {
    let section = world.section(&parse_path(&path));
    assert_eq!(section.is_modified(), state == "modified");
}

#[then(regex = r#"^alinea (\d+) of the section at path "([\d.]*)" is (active|inactive)$"#)]
fn assert_alinea_activity(world: &mut ArreteWorld, index: usize, path: String, state: String) {
    let section = world.section(&parse_path(&path));
    let alinea = section
        .outer_alineas
        .get(index)
        .unwrap_or_else(|| panic!("No alinea {index} at path {path}"));
    assert_eq!(alinea.active, state == "active");
}

#[then(expr = "the section at path {string} has {int} warning(s)")]
fn assert_warning_count(world: &mut ArreteWorld, path: String, expected: usize) {
    let section = world.section(&parse_path(&path));
    assert_eq!(
        section.warnings().len(),
        expected,
        "Warnings: {:?}",
        section.warnings()
    );
}

#[then(expr = "a warning of the section at path {string} mentions {string}")]
fn assert_warning_mentions(world: &mut ArreteWorld, path: String, needle: String) {
    let section = world.section(&parse_path(&path));
    assert!(
        section.warnings().iter().any(|w| w.contains(&needle)),
        "No warning mentions '{needle}': {:?}",
        section.warnings()
    );
}

#[then(expr = "the inactivity reason of the section at path {string} is:")]
fn assert_inactivity_reason(world: &mut ArreteWorld, path: String, step: &Step) {
    let expected = step.docstring.as_ref().expect("Expected a docstring");
    let section = world.section(&parse_path(&path));
    let reason = section
        .applicability
        .as_ref()
        .and_then(|a| a.reason_inactive.as_deref());
    assert_eq!(reason, Some(expected.trim()));
}

#[then(expr = "the first alinea of the section at path {string} reads {string}")]
fn assert_first_alinea(world: &mut ArreteWorld, path: String, expected: String) {
    let section = world.section(&parse_path(&path));
    assert_eq!(section.outer_alineas[0].text, expected);
}

#[then("the second application changed nothing")]
fn assert_idempotent(world: &mut ArreteWorld) {
    let once = world.result().clone();
    let twice = world.apply_to(&once);
    assert_eq!(once, twice);
}

// =============================================================================
// Consistency steps
// =============================================================================

#[then(expr = "the parametrization is rejected with {string}")]
fn assert_rejected(world: &mut ArreteWorld, needle: String) {
    assert!(world.parametrization.is_none(), "Parametrization was accepted");
    let message = world
        .error
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    assert!(
        message.contains(&needle),
        "Expected error containing '{needle}', got '{message}'"
    );
}

#[then("the parametrization is accepted")]
fn assert_accepted(world: &mut ArreteWorld) {
    assert!(
        world.parametrization.is_some(),
        "Parametrization rejected: {:?}",
        world.error.as_ref().map(|e| e.to_string())
    );
}

// =============================================================================
// Version steps
// =============================================================================

#[then(expr = "there is/are {int} version(s)")]
fn assert_version_count(world: &mut ArreteWorld, expected: usize) {
    assert_eq!(world.versions.len(), expected);
}

#[then("the versions are:")]
fn assert_version_names(world: &mut ArreteWorld, step: &Step) {
    let table = step.table.as_ref().expect("Expected a table");
    let expected: Vec<String> = table.rows.iter().map(|row| row[0].trim().to_string()).collect();
    let actual: Vec<String> = world.versions.keys().map(|name| version_label(name)).collect();
    assert_eq!(actual, expected);
}

#[then(expr = "version {string} sets {string} to {string}")]
fn assert_version_value(world: &mut ArreteWorld, label: String, parameter: String, expected: String) {
    let (_, values) = world
        .versions
        .iter()
        .find(|(name, _)| version_label(name) == label)
        .unwrap_or_else(|| panic!("No version '{label}'"));
    let value: Option<&ParameterValue> = values
        .iter()
        .find(|(p, _)| p.id == parameter)
        .map(|(_, v)| v);
    assert_eq!(value.map(ToString::to_string), Some(expected));
}

#[then(expr = "version {string} leaves {string} unknown")]
fn assert_version_unknown(world: &mut ArreteWorld, label: String, parameter: String) {
    let (_, values) = world
        .versions
        .iter()
        .find(|(name, _)| version_label(name) == label)
        .unwrap_or_else(|| panic!("No version '{label}'"));
    assert!(values.keys().all(|p| p.id != parameter));
}

#[then(expr = "enumeration fails with {string}")]
fn assert_enumeration_failure(world: &mut ArreteWorld, needle: String) {
    let message = world
        .error
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    assert!(message.contains(&needle), "Got '{message}'");
}

#[then(expr = "{int} generated version(s) differ(s) materially")]
fn assert_distinct_versions(world: &mut ArreteWorld, expected: usize) {
    assert_eq!(
        arrete_engine::count_distinct(&world.generated).unwrap(),
        expected
    );
}

#[then(expr = "in the generated version {string} the section at path {string} is {word}")]
fn assert_generated_activity(world: &mut ArreteWorld, label: String, path: String, state: String) {
    let (_, document) = world
        .generated
        .iter()
        .find(|(name, _)| version_label(name) == label)
        .unwrap_or_else(|| panic!("No generated version '{label}'"));
    let section = document
        .section_at(&parse_path(&path))
        .unwrap_or_else(|| panic!("No section at path {path}"));
    match state.as_str() {
        "active" => assert!(section.is_active()),
        "inactive" => assert!(!section.is_active()),
        "modified" => assert!(section.is_modified()),
        other => panic!("Unknown state '{other}'"),
    }
}
