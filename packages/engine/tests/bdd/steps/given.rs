//! Given step definitions
//!
//! Steps that set up the document, the parametrization and parameter values.

use arrete_engine::Parametrization;
use arrete_shared::TextElement;
use cucumber::{gherkin::Step, given};

use crate::helpers::parse_table_to_values;
use crate::world::ArreteWorld;

// =============================================================================
// Document steps
// =============================================================================

#[given("a document structured from the lines:")]
fn set_document_from_lines(world: &mut ArreteWorld, step: &Step) {
    let text = step.docstring.as_ref().expect("Expected a docstring");
    let elements: Vec<TextElement> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(TextElement::text)
        .collect();
    world.document =
        arrete_structure::structure_lines(None, &elements).expect("Structuring failed");
    world.result = Some(world.document.clone());
}

// =============================================================================
// Parametrization steps
// =============================================================================

#[given("the parametrization:")]
fn set_parametrization(world: &mut ArreteWorld, step: &Step) {
    let yaml = step.docstring.as_ref().expect("Expected a YAML docstring");
    match Parametrization::from_yaml(yaml) {
        Ok(parametrization) => {
            world.parametrization = Some(parametrization);
            world.error = None;
        }
        Err(e) => {
            world.parametrization = None;
            world.error = Some(e);
        }
    }
}

#[given("an empty parametrization")]
fn set_empty_parametrization(world: &mut ArreteWorld) {
    world.parametrization = Some(Parametrization::default());
}

// =============================================================================
// Parameter value steps
// =============================================================================

#[given("the parameter values:")]
fn set_parameter_values(world: &mut ArreteWorld, step: &Step) {
    if let Some(table) = &step.table {
        world.values = parse_table_to_values(table);
    }
}

#[given("no parameter values")]
fn clear_parameter_values(world: &mut ArreteWorld) {
    world.values.clear();
}
