//! When step definitions
//!
//! Steps that apply parametrizations and enumerate versions.

use arrete_engine::{enumerate_versions, generate_versions, Regime, VersionOptions};
use cucumber::{gherkin::Step, when};

use crate::helpers::parse_table_to_values;
use crate::world::ArreteWorld;

// =============================================================================
// Applier steps
// =============================================================================

#[when("the parametrization is applied")]
fn apply_parametrization(world: &mut ArreteWorld) {
    let applied = world.apply_to(&world.document);
    world.result = Some(applied);
}

#[when("the parameter values are replaced by:")]
fn replace_parameter_values(world: &mut ArreteWorld, step: &Step) {
    if let Some(table) = &step.table {
        world.values = parse_table_to_values(table);
    }
}

#[when("the parametrization is applied again to the result")]
fn apply_parametrization_again(world: &mut ArreteWorld) {
    let applied = world.apply_to(world.result());
    world.result = Some(applied);
}

// =============================================================================
// Version steps
// =============================================================================

fn enumerate_with(world: &mut ArreteWorld, options: VersionOptions) {
    match enumerate_versions(world.parametrization(), options) {
        Ok(versions) => world.versions = versions,
        Err(e) => world.error = Some(e),
    }
}

#[when("the versions are enumerated")]
fn enumerate(world: &mut ArreteWorld) {
    enumerate_with(world, VersionOptions::default());
}

#[when("the versions are enumerated including unknown values")]
fn enumerate_with_unknown(world: &mut ArreteWorld) {
    enumerate_with(world, VersionOptions::default().with_unknown());
}

#[when("the versions are enumerated for dates only")]
fn enumerate_dates_only(world: &mut ArreteWorld) {
    enumerate_with(world, VersionOptions::default().dates_only());
}

#[when(expr = "the versions are enumerated for dates only under regime {word}")]
fn enumerate_dates_only_for_regime(world: &mut ArreteWorld, regime: String) {
    let regime: Regime = regime.parse().expect("Unknown regime");
    enumerate_with(world, VersionOptions::default().dates_only().with_regime(regime));
}

#[when("the versions are generated")]
fn generate(world: &mut ArreteWorld) {
    match generate_versions(
        &world.document,
        world.parametrization(),
        VersionOptions::default(),
    ) {
        Ok(generated) => world.generated = generated,
        Err(e) => world.error = Some(e),
    }
}
