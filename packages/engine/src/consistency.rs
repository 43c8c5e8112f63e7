//! Load-time consistency checks of a parametrization.
//!
//! The checks are conservative: a pair of rules is rejected whenever the
//! satisfiability check cannot prove them exclusive, even if the parametrization
//! is in fact disambiguated by a co-varying parameter.

use std::collections::BTreeSet;

use arrete_shared::SectionPath;

use crate::condition::Condition;
use crate::config::MAX_CONDITION_DEPTH;
use crate::error::ParametrizationError;
use crate::parameter::{Parameter, ParameterType, ParameterValue};
use crate::parametrization::{EntityReference, NonApplicationCondition, Parametrization};
use crate::satisfiability::could_be_simultaneously_satisfied;

type CheckResult = Result<(), ParametrizationError>;

/// Run every check, stopping at the first mistake found.
pub fn check(parametrization: &Parametrization) -> CheckResult {
    for nac in parametrization.application_conditions() {
        check_reference(&nac.targeted_entity)?;
        check_condition(nac.targeted_entity.node_path(), &nac.condition)?;
    }
    for alternative in parametrization.alternative_sections() {
        if alternative.targeted_section.is_empty() {
            return Err(ParametrizationError::InvalidEntityReference {
                path: Vec::new(),
                reason: "an alternative section cannot replace the whole document".to_string(),
            });
        }
        check_condition(&alternative.targeted_section, &alternative.condition)?;
    }
    for path in parametrization.paths() {
        check_non_applications(&path, &parametrization.conditions_at(&path))?;
        check_alternatives(&path, parametrization)?;
    }
    Ok(())
}

fn check_reference(entity: &EntityReference) -> CheckResult {
    let invalid = |reason: &str| ParametrizationError::InvalidEntityReference {
        path: entity.section_path.clone(),
        reason: reason.to_string(),
    };
    if entity.whole_document && !entity.section_path.is_empty() {
        return Err(invalid("a whole-document reference cannot carry a section path"));
    }
    if entity.whole_document && entity.outer_alinea_indices.is_some() {
        return Err(invalid("a whole-document reference cannot select alineas"));
    }
    if !entity.whole_document && entity.section_path.is_empty() {
        return Err(invalid("empty section path; use a whole-document reference"));
    }
    if entity.outer_alinea_indices.as_ref().is_some_and(Vec::is_empty) {
        return Err(invalid("empty alinea selection"));
    }
    Ok(())
}

/// Shape and typing checks of one condition tree.
pub fn check_condition(path: &[usize], condition: &Condition) -> CheckResult {
    let depth = condition.depth();
    if depth > MAX_CONDITION_DEPTH {
        return Err(ParametrizationError::ConditionTooDeep {
            path: path.to_vec(),
            depth,
            max: MAX_CONDITION_DEPTH,
        });
    }
    check_node(path, condition)
}

fn check_node(path: &[usize], condition: &Condition) -> CheckResult {
    match condition {
        Condition::And { conditions } | Condition::Or { conditions } => {
            if conditions.is_empty() {
                return Err(ParametrizationError::EmptyComposite {
                    path: path.to_vec(),
                    condition: condition.to_string(),
                });
            }
            conditions
                .iter()
                .try_for_each(|child| check_node(path, child))
        }
        Condition::Equal { parameter, target } => check_type(path, condition, parameter, target),
        Condition::Littler {
            parameter, target, ..
        }
        | Condition::Greater {
            parameter, target, ..
        } => {
            check_type(path, condition, parameter, target)?;
            check_ordered(path, condition, parameter)
        }
        Condition::Range {
            parameter,
            left,
            right,
            ..
        } => {
            check_type(path, condition, parameter, left)?;
            check_type(path, condition, parameter, right)?;
            check_ordered(path, condition, parameter)?;
            if left.compare(right) != Some(std::cmp::Ordering::Less) {
                return Err(ParametrizationError::InvalidRange {
                    path: path.to_vec(),
                    condition: condition.to_string(),
                });
            }
            Ok(())
        }
    }
}

fn check_type(
    path: &[usize],
    condition: &Condition,
    parameter: &Parameter,
    value: &ParameterValue,
) -> CheckResult {
    if value.parameter_type() == parameter.parameter_type {
        return Ok(());
    }
    Err(ParametrizationError::TypeMismatch {
        path: path.to_vec(),
        condition: condition.to_string(),
        parameter: parameter.id.clone(),
        expected: parameter.parameter_type.to_string(),
    })
}

fn check_ordered(path: &[usize], condition: &Condition, parameter: &Parameter) -> CheckResult {
    if parameter.parameter_type.is_ordered() {
        return Ok(());
    }
    Err(ParametrizationError::NonEqualDiscreteCondition {
        path: path.to_vec(),
        parameter: parameter.id.clone(),
        condition: condition.to_string(),
    })
}

/// Non-applications of one entity sharing a parameter must be exclusive.
fn check_non_applications(path: &SectionPath, conditions: &[&NonApplicationCondition]) -> CheckResult {
    for (i, first) in conditions.iter().enumerate() {
        for second in &conditions[i + 1..] {
            if first.targeted_entity != second.targeted_entity {
                continue;
            }
            let Some(parameter) = shared_parameter(&first.condition, &second.condition) else {
                continue;
            };
            if !could_be_simultaneously_satisfied(&first.condition, &second.condition) {
                continue;
            }
            tracing::debug!(path = ?path, parameter = %parameter.id, "Overlapping non-application conditions");
            let (path, first, second) = (
                path.clone(),
                first.condition.to_string(),
                second.condition.to_string(),
            );
            return Err(match parameter.parameter_type {
                ParameterType::Date => ParametrizationError::OverlappingDateRanges {
                    path,
                    parameter: parameter.id,
                    first,
                    second,
                },
                ParameterType::Regime | ParameterType::Boolean => {
                    ParametrizationError::DuplicateDiscreteTarget {
                        path,
                        parameter: parameter.id,
                        first,
                        second,
                    }
                }
            });
        }
    }
    Ok(())
}

/// Alternatives of one section must be exclusive with each other and with
/// whole-node non-applications sharing a parameter.
fn check_alternatives(path: &SectionPath, parametrization: &Parametrization) -> CheckResult {
    let alternatives = parametrization.alternatives_at(path);
    for (i, first) in alternatives.iter().enumerate() {
        for second in &alternatives[i + 1..] {
            if could_be_simultaneously_satisfied(&first.condition, &second.condition) {
                return Err(ParametrizationError::AmbiguousAlternatives {
                    path: path.clone(),
                    first: first.condition.to_string(),
                    second: second.condition.to_string(),
                });
            }
        }
    }
    let whole_node_conditions = parametrization
        .conditions_at(path)
        .into_iter()
        .filter(|nac| nac.targeted_entity.targets_whole_node());
    for nac in whole_node_conditions {
        for alternative in &alternatives {
            if shared_parameter(&nac.condition, &alternative.condition).is_some()
                && could_be_simultaneously_satisfied(&nac.condition, &alternative.condition)
            {
                return Err(ParametrizationError::ConflictingAlternativeAndNonApplication {
                    path: path.clone(),
                    alternative: alternative.condition.to_string(),
                    non_application: nac.condition.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn shared_parameter(first: &Condition, second: &Condition) -> Option<Parameter> {
    let first: BTreeSet<Parameter> = first.parameters();
    second
        .parameters()
        .into_iter()
        .find(|parameter| first.contains(parameter))
}
