//! French sentences explaining why a section changed, or might change.

use std::collections::BTreeSet;

use crate::condition::Condition;
use crate::config::HUMAN_DATE_FORMAT;
use crate::parameter::{Parameter, ParameterType, ParameterValue, ParameterValues, WellKnownParameter};

/// Reason given to a section inactivated by `condition`.
pub fn inactive_reason(condition: &Condition, values: &ParameterValues) -> String {
    format!(
        "Ce paragraphe ne s’applique pas à cette installation car {}.",
        condition_phrase(condition, Some(values))
    )
}

/// Warning on a section some alineas of which were inactivated.
pub fn partial_inactivation_warning(condition: &Condition, values: &ParameterValues) -> String {
    format!(
        "Une partie de ce paragraphe ne s’applique pas à cette installation car {}.",
        condition_phrase(condition, Some(values))
    )
}

/// Warning on a section replaced by an alternative.
pub fn modification_warning(condition: &Condition, values: &ParameterValues) -> String {
    format!(
        "Ce paragraphe a été modifié pour cette installation car {}.",
        condition_phrase(condition, Some(values))
    )
}

/// What a rule whose parameters are unknown could do to a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PotentialEffect<'a> {
    /// The whole section could be inactive.
    Inactivation,
    /// These alineas could be inactive.
    PartialInactivation(&'a [usize]),
    /// The section could be replaced.
    Modification,
}

/// Warning for a rule that cannot be evaluated because some of its
/// parameters have no value.
pub fn missing_value_warning(
    condition: &Condition,
    effect: PotentialEffect<'_>,
    missing: &BTreeSet<Parameter>,
) -> String {
    let ids: Vec<&str> = missing.iter().map(|p| p.id.as_str()).collect();
    let missing_sentence = match ids.as_slice() {
        [id] => format!("Paramètre non renseigné : {id}."),
        _ => format!("Paramètres non renseignés : {}.", ids.join(", ")),
    };
    format!(
        "{}. C'est le cas pour les installations dont {}. {missing_sentence}",
        effect_prefix(effect),
        condition_phrase(condition, None)
    )
}

fn effect_prefix(effect: PotentialEffect<'_>) -> String {
    match effect {
        PotentialEffect::Modification => "Ce paragraphe pourrait être modifié".to_string(),
        PotentialEffect::Inactivation => {
            "Ce paragraphe pourrait ne pas être applicable".to_string()
        }
        PotentialEffect::PartialInactivation([index]) => format!(
            "L'alinéa n°{} de ce paragraphe pourrait ne pas être applicable",
            index + 1
        ),
        PotentialEffect::PartialInactivation(indices) => format!(
            "Les alinéas n°{} de ce paragraphe pourraient ne pas être applicables",
            alinea_numbers(indices)
        ),
    }
}

/// `1 à 4` for three or more contiguous alineas, `1, 2 et 4` otherwise.
fn alinea_numbers(indices: &[usize]) -> String {
    let mut sorted: Vec<usize> = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    let contiguous = sorted.windows(2).all(|pair| pair[1] == pair[0] + 1);
    match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) if contiguous && sorted.len() >= 3 => {
            format!("{} à {}", first + 1, last + 1)
        }
        _ => merge_words(
            &sorted
                .iter()
                .map(|index| (index + 1).to_string())
                .collect::<Vec<_>>(),
            "et",
        ),
    }
}

/// `a`, `a et b`, `a, b et c`.
fn merge_words(words: &[String], conjunction: &str) -> String {
    match words {
        [] => String::new(),
        [word] => word.clone(),
        [init @ .., last] => format!("{} {conjunction} {last}", init.join(", ")),
    }
}

/// Describe `condition`. With `values`, only the satisfied branches of a
/// disjunction are described.
pub fn condition_phrase(condition: &Condition, values: Option<&ParameterValues>) -> String {
    match condition {
        Condition::And { conditions } => match conditions.as_slice() {
            [single] => condition_phrase(single, values),
            _ => composite_phrase(conditions, "et", values),
        },
        Condition::Or { conditions } => {
            let satisfied: Vec<Condition> = values
                .map(|values| {
                    conditions
                        .iter()
                        .filter(|c| c.is_satisfied(values))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            let described = if satisfied.is_empty() {
                conditions.as_slice()
            } else {
                satisfied.as_slice()
            };
            match described {
                [single] => condition_phrase(single, values),
                _ => composite_phrase(described, "ou", values),
            }
        }
        leaf => leaf_phrase(leaf),
    }
}

fn composite_phrase(
    conditions: &[Condition],
    conjunction: &str,
    values: Option<&ParameterValues>,
) -> String {
    if conditions.iter().all(Condition::is_leaf) {
        let phrases: Vec<String> = conditions
            .iter()
            .map(|c| condition_phrase(c, values))
            .collect();
        return merge_words(&phrases, conjunction);
    }
    let rendered: Vec<String> = conditions.iter().map(ToString::to_string).collect();
    format!(
        "les conditions d'application suivantes sont remplies : {}",
        rendered.join(", ")
    )
}

/// `la date de mise en service`, or a generic label for custom parameters.
pub fn parameter_label(parameter: &Parameter) -> String {
    WellKnownParameter::from_id(&parameter.id).map_or_else(
        || format!("la valeur du paramètre {}", parameter.id),
        |known| known.label().to_string(),
    )
}

fn human(value: &ParameterValue) -> String {
    match value {
        ParameterValue::Date(date) => date.format(HUMAN_DATE_FORMAT).to_string(),
        other => other.to_string(),
    }
}

fn leaf_phrase(leaf: &Condition) -> String {
    let Some(parameter) = leaf.parameter() else {
        return leaf.to_string();
    };
    if parameter.parameter_type == ParameterType::Date {
        let label = parameter_label(parameter);
        return match leaf {
            Condition::Littler { target, .. } => {
                format!("{label} est antérieure au {}", human(target))
            }
            Condition::Greater { target, .. } => {
                format!("{label} est postérieure au {}", human(target))
            }
            Condition::Range { left, right, .. } => format!(
                "{label} est postérieure au {} et antérieure au {}",
                human(left),
                human(right)
            ),
            _ => format!("{label} est le {}", human_target(leaf)),
        };
    }
    if let Condition::Equal {
        target: ParameterValue::Regime(regime),
        ..
    } = leaf
    {
        if WellKnownParameter::from_id(&parameter.id) == Some(WellKnownParameter::Regime) {
            return format!("le régime est à {}", regime.label());
        }
    }
    let id = &parameter.id;
    match leaf {
        Condition::Littler { target, .. } => {
            format!("le paramètre {id} est inférieur à {}", human(target))
        }
        Condition::Greater { target, .. } => {
            format!("le paramètre {id} est supérieur à {}", human(target))
        }
        Condition::Range { left, right, .. } => format!(
            "le paramètre {id} est entre {} et {}",
            human(left),
            human(right)
        ),
        _ => format!("le paramètre {id} est égal à {}", human_target(leaf)),
    }
}

fn human_target(leaf: &Condition) -> String {
    match leaf {
        Condition::Equal { target, .. } => human(target),
        other => other.to_string(),
    }
}
