//! Applying a parametrization to a document for given parameter values.
//!
//! The applier never mutates its input: it rebuilds the tree node by node and
//! derives every [`Applicability`] from scratch, so applying the same values
//! twice gives the same tree.

use arrete_shared::{Applicability, EnrichedString, SectionPath, StructuredText};

use crate::parameter::ParameterValues;
use crate::parametrization::Parametrization;
use crate::warnings::{
    inactive_reason, missing_value_warning, modification_warning, partial_inactivation_warning,
    PotentialEffect,
};

/// Annotate a copy of `document` with the applicability implied by `values`.
///
/// Rules targeting sections absent from `document` are logged and ignored.
pub fn apply(
    document: &StructuredText,
    parametrization: &Parametrization,
    values: &ParameterValues,
) -> StructuredText {
    for path in parametrization.paths() {
        if document.section_at(&path).is_none() {
            tracing::warn!(path = ?path, "Parametrization targets a section absent from the document");
        }
    }
    let mut path = SectionPath::new();
    let applied = apply_node(document, parametrization, values, &mut path, None);
    tracing::debug!(
        parameters = values.len(),
        inactive = applied.descendants().iter().filter(|s| !s.is_active()).count(),
        "Parametrization applied"
    );
    applied
}

fn apply_node(
    node: &StructuredText,
    parametrization: &Parametrization,
    values: &ParameterValues,
    path: &mut SectionPath,
    inherited_reason: Option<&str>,
) -> StructuredText {
    let mut applicability = Applicability::default();
    let mut title = node.title.clone();
    let mut outer_alineas = node.outer_alineas.clone();
    let mut children = node.sections.as_slice();

    let mut replaced = false;
    for alternative in parametrization.alternatives_at(path) {
        let condition = &alternative.condition;
        if condition.is_satisfied(values) {
            if replaced {
                tracing::warn!(path = ?path, condition = %condition, "Several alternatives satisfied, keeping the first");
                continue;
            }
            replaced = true;
            title = alternative.new_text.title.clone();
            outer_alineas = alternative.new_text.outer_alineas.clone();
            children = alternative.new_text.sections.as_slice();
            applicability.modified = true;
            applicability
                .warnings
                .push(modification_warning(condition, values));
        } else {
            let missing = condition.missing_parameters(values);
            if !missing.is_empty() {
                applicability.warnings.push(missing_value_warning(
                    condition,
                    PotentialEffect::Modification,
                    &missing,
                ));
            }
        }
    }

    reset_alineas(&mut outer_alineas);
    for nac in parametrization.conditions_at(path) {
        let condition = &nac.condition;
        let indices = nac.targeted_entity.outer_alinea_indices.as_deref();
        if condition.is_satisfied(values) {
            match indices {
                None => {
                    applicability.active = false;
                    if applicability.reason_inactive.is_none() {
                        applicability.reason_inactive = Some(inactive_reason(condition, values));
                    }
                }
                Some(indices) => {
                    for index in indices {
                        match outer_alineas.get_mut(*index) {
                            Some(alinea) => alinea.active = false,
                            None => tracing::debug!(path = ?path, index, "No such alinea"),
                        }
                    }
                    applicability
                        .warnings
                        .push(partial_inactivation_warning(condition, values));
                }
            }
        } else {
            let missing = condition.missing_parameters(values);
            if !missing.is_empty() {
                let effect = indices.map_or(
                    PotentialEffect::Inactivation,
                    PotentialEffect::PartialInactivation,
                );
                applicability
                    .warnings
                    .push(missing_value_warning(condition, effect, &missing));
            }
        }
    }

    applicability.warnings.extend(
        parametrization
            .warnings_at(path)
            .into_iter()
            .map(|warning| warning.text.clone()),
    );

    if let Some(reason) = inherited_reason {
        applicability.active = false;
        if applicability.reason_inactive.is_none() {
            applicability.reason_inactive = Some(reason.to_string());
        }
    }
    if !applicability.active {
        for alinea in &mut outer_alineas {
            alinea.active = false;
        }
    }
    applicability.warnings.sort();
    applicability.warnings.dedup();

    let reason_for_children = if applicability.active {
        None
    } else {
        applicability.reason_inactive.clone()
    };
    let sections = children
        .iter()
        .enumerate()
        .map(|(index, child)| {
            path.push(index);
            let applied = apply_node(
                child,
                parametrization,
                values,
                path,
                reason_for_children.as_deref().or(inherited_reason),
            );
            path.pop();
            applied
        })
        .collect();

    StructuredText {
        title,
        outer_alineas,
        sections,
        applicability: Some(applicability),
        reference_str: node.reference_str.clone(),
        source_article: node.source_article.clone(),
        id: node.id.clone(),
    }
}

fn reset_alineas(alineas: &mut [EnrichedString]) {
    for alinea in alineas {
        alinea.active = true;
    }
}
