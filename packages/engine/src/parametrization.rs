//! The parametrization store: conditional rules attached to a document.

use std::collections::{BTreeMap, BTreeSet};

use arrete_shared::{SectionPath, StructuredText};
use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::consistency;
use crate::error::{ParametrizationError, Result};
use crate::parameter::Parameter;

/// A node of the document, or some of its alineas, or the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityReference {
    #[serde(default)]
    pub section_path: SectionPath,

    /// Restricts the reference to these alineas of the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_alinea_indices: Option<Vec<usize>>,

    #[serde(default, alias = "whole_arrete")]
    pub whole_document: bool,
}

impl EntityReference {
    pub fn section(section_path: SectionPath) -> Self {
        Self {
            section_path,
            ..Self::default()
        }
    }

    pub fn alineas(section_path: SectionPath, indices: Vec<usize>) -> Self {
        Self {
            section_path,
            outer_alinea_indices: Some(indices),
            whole_document: false,
        }
    }

    pub fn whole_document() -> Self {
        Self {
            whole_document: true,
            ..Self::default()
        }
    }

    /// Path of the node the reference lands on; the root for whole-document references.
    pub fn node_path(&self) -> &[usize] {
        if self.whole_document {
            &[]
        } else {
            &self.section_path
        }
    }

    /// Whether the whole node is targeted rather than some of its alineas.
    pub fn targets_whole_node(&self) -> bool {
        self.outer_alinea_indices.is_none()
    }
}

/// Where a rule comes from, for reviewers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionSource {
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub reference: EntityReference,
}

/// The targeted entity is inactive when `condition` holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonApplicationCondition {
    pub targeted_entity: EntityReference,
    pub condition: Condition,
    #[serde(default)]
    pub source: ConditionSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NonApplicationCondition {
    pub fn new(targeted_entity: EntityReference, condition: Condition) -> Self {
        Self {
            targeted_entity,
            condition,
            source: ConditionSource::default(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: ConditionSource) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The targeted section is replaced by `new_text` when `condition` holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeSection {
    pub targeted_section: SectionPath,
    pub new_text: StructuredText,
    pub condition: Condition,
    #[serde(default)]
    pub source: ConditionSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AlternativeSection {
    pub fn new(targeted_section: SectionPath, new_text: StructuredText, condition: Condition) -> Self {
        Self {
            targeted_section,
            new_text,
            condition,
            source: ConditionSource::default(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: ConditionSource) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A warning always shown on a section, whatever the parameter values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionWarning {
    pub targeted_section: SectionPath,
    pub text: String,
}

/// Persisted form of a [`Parametrization`].
#[derive(Serialize, Deserialize)]
struct RawParametrization {
    #[serde(default, alias = "inapplicable_sections")]
    application_conditions: Vec<NonApplicationCondition>,
    #[serde(default)]
    alternative_sections: Vec<AlternativeSection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<SectionWarning>,
}

/// Validated, immutable set of rules for one document.
///
/// Rules are kept in authoring order and indexed by the path of the node they
/// land on. Construction runs the consistency checker, so a value of this type
/// never holds two alternatives that could apply together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawParametrization", into = "RawParametrization")]
pub struct Parametrization {
    application_conditions: Vec<NonApplicationCondition>,
    alternative_sections: Vec<AlternativeSection>,
    warnings: Vec<SectionWarning>,
    conditions_by_path: BTreeMap<SectionPath, Vec<usize>>,
    alternatives_by_path: BTreeMap<SectionPath, Vec<usize>>,
    warnings_by_path: BTreeMap<SectionPath, Vec<usize>>,
}

impl Parametrization {
    /// Build and validate a parametrization.
    pub fn new(
        application_conditions: Vec<NonApplicationCondition>,
        alternative_sections: Vec<AlternativeSection>,
    ) -> std::result::Result<Self, ParametrizationError> {
        Self::with_parts(application_conditions, alternative_sections, Vec::new())
    }

    /// Build and validate a parametrization carrying unconditional warnings.
    pub fn with_parts(
        application_conditions: Vec<NonApplicationCondition>,
        alternative_sections: Vec<AlternativeSection>,
        warnings: Vec<SectionWarning>,
    ) -> std::result::Result<Self, ParametrizationError> {
        let conditions_by_path = index_by_path(
            application_conditions
                .iter()
                .map(|nac| nac.targeted_entity.node_path()),
        );
        let alternatives_by_path = index_by_path(
            alternative_sections
                .iter()
                .map(|alt| alt.targeted_section.as_slice()),
        );
        let warnings_by_path =
            index_by_path(warnings.iter().map(|w| w.targeted_section.as_slice()));
        let parametrization = Self {
            application_conditions,
            alternative_sections,
            warnings,
            conditions_by_path,
            alternatives_by_path,
            warnings_by_path,
        };
        consistency::check(&parametrization)?;
        tracing::debug!(
            application_conditions = parametrization.application_conditions.len(),
            alternative_sections = parametrization.alternative_sections.len(),
            warnings = parametrization.warnings.len(),
            "Parametrization validated"
        );
        Ok(parametrization)
    }

    pub fn application_conditions(&self) -> &[NonApplicationCondition] {
        &self.application_conditions
    }

    pub fn alternative_sections(&self) -> &[AlternativeSection] {
        &self.alternative_sections
    }

    pub fn warnings(&self) -> &[SectionWarning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.application_conditions.is_empty()
            && self.alternative_sections.is_empty()
            && self.warnings.is_empty()
    }

    /// Non-application conditions landing on the node at `path`.
    pub fn conditions_at(&self, path: &[usize]) -> Vec<&NonApplicationCondition> {
        lookup(&self.conditions_by_path, path, &self.application_conditions)
    }

    /// Alternative sections for the node at `path`.
    pub fn alternatives_at(&self, path: &[usize]) -> Vec<&AlternativeSection> {
        lookup(&self.alternatives_by_path, path, &self.alternative_sections)
    }

    /// Unconditional warnings for the node at `path`.
    pub fn warnings_at(&self, path: &[usize]) -> Vec<&SectionWarning> {
        lookup(&self.warnings_by_path, path, &self.warnings)
    }

    /// Every node path some rule lands on.
    pub fn paths(&self) -> BTreeSet<SectionPath> {
        self.conditions_by_path
            .keys()
            .chain(self.alternatives_by_path.keys())
            .chain(self.warnings_by_path.keys())
            .cloned()
            .collect()
    }

    /// Every condition, non-applications first, in authoring order.
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.application_conditions
            .iter()
            .map(|nac| &nac.condition)
            .chain(self.alternative_sections.iter().map(|alt| &alt.condition))
    }

    /// Every parameter referenced by a condition.
    pub fn extract_parameters(&self) -> BTreeSet<Parameter> {
        self.conditions()
            .flat_map(|condition| condition.parameters())
            .collect()
    }

    /// Every leaf condition on `parameter`.
    pub fn extract_conditions(&self, parameter: &Parameter) -> Vec<&Condition> {
        self.conditions()
            .flat_map(|condition| condition.leaves_for(parameter))
            .collect()
    }

    /// Check that every path and alinea index referenced exists in `document`.
    pub fn check_against(
        &self,
        document: &StructuredText,
    ) -> std::result::Result<(), ParametrizationError> {
        for nac in &self.application_conditions {
            let entity = &nac.targeted_entity;
            let node = node_at(document, entity.node_path())?;
            let alinea_count = node.outer_alineas.len();
            if let Some(index) = entity
                .outer_alinea_indices
                .iter()
                .flatten()
                .find(|index| **index >= alinea_count)
            {
                return Err(ParametrizationError::UnknownSection {
                    path: entity.node_path().to_vec(),
                    detail: format!(": no alinea {index} (the section has {alinea_count})"),
                });
            }
        }
        for alternative in &self.alternative_sections {
            node_at(document, &alternative.targeted_section)?;
        }
        for warning in &self.warnings {
            node_at(document, &warning.targeted_section)?;
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl TryFrom<RawParametrization> for Parametrization {
    type Error = ParametrizationError;

    fn try_from(raw: RawParametrization) -> std::result::Result<Self, Self::Error> {
        Self::with_parts(
            raw.application_conditions,
            raw.alternative_sections,
            raw.warnings,
        )
    }
}

impl From<Parametrization> for RawParametrization {
    fn from(parametrization: Parametrization) -> Self {
        Self {
            application_conditions: parametrization.application_conditions,
            alternative_sections: parametrization.alternative_sections,
            warnings: parametrization.warnings,
        }
    }
}

fn index_by_path<'a>(
    paths: impl Iterator<Item = &'a [usize]>,
) -> BTreeMap<SectionPath, Vec<usize>> {
    let mut index: BTreeMap<SectionPath, Vec<usize>> = BTreeMap::new();
    for (position, path) in paths.enumerate() {
        index.entry(path.to_vec()).or_default().push(position);
    }
    index
}

fn lookup<'a, T>(
    index: &BTreeMap<SectionPath, Vec<usize>>,
    path: &[usize],
    items: &'a [T],
) -> Vec<&'a T> {
    index
        .get(path)
        .into_iter()
        .flatten()
        .filter_map(|position| items.get(*position))
        .collect()
}

fn node_at<'a>(
    document: &'a StructuredText,
    path: &[usize],
) -> std::result::Result<&'a StructuredText, ParametrizationError> {
    document
        .section_at(path)
        .ok_or_else(|| ParametrizationError::UnknownSection {
            path: path.to_vec(),
            detail: String::new(),
        })
}
