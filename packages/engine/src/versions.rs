//! Enumeration of the materially distinct versions of a document.
//!
//! Every parameter contributes a small set of labelled options, one per class
//! of values that no condition can tell apart. The versions are the cartesian
//! product of those options, guarded by [`MAX_VERSIONS`].

use std::collections::{BTreeMap, BTreeSet};

use arrete_shared::StructuredText;
use chrono::{Days, NaiveDate};
use sha2::{Digest, Sha256};

use crate::apply::apply;
use crate::condition::Condition;
use crate::config::{DATE_LABEL_FORMAT, MAX_VERSIONS};
use crate::error::{EngineError, Result};
use crate::parameter::{
    Parameter, ParameterType, ParameterValue, ParameterValues, Regime, WellKnownParameter,
};
use crate::parametrization::Parametrization;

/// Labels of a version, one per enumerated parameter, in parameter order.
pub type VersionName = Vec<String>;

/// Options of the version enumerator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionOptions {
    /// Also enumerate, for every parameter, the case where its value is unknown.
    pub include_unknown: bool,
    /// Only enumerate the commissioning date and the date of the regime's
    /// procedure (autorisation, enregistrement or déclaration).
    pub dates_only: bool,
    /// Regime of the installations the document governs, used to pick the
    /// procedure date when several are referenced.
    pub regime: Option<Regime>,
}

impl VersionOptions {
    #[must_use]
    pub fn with_unknown(mut self) -> Self {
        self.include_unknown = true;
        self
    }

    #[must_use]
    pub fn dates_only(mut self) -> Self {
        self.dates_only = true;
        self
    }

    #[must_use]
    pub fn with_regime(mut self, regime: Regime) -> Self {
        self.regime = Some(regime);
        self
    }
}

/// One class of values of a parameter; `None` stands for an unknown value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterOption {
    pub label: String,
    pub value: Option<ParameterValue>,
}

impl ParameterOption {
    fn known(label: String, value: impl Into<ParameterValue>) -> Self {
        Self {
            label,
            value: Some(value.into()),
        }
    }
}

/// One representative assignment per combination of parameter options.
pub fn enumerate_versions(
    parametrization: &Parametrization,
    options: VersionOptions,
) -> Result<BTreeMap<VersionName, ParameterValues>> {
    let mut parameters = parametrization.extract_parameters();
    if options.dates_only {
        parameters = relevant_date_parameters(&parameters, options.regime)?;
    }
    let per_parameter: Vec<(Parameter, Vec<ParameterOption>)> = parameters
        .into_iter()
        .map(|parameter| {
            let leaves = parametrization.extract_conditions(&parameter);
            let mut choices = parameter_options(&parameter, &leaves);
            if options.include_unknown {
                choices.push(ParameterOption {
                    label: format!("{} unknown", parameter.id),
                    value: None,
                });
            }
            (parameter, choices)
        })
        .filter(|(_, choices)| !choices.is_empty())
        .collect();

    let count = per_parameter
        .iter()
        .try_fold(1usize, |acc, (_, choices)| acc.checked_mul(choices.len()))
        .unwrap_or(usize::MAX);
    if count > MAX_VERSIONS {
        return Err(EngineError::TooManyVersions {
            count,
            max: MAX_VERSIONS,
        });
    }

    let mut versions: Vec<(VersionName, ParameterValues)> =
        vec![(VersionName::new(), ParameterValues::new())];
    for (parameter, choices) in &per_parameter {
        versions = versions
            .into_iter()
            .flat_map(|(name, values)| {
                choices.iter().map(move |choice| {
                    let mut name = name.clone();
                    let mut values = values.clone();
                    name.push(choice.label.clone());
                    if let Some(value) = &choice.value {
                        values.insert(parameter.clone(), value.clone());
                    }
                    (name, values)
                })
            })
            .collect();
    }
    tracing::debug!(
        parameters = per_parameter.len(),
        versions = versions.len(),
        "Versions enumerated"
    );
    Ok(versions.into_iter().collect())
}

/// Procedure date parameters, at most one of which is kept in dates-only mode.
const PROCEDURE_DATES: [WellKnownParameter; 3] = [
    WellKnownParameter::DateAutorisation,
    WellKnownParameter::DateDeclaration,
    WellKnownParameter::DateEnregistrement,
];

/// The commissioning date plus the procedure date matching `regime`.
///
/// A single referenced procedure date is kept whatever the regime. Several
/// of them need a regime to choose from; under `NC` none is kept.
pub fn relevant_date_parameters(
    parameters: &BTreeSet<Parameter>,
    regime: Option<Regime>,
) -> Result<BTreeSet<Parameter>> {
    let installation = WellKnownParameter::DateInstallation.parameter();
    let mut kept: BTreeSet<Parameter> = parameters
        .iter()
        .filter(|p| **p == installation)
        .cloned()
        .collect();
    let procedures: Vec<Parameter> = PROCEDURE_DATES
        .iter()
        .map(WellKnownParameter::parameter)
        .filter(|p| parameters.contains(p))
        .collect();
    let procedure = match procedures.as_slice() {
        [] => None,
        [single] => Some(single.clone()),
        several => {
            let Some(regime) = regime else {
                return Err(EngineError::MissingRegime {
                    parameters: several.iter().map(|p| p.id.clone()).collect(),
                });
            };
            let candidate = match regime {
                Regime::A => Some(WellKnownParameter::DateAutorisation),
                Regime::E => Some(WellKnownParameter::DateEnregistrement),
                Regime::D | Regime::DC => Some(WellKnownParameter::DateDeclaration),
                Regime::NC => None,
            };
            candidate
                .map(|known| known.parameter())
                .filter(|p| parameters.contains(p))
        }
    };
    kept.extend(procedure);
    tracing::debug!(kept = kept.len(), regime = ?regime, "Date parameters selected");
    Ok(kept)
}

/// Options of one parameter, from the leaf conditions that mention it.
pub fn parameter_options(parameter: &Parameter, leaves: &[&Condition]) -> Vec<ParameterOption> {
    match parameter.parameter_type {
        ParameterType::Date => date_options(&parameter.id, &date_cuts(leaves)),
        ParameterType::Regime => regime_options(&parameter.id, leaves),
        ParameterType::Boolean => vec![
            ParameterOption::known(format!("{} == true", parameter.id), true),
            ParameterOption::known(format!("{} != true", parameter.id), false),
        ],
    }
}

/// Days at which some condition on the parameter changes value: each cut `c`
/// separates the days before `c` from `c` onwards.
fn date_cuts(leaves: &[&Condition]) -> BTreeSet<NaiveDate> {
    let mut cuts = BTreeSet::new();
    let mut add = |day: Option<NaiveDate>, shift: bool| {
        let cut = if shift { day.and_then(|d| d.succ_opt()) } else { day };
        if let Some(cut) = cut {
            cuts.insert(cut);
        }
    };
    for leaf in leaves {
        match leaf {
            Condition::Littler { target, strict, .. } => add(target.as_date(), !strict),
            Condition::Greater { target, strict, .. } => add(target.as_date(), *strict),
            Condition::Range {
                left,
                right,
                left_strict,
                right_strict,
                ..
            } => {
                add(left.as_date(), *left_strict);
                add(right.as_date(), !right_strict);
            }
            Condition::Equal { target, .. } => {
                add(target.as_date(), false);
                add(target.as_date(), true);
            }
            Condition::And { .. } | Condition::Or { .. } => {}
        }
    }
    cuts
}

fn label_date(day: NaiveDate) -> String {
    day.format(DATE_LABEL_FORMAT).to_string()
}

fn date_options(id: &str, cuts: &BTreeSet<NaiveDate>) -> Vec<ParameterOption> {
    let cuts: Vec<NaiveDate> = cuts.iter().copied().collect();
    let (Some(first), Some(last)) = (cuts.first().copied(), cuts.last().copied()) else {
        return Vec::new();
    };
    let mut options = Vec::with_capacity(cuts.len() + 1);
    if let Some(before) = first.pred_opt() {
        options.push(ParameterOption::known(
            format!("{id} < {}", label_date(first)),
            before,
        ));
    }
    for pair in cuts.windows(2) {
        let (low, high) = (pair[0], pair[1]);
        let width = (high - low).num_days();
        let label = if width == 1 {
            format!("{id} == {}", label_date(low))
        } else {
            format!("{} <= {id} < {}", label_date(low), label_date(high))
        };
        let middle = u64::try_from(width / 2)
            .ok()
            .and_then(|half| low.checked_add_days(Days::new(half)))
            .unwrap_or(low);
        options.push(ParameterOption::known(label, middle));
    }
    if let Some(after) = last.succ_opt() {
        options.push(ParameterOption::known(
            format!("{id} >= {}", label_date(last)),
            after,
        ));
    }
    options
}

fn regime_options(id: &str, leaves: &[&Condition]) -> Vec<ParameterOption> {
    let targets: BTreeSet<Regime> = leaves
        .iter()
        .filter_map(|leaf| match leaf {
            Condition::Equal {
                target: ParameterValue::Regime(regime),
                ..
            } => Some(*regime),
            _ => None,
        })
        .collect();
    let mut options: Vec<ParameterOption> = targets
        .iter()
        .map(|regime| ParameterOption::known(format!("{id} == {regime}"), *regime))
        .collect();
    if targets.is_empty() {
        return options;
    }
    if let Some(other) = Regime::ALL.into_iter().find(|r| !targets.contains(r)) {
        let label = match targets.iter().collect::<Vec<_>>().as_slice() {
            [single] => format!("{id} != {single}"),
            many => format!(
                "{id} not in [{}]",
                many.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
            ),
        };
        options.push(ParameterOption::known(label, other));
    }
    options
}

/// Apply the parametrization for every enumerated version.
pub fn generate_versions(
    document: &StructuredText,
    parametrization: &Parametrization,
    options: VersionOptions,
) -> Result<BTreeMap<VersionName, StructuredText>> {
    Ok(enumerate_versions(parametrization, options)?
        .into_iter()
        .map(|(name, values)| (name, apply(document, parametrization, &values)))
        .collect())
}

/// Joined rendering of a version name, `default` when no parameter is involved.
pub fn version_label(name: &[String]) -> String {
    if name.is_empty() {
        "default".to_string()
    } else {
        name.join(" && ")
    }
}

/// SHA-256 of the canonical JSON of a tree.
pub fn fingerprint(tree: &StructuredText) -> Result<String> {
    let bytes = serde_json::to_vec(tree)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Number of materially distinct trees among `versions`.
pub fn count_distinct(versions: &BTreeMap<VersionName, StructuredText>) -> Result<usize> {
    let fingerprints = versions
        .values()
        .map(fingerprint)
        .collect::<Result<BTreeSet<_>>>()?;
    Ok(fingerprints.len())
}
