//! Conditions on parameters and their evaluation.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parameter::{Parameter, ParameterValue, ParameterValues};

fn default_true() -> bool {
    true
}

/// A condition on parameter values.
///
/// Serialized internally tagged on `type`. Missing strictness flags default
/// to `LITTLER.strict = true`, `GREATER.strict = false`,
/// `RANGE.left_strict = false` and `RANGE.right_strict = true`, which makes
/// `LITTLER(v)` and `GREATER(v)` complementary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    Equal {
        parameter: Parameter,
        target: ParameterValue,
    },
    Littler {
        parameter: Parameter,
        target: ParameterValue,
        #[serde(default = "default_true")]
        strict: bool,
    },
    Greater {
        parameter: Parameter,
        target: ParameterValue,
        #[serde(default)]
        strict: bool,
    },
    Range {
        parameter: Parameter,
        left: ParameterValue,
        right: ParameterValue,
        #[serde(default)]
        left_strict: bool,
        #[serde(default = "default_true")]
        right_strict: bool,
    },
    And { conditions: Vec<Condition> },
    Or { conditions: Vec<Condition> },
}

impl Condition {
    pub fn equal(parameter: Parameter, target: impl Into<ParameterValue>) -> Self {
        Self::Equal {
            parameter,
            target: target.into(),
        }
    }

    pub fn littler(parameter: Parameter, target: impl Into<ParameterValue>, strict: bool) -> Self {
        Self::Littler {
            parameter,
            target: target.into(),
            strict,
        }
    }

    pub fn greater(parameter: Parameter, target: impl Into<ParameterValue>, strict: bool) -> Self {
        Self::Greater {
            parameter,
            target: target.into(),
            strict,
        }
    }

    /// Range with the default strictness, `left <= x < right`.
    pub fn range(
        parameter: Parameter,
        left: impl Into<ParameterValue>,
        right: impl Into<ParameterValue>,
    ) -> Self {
        Self::Range {
            parameter,
            left: left.into(),
            right: right.into(),
            left_strict: false,
            right_strict: true,
        }
    }

    pub fn and(conditions: Vec<Condition>) -> Self {
        Self::And { conditions }
    }

    pub fn or(conditions: Vec<Condition>) -> Self {
        Self::Or { conditions }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::And { .. } | Self::Or { .. })
    }

    /// Parameter of a leaf condition.
    pub fn parameter(&self) -> Option<&Parameter> {
        match self {
            Self::Equal { parameter, .. }
            | Self::Littler { parameter, .. }
            | Self::Greater { parameter, .. }
            | Self::Range { parameter, .. } => Some(parameter),
            Self::And { .. } | Self::Or { .. } => None,
        }
    }

    /// Children of a composite condition.
    pub fn children(&self) -> &[Condition] {
        match self {
            Self::And { conditions } | Self::Or { conditions } => conditions,
            _ => &[],
        }
    }

    /// Whether `values` satisfy the condition.
    ///
    /// A leaf whose parameter has no value is not satisfied.
    pub fn is_satisfied(&self, values: &ParameterValues) -> bool {
        match self {
            Self::And { conditions } => conditions.iter().all(|c| c.is_satisfied(values)),
            Self::Or { conditions } => conditions.iter().any(|c| c.is_satisfied(values)),
            leaf => {
                let Some(value) = leaf.parameter().and_then(|p| values.get(p)) else {
                    return false;
                };
                leaf.is_satisfied_by(value)
            }
        }
    }

    /// Evaluate a leaf against the value of its parameter.
    pub fn is_satisfied_by(&self, value: &ParameterValue) -> bool {
        match self {
            Self::Equal { target, .. } => value == target,
            Self::Littler { target, strict, .. } => {
                matches_ordering(value.compare(target), Ordering::Less, !strict)
            }
            Self::Greater { target, strict, .. } => {
                matches_ordering(value.compare(target), Ordering::Greater, !strict)
            }
            Self::Range {
                left,
                right,
                left_strict,
                right_strict,
                ..
            } => {
                matches_ordering(value.compare(left), Ordering::Greater, !left_strict)
                    && matches_ordering(value.compare(right), Ordering::Less, !right_strict)
            }
            Self::And { .. } | Self::Or { .. } => false,
        }
    }

    /// Every parameter referenced, recursing through composites.
    pub fn parameters(&self) -> BTreeSet<Parameter> {
        self.leaves()
            .into_iter()
            .filter_map(Condition::parameter)
            .cloned()
            .collect()
    }

    /// Referenced parameters that have no value in `values`.
    pub fn missing_parameters(&self, values: &ParameterValues) -> BTreeSet<Parameter> {
        self.parameters()
            .into_iter()
            .filter(|parameter| !values.contains_key(parameter))
            .collect()
    }

    /// Leaf conditions, depth-first.
    pub fn leaves(&self) -> Vec<&Condition> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Condition>) {
        if self.is_leaf() {
            leaves.push(self);
        }
        for child in self.children() {
            child.collect_leaves(leaves);
        }
    }

    /// Leaf conditions on `parameter`.
    pub fn leaves_for(&self, parameter: &Parameter) -> Vec<&Condition> {
        self.leaves()
            .into_iter()
            .filter(|leaf| leaf.parameter() == Some(parameter))
            .collect()
    }

    /// Nesting depth; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Condition::depth).max().unwrap_or(0)
    }
}

fn matches_ordering(actual: Option<Ordering>, expected: Ordering, or_equal: bool) -> bool {
    match actual {
        Some(ordering) if ordering == expected => true,
        Some(Ordering::Equal) => or_equal,
        _ => false,
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal { parameter, target } => write!(f, "{} == {target}", parameter.id),
            Self::Littler {
                parameter,
                target,
                strict,
            } => {
                let op = if *strict { "<" } else { "<=" };
                write!(f, "{} {op} {target}", parameter.id)
            }
            Self::Greater {
                parameter,
                target,
                strict,
            } => {
                let op = if *strict { ">" } else { ">=" };
                write!(f, "{} {op} {target}", parameter.id)
            }
            Self::Range {
                parameter,
                left,
                right,
                left_strict,
                right_strict,
            } => {
                let left_op = if *left_strict { "<" } else { "<=" };
                let right_op = if *right_strict { "<" } else { "<=" };
                write!(f, "{left} {left_op} {} {right_op} {right}", parameter.id)
            }
            Self::And { conditions } => write_joined(f, conditions, " and "),
            Self::Or { conditions } => write_joined(f, conditions, " or "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, conditions: &[Condition], separator: &str) -> fmt::Result {
    for (index, condition) in conditions.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "({condition})")?;
    }
    Ok(())
}
