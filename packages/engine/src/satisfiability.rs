//! Conservative satisfiability checks on conditions.
//!
//! Conditions are expanded into disjunctive normal form; a conjunction of
//! leaves is satisfiable when, for each parameter, the date intervals it
//! imposes intersect and the discrete targets it requires agree. When the
//! expansion exceeds [`MAX_DNF_TERMS`] the answer is "possibly satisfiable".

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::condition::Condition;
use crate::config::MAX_DNF_TERMS;
use crate::parameter::{Parameter, ParameterValue};

type Term<'a> = Vec<&'a Condition>;

/// Whether some assignment could satisfy `first` and `second` together.
///
/// False positives are possible (the check errs on "satisfiable"); a `false`
/// answer is always exact.
pub fn could_be_simultaneously_satisfied(first: &Condition, second: &Condition) -> bool {
    let (Some(left), Some(right)) = (dnf(first), dnf(second)) else {
        return true;
    };
    if left.len().saturating_mul(right.len()) > MAX_DNF_TERMS {
        return true;
    }
    left.iter().any(|a| {
        right.iter().any(|b| {
            let mut term = a.clone();
            term.extend(b.iter().copied());
            term_is_satisfiable(&term)
        })
    })
}

/// Whether some assignment could satisfy `condition`.
pub fn is_satisfiable(condition: &Condition) -> bool {
    match dnf(condition) {
        Some(terms) => terms.iter().any(|term| term_is_satisfiable(term)),
        None => true,
    }
}

/// Disjunctive normal form, or `None` past the term budget.
fn dnf(condition: &Condition) -> Option<Vec<Term<'_>>> {
    match condition {
        Condition::Or { conditions } => {
            let mut terms = Vec::new();
            for child in conditions {
                terms.extend(dnf(child)?);
                if terms.len() > MAX_DNF_TERMS {
                    return None;
                }
            }
            Some(terms)
        }
        Condition::And { conditions } => {
            let mut terms: Vec<Term<'_>> = vec![Vec::new()];
            for child in conditions {
                let child_terms = dnf(child)?;
                if terms.len().saturating_mul(child_terms.len()) > MAX_DNF_TERMS {
                    return None;
                }
                terms = terms
                    .iter()
                    .flat_map(|term| {
                        child_terms.iter().map(move |child_term| {
                            let mut merged = term.clone();
                            merged.extend(child_term.iter().copied());
                            merged
                        })
                    })
                    .collect();
            }
            Some(terms)
        }
        leaf => Some(vec![vec![leaf]]),
    }
}

fn term_is_satisfiable(term: &[&Condition]) -> bool {
    let mut by_parameter: BTreeMap<&Parameter, Vec<&Condition>> = BTreeMap::new();
    for &leaf in term {
        if let Some(parameter) = leaf.parameter() {
            by_parameter.entry(parameter).or_default().push(leaf);
        }
    }
    by_parameter.values().all(|leaves| leaves_are_compatible(leaves))
}

fn leaves_are_compatible(leaves: &[&Condition]) -> bool {
    let mut interval = DayInterval::unbounded();
    let mut required: Option<&ParameterValue> = None;
    for leaf in leaves {
        if let Condition::Equal { target, .. } = leaf {
            if required.is_some_and(|value| value != target) {
                return false;
            }
            required = Some(target);
        }
        match DayInterval::of_leaf(leaf) {
            Some(bounds) => interval = interval.intersect(&bounds),
            None if !matches!(leaf, Condition::Equal { .. }) => return true,
            None => {}
        }
    }
    !interval.is_empty()
}

/// Closed interval of days, unbounded when a side is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DayInterval {
    pub low: Option<NaiveDate>,
    pub high: Option<NaiveDate>,
}

impl DayInterval {
    pub fn unbounded() -> Self {
        Self {
            low: None,
            high: None,
        }
    }

    /// Days satisfying a date leaf, or `None` for non-date leaves.
    ///
    /// Strict bounds are tightened by one day, so that every interval is closed.
    pub fn of_leaf(leaf: &Condition) -> Option<Self> {
        match leaf {
            Condition::Equal { target, .. } => {
                let day = target.as_date()?;
                Some(Self {
                    low: Some(day),
                    high: Some(day),
                })
            }
            Condition::Littler { target, strict, .. } => Some(Self {
                low: None,
                high: Some(upper_bound(target.as_date()?, *strict)?),
            }),
            Condition::Greater { target, strict, .. } => Some(Self {
                low: Some(lower_bound(target.as_date()?, *strict)?),
                high: None,
            }),
            Condition::Range {
                left,
                right,
                left_strict,
                right_strict,
                ..
            } => Some(Self {
                low: Some(lower_bound(left.as_date()?, *left_strict)?),
                high: Some(upper_bound(right.as_date()?, *right_strict)?),
            }),
            Condition::And { .. } | Condition::Or { .. } => None,
        }
    }

    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            low: tighter(self.low, other.low, true),
            high: tighter(self.high, other.high, false),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!((self.low, self.high), (Some(low), Some(high)) if low > high)
    }
}

fn lower_bound(day: NaiveDate, strict: bool) -> Option<NaiveDate> {
    if strict {
        day.succ_opt()
    } else {
        Some(day)
    }
}

fn upper_bound(day: NaiveDate, strict: bool) -> Option<NaiveDate> {
    if strict {
        day.pred_opt()
    } else {
        Some(day)
    }
}

/// The tighter of two optional bounds: the later low bound or the earlier high bound.
fn tighter(a: Option<NaiveDate>, b: Option<NaiveDate>, keep_later: bool) -> Option<NaiveDate> {
    match (a, b) {
        (Some(x), Some(y)) => Some(if keep_later { x.max(y) } else { x.min(y) }),
        (x, None) => x,
        (None, y) => y,
    }
}
