//! Parameters of an installation and their values.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::config::DATE_LABEL_FORMAT;
use crate::error::{EngineError, Result};

/// Type of a parameter, which fixes the type of its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterType {
    Date,
    Regime,
    Boolean,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "DATE",
            Self::Regime => "REGIME",
            Self::Boolean => "BOOLEAN",
        }
    }

    /// Whether values of this type are ordered (usable in LITTLER/GREATER/RANGE).
    pub fn is_ordered(&self) -> bool {
        matches!(self, Self::Date)
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named fact about an installation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Parameter {
    pub id: String,
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
}

impl Parameter {
    pub fn new(id: impl Into<String>, parameter_type: ParameterType) -> Self {
        Self {
            id: id.into(),
            parameter_type,
        }
    }

    pub fn date(id: impl Into<String>) -> Self {
        Self::new(id, ParameterType::Date)
    }

    pub fn regime(id: impl Into<String>) -> Self {
        Self::new(id, ParameterType::Regime)
    }

    pub fn boolean(id: impl Into<String>) -> Self {
        Self::new(id, ParameterType::Boolean)
    }
}

/// Parameters shared by every order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownParameter {
    DateAutorisation,
    DateDeclaration,
    DateEnregistrement,
    DateInstallation,
    Regime,
}

impl WellKnownParameter {
    pub const ALL: [WellKnownParameter; 5] = [
        Self::DateAutorisation,
        Self::DateDeclaration,
        Self::DateEnregistrement,
        Self::DateInstallation,
        Self::Regime,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::DateAutorisation => "date-d-autorisation",
            Self::DateDeclaration => "date-d-declaration",
            Self::DateEnregistrement => "date-d-enregistrement",
            Self::DateInstallation => "date-d-installation",
            Self::Regime => "regime",
        }
    }

    pub fn parameter_type(&self) -> ParameterType {
        match self {
            Self::Regime => ParameterType::Regime,
            _ => ParameterType::Date,
        }
    }

    pub fn parameter(&self) -> Parameter {
        Parameter::new(self.id(), self.parameter_type())
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|known| known.id() == id)
    }

    /// French noun phrase naming the parameter in warnings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DateAutorisation => "la date d'autorisation",
            Self::DateDeclaration => "la date de déclaration",
            Self::DateEnregistrement => "la date d'enregistrement",
            Self::DateInstallation => "la date de mise en service",
            Self::Regime => "le régime",
        }
    }
}

/// Classification regime of an installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Regime {
    /// Autorisation
    A,
    /// Enregistrement
    E,
    /// Déclaration
    D,
    /// Déclaration avec contrôle
    DC,
    /// Non classé
    NC,
}

impl Regime {
    pub const ALL: [Regime; 5] = [Self::A, Self::E, Self::D, Self::DC, Self::NC];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::E => "E",
            Self::D => "D",
            Self::DC => "DC",
            Self::NC => "NC",
        }
    }

    /// French name used in warnings (`le régime est à autorisation`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::A => "autorisation",
            Self::E => "enregistrement",
            Self::D | Self::DC => "déclaration",
            Self::NC => "NC",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Regime {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|regime| regime.as_str() == s)
            .ok_or_else(|| format!("unknown regime '{s}'"))
    }
}

/// Value of a parameter.
///
/// Serialized untagged: booleans as JSON booleans, dates as Unix timestamps
/// (seconds, midnight UTC), regimes as their code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Date(#[serde(with = "unix_date")] NaiveDate),
    Regime(Regime),
}

impl ParameterValue {
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            Self::Bool(_) => ParameterType::Boolean,
            Self::Date(_) => ParameterType::Date,
            Self::Regime(_) => ParameterType::Regime,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }

    /// Compare two values of the same type. Only dates are ordered; other
    /// types compare as `Equal` or not at all.
    pub fn compare(&self, other: &ParameterValue) -> Option<Ordering> {
        match (self, other) {
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            _ if self == other => Some(Ordering::Equal),
            _ => None,
        }
    }

    /// Read a user-supplied JSON value for a parameter of `parameter_type`.
    ///
    /// Dates accept `YYYY-MM-DD` strings or Unix timestamps; regimes accept
    /// their code; booleans accept JSON booleans.
    pub fn from_json(parameter: &Parameter, value: &serde_json::Value) -> Result<Self> {
        let invalid = |reason: String| EngineError::InvalidParameterValue {
            parameter: parameter.id.clone(),
            reason,
        };
        match (parameter.parameter_type, value) {
            (ParameterType::Boolean, serde_json::Value::Bool(b)) => Ok(Self::Bool(*b)),
            (ParameterType::Date, serde_json::Value::String(s)) => {
                NaiveDate::parse_from_str(s, DATE_LABEL_FORMAT)
                    .map(Self::Date)
                    .map_err(|e| invalid(format!("'{s}' is not a YYYY-MM-DD date ({e})")))
            }
            (ParameterType::Date, serde_json::Value::Number(n)) => n
                .as_i64()
                .and_then(date_from_timestamp)
                .map(Self::Date)
                .ok_or_else(|| invalid(format!("{n} is not a valid timestamp"))),
            (ParameterType::Regime, serde_json::Value::String(s)) => {
                s.parse().map(Self::Regime).map_err(invalid)
            }
            (expected, other) => Err(invalid(format!("expected a {expected} value, got {other}"))),
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Date(date) => write!(f, "{}", date.format(DATE_LABEL_FORMAT)),
            Self::Regime(regime) => write!(f, "{regime}"),
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<NaiveDate> for ParameterValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<Regime> for ParameterValue {
    fn from(regime: Regime) -> Self {
        Self::Regime(regime)
    }
}

/// An assignment of values to parameters. Absent parameters are unknown.
pub type ParameterValues = BTreeMap<Parameter, ParameterValue>;

/// Key an assignment by parameter id, for JSON output.
pub fn values_by_id(values: &ParameterValues) -> BTreeMap<String, ParameterValue> {
    values
        .iter()
        .map(|(parameter, value)| (parameter.id.clone(), value.clone()))
        .collect()
}

/// Read raw `id → value` pairs against the parameters a parametrization uses.
///
/// Ids unknown to `parameters` fall back to the well-known parameters, and are
/// skipped (they cannot change any condition) when they are not well-known.
pub fn parse_values<'a>(
    parameters: impl IntoIterator<Item = &'a Parameter>,
    raw: &BTreeMap<String, serde_json::Value>,
) -> Result<ParameterValues> {
    let by_id: BTreeMap<&str, &Parameter> = parameters
        .into_iter()
        .map(|parameter| (parameter.id.as_str(), parameter))
        .collect();
    let mut values = ParameterValues::new();
    for (id, value) in raw {
        let parameter = match by_id.get(id.as_str()) {
            Some(parameter) => (*parameter).clone(),
            None => match WellKnownParameter::from_id(id) {
                Some(known) => known.parameter(),
                None => {
                    tracing::debug!(parameter = %id, "Ignoring value of unused parameter");
                    continue;
                }
            },
        };
        let parsed = ParameterValue::from_json(&parameter, value)?;
        values.insert(parameter, parsed);
    }
    Ok(values)
}

/// Midnight UTC timestamp of a date.
pub fn date_to_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Date (UTC) of a Unix timestamp.
pub fn date_from_timestamp(seconds: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(seconds, 0).map(|datetime| datetime.date_naive())
}

/// Serde adapter storing dates as Unix timestamps.
pub mod unix_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(super::date_to_timestamp(*date))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDate {
        Seconds(i64),
        Text(String),
    }

    /// Accepts Unix timestamps and, for hand-written files, `YYYY-MM-DD` strings.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        match RawDate::deserialize(deserializer)? {
            RawDate::Seconds(seconds) => super::date_from_timestamp(seconds)
                .ok_or_else(|| de::Error::custom(format!("timestamp {seconds} is out of range"))),
            RawDate::Text(text) => NaiveDate::parse_from_str(&text, super::DATE_LABEL_FORMAT)
                .map_err(|e| de::Error::custom(format!("'{text}' is not a date: {e}"))),
        }
    }
}
