//! Error types for the versioning engine

use arrete_shared::SectionPath;
use thiserror::Error;

/// Authoring mistakes found when a parametrization is loaded.
///
/// Every variant carries the section path it was found at and a rendering of
/// the offending condition(s), so that the mistake can be located.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParametrizationError {
    /// A leaf target does not have the type of its parameter
    #[error("Type mismatch at {path:?} in `{condition}`: parameter '{parameter}' expects {expected}")]
    TypeMismatch {
        path: SectionPath,
        condition: String,
        parameter: String,
        expected: String,
    },

    /// A range whose left bound is not below its right bound
    #[error("Empty range at {path:?}: `{condition}`")]
    InvalidRange { path: SectionPath, condition: String },

    /// An AND/OR condition without children
    #[error("Empty composite condition at {path:?}: `{condition}`")]
    EmptyComposite { path: SectionPath, condition: String },

    /// A condition nested deeper than the configured maximum
    #[error("Condition at {path:?} is nested {depth} levels deep (maximum {max})")]
    ConditionTooDeep {
        path: SectionPath,
        depth: usize,
        max: usize,
    },

    /// Two conditions on the same entity target the same discrete value
    #[error("Conditions on {path:?} can be satisfied simultaneously through '{parameter}': `{first}` and `{second}`")]
    DuplicateDiscreteTarget {
        path: SectionPath,
        parameter: String,
        first: String,
        second: String,
    },

    /// A discrete parameter used with an ordering condition
    #[error("Parameter '{parameter}' only supports EQUAL conditions, got `{condition}` at {path:?}")]
    NonEqualDiscreteCondition {
        path: SectionPath,
        parameter: String,
        condition: String,
    },

    /// Two date conditions on the same entity overlap
    #[error("Date ranges on {path:?} overlap for '{parameter}': `{first}` and `{second}`")]
    OverlappingDateRanges {
        path: SectionPath,
        parameter: String,
        first: String,
        second: String,
    },

    /// Several alternatives of one section can be satisfied together
    #[error("Alternative sections of {path:?} can be satisfied simultaneously: `{first}` and `{second}`")]
    AmbiguousAlternatives {
        path: SectionPath,
        first: String,
        second: String,
    },

    /// An alternative and a whole-section non-application can hold together
    #[error("Section {path:?} can be both replaced (`{alternative}`) and inapplicable (`{non_application}`)")]
    ConflictingAlternativeAndNonApplication {
        path: SectionPath,
        alternative: String,
        non_application: String,
    },

    /// A malformed entity reference
    #[error("Invalid entity reference {path:?}: {reason}")]
    InvalidEntityReference { path: SectionPath, reason: String },

    /// A path or alinea index absent from the document
    #[error("Section {path:?} does not exist in the document{detail}")]
    UnknownSection { path: SectionPath, detail: String },
}

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Parametrization rejected by the consistency checker
    #[error("Inconsistent parametrization: {0}")]
    Parametrization(#[from] ParametrizationError),

    /// The cartesian product of parameter options is too large
    #[error("Too many versions: {count} combinations (maximum {max})")]
    TooManyVersions { count: usize, max: usize },

    /// Several procedure dates are referenced and no regime selects one
    #[error("Cannot choose among date parameters {parameters:?} without a known regime")]
    MissingRegime { parameters: Vec<String> },

    /// A parameter value that cannot be read for its parameter type
    #[error("Invalid value for parameter '{parameter}': {reason}")]
    InvalidParameterValue { parameter: String, reason: String },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_path() {
        let err = ParametrizationError::AmbiguousAlternatives {
            path: vec![1, 0],
            first: "regime == A".to_string(),
            second: "regime == A".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("[1, 0]"));
        assert!(msg.contains("regime == A"));
    }

    #[test]
    fn test_engine_error_wraps_parametrization_error() {
        let err: EngineError = ParametrizationError::InvalidEntityReference {
            path: vec![],
            reason: "empty path".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Inconsistent parametrization"));
    }

    #[test]
    fn test_too_many_versions_display() {
        let err = EngineError::TooManyVersions {
            count: 10_000,
            max: 4_096,
        };
        assert_eq!(
            err.to_string(),
            "Too many versions: 10000 combinations (maximum 4096)"
        );
    }
}
