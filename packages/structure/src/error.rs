//! Error types for structuring.

use thiserror::Error;

/// Main error type for the structuring library.
#[derive(Debug, Error)]
pub enum StructurationError {
    /// Title levels start at 1.
    #[error("Invalid title level 0 for '{text}'. Levels start at 1")]
    InvalidTitleLevel { text: String },

    /// A title is not strictly deeper than the title it is nested under.
    #[error("Title '{text}' has level {level} but is nested under a level {parent_level} title")]
    InconsistentTitleLevel {
        text: String,
        level: usize,
        parent_level: usize,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Result type alias for structuring operations.
pub type Result<T> = std::result::Result<T, StructurationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StructurationError::InconsistentTitleLevel {
            text: "1.1. Sous-titre".to_string(),
            level: 1,
            parent_level: 2,
        };
        assert_eq!(
            err.to_string(),
            "Title '1.1. Sous-titre' has level 1 but is nested under a level 2 title"
        );
    }

    #[test]
    fn test_invalid_level_display() {
        let err = StructurationError::InvalidTitleLevel {
            text: "Titre".to_string(),
        };
        assert!(err.to_string().contains("Titre"));
    }
}
