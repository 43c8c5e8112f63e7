//! Configuration constants for structuring.

/// Number of leading characters compared against the numbering exception list.
pub const MAX_PREFIX_LEN: usize = 60;

/// Maximum depth of the section tree built by the structurer.
///
/// Titles found below this depth are flattened into plain alineas of the
/// deepest node. Real orders rarely go beyond five levels.
pub const MAX_STRUCTURE_DEPTH: usize = 16;

/// Share of upper-case letters above which a line reads as a title.
pub const MAINLY_UPPER_RATIO: f64 = 0.97;

/// Sentences with at least this many words are never taken for titles.
pub const MAX_TITLE_WORDS: usize = 15;

/// Text wrap width of the `show` outline.
pub const OUTLINE_WRAP_WIDTH: usize = 100;

/// File extension of structured documents read and written by the batch command.
pub const DOCUMENT_EXTENSION: &str = "json";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_reasonable() {
        assert!(MAX_PREFIX_LEN >= 20);
        assert!(MAX_STRUCTURE_DEPTH >= 4);
        assert!(MAINLY_UPPER_RATIO > 0.5 && MAINLY_UPPER_RATIO <= 1.0);
        assert!(MAX_TITLE_WORDS > 1);
        assert!(OUTLINE_WRAP_WIDTH >= 40);
        assert!(!DOCUMENT_EXTENSION.starts_with('.'));
    }
}
