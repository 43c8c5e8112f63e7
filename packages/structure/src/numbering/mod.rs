//! Numbering pattern detection.
//!
//! Classifies lines against a fixed catalog of enumeration styles, rejects
//! known false positives and validates that a detected style really
//! structures a run of lines.

pub mod catalog;
pub mod detect;
pub mod exceptions;
pub mod heuristics;

pub use catalog::NumberingPattern;
pub use detect::{
    detect_longest_match, detect_pattern, detect_patterns, guess_from_detected,
    guess_numbering_pattern, is_valid, matched_prefix, prefixes_are_increasing,
};
pub use heuristics::{is_mainly_upper, is_probably_title};
