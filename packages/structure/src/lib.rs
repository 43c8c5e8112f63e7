//! Arrêté structurer
//!
//! Infers the section tree of French ministerial orders from flat text:
//!
//! - [`numbering`] classifies lines against a catalog of enumeration styles
//!   ("1.", "1.2.", "I.", "a)", "Article 3", ...) and validates that a style
//!   really structures a run of lines.
//! - [`structuring`] turns leveled titles, or numbered prose, into a
//!   [`StructuredText`] tree.
//!
//! # Example
//!
//! ```
//! use arrete_structure::{structure_lines, TextElement};
//!
//! let elements = vec![
//!     TextElement::text("1. Dispositions générales"),
//!     TextElement::text("Le présent arrêté s'applique."),
//!     TextElement::text("2. Prescriptions"),
//! ];
//! let tree = structure_lines(None, &elements).unwrap();
//! assert_eq!(tree.sections.len(), 2);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod numbering;
pub mod output;
pub mod structuring;

pub use arrete_shared::{EnrichedString, StructuredText, TextElement, Title};
pub use error::{Result, StructurationError};
pub use numbering::{detect_pattern, guess_numbering_pattern, NumberingPattern};
pub use structuring::{
    add_references, build, promote_leading_title, structure_lines, tag_titles, to_text_elements,
    Structurer,
};
