//! Recursive structuring of flat element sequences into section trees.

mod build;
mod flatten;
mod references;
mod tagging;

pub use build::{build, promote_leading_title, structure_lines, Structurer};
pub use flatten::to_text_elements;
pub use references::add_references;
pub use tagging::tag_titles;
