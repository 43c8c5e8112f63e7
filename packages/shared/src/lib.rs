//! Document model shared by the structuring and versioning crates.
//!
//! A ministerial order (arrêté ministériel) is represented as a tree of
//! [`StructuredText`] nodes. Each node owns a title, the paragraphs
//! ("alineas") that come before its first subsection, and its subsections.
//! The flat input of the structurer is a sequence of [`TextElement`]s.

pub mod element;
pub mod structured_text;
pub mod text;

pub use element::{TextElement, Title};
pub use structured_text::{random_id, Applicability, SectionPath, StructuredText};
pub use text::{Cell, EnrichedString, Link, Row, Table};
