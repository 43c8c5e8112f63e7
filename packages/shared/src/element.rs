//! Flat typed elements produced by format adapters and consumed by the structurer.

use serde::{Deserialize, Serialize};

use crate::text::Table;

/// A title with an explicit hierarchy level (1 is the top level).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
    pub level: usize,

    /// Optional anchor identifier carried over from the source markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Title {
    pub fn new(text: impl Into<String>, level: usize) -> Self {
        Self {
            text: text.into(),
            level,
            id: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// One element of the flat, reading-ordered input of the structurer.
///
/// Serialized untagged: a bare string is a text line, an object with `text`
/// and `level` is a title, an object with `rows` is a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextElement {
    Text(String),
    Title(Title),
    Table(Table),
}

impl TextElement {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn title(text: impl Into<String>, level: usize) -> Self {
        Self::Title(Title::new(text, level))
    }

    /// Level of this element when it is a title.
    pub fn title_level(&self) -> Option<usize> {
        match self {
            Self::Title(title) => Some(title.level),
            Self::Text(_) | Self::Table(_) => None,
        }
    }
}

impl From<&str> for TextElement {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Title> for TextElement {
    fn from(title: Title) -> Self {
        Self::Title(title)
    }
}

impl From<Table> for TextElement {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{Cell, Row};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_mixed_elements() {
        let json = r#"[
            "Article 1",
            {"text": "Chapitre I", "level": 1},
            {"rows": [{"cells": [{"content": {"text": "a"}}], "is_header": true}]}
        ]"#;
        let elements: Vec<TextElement> = serde_json::from_str(json).unwrap();

        assert_eq!(elements[0], TextElement::text("Article 1"));
        assert_eq!(elements[1], TextElement::title("Chapitre I", 1));
        assert_eq!(
            elements[2],
            TextElement::Table(Table::new(vec![Row::header(vec![Cell::new("a")])]))
        );
    }

    #[test]
    fn test_title_level() {
        assert_eq!(TextElement::title("x", 3).title_level(), Some(3));
        assert_eq!(TextElement::text("x").title_level(), None);
    }

    #[test]
    fn test_title_id_round_trip() {
        let title = Title::new("Annexe", 2).with_id("anchor-1");
        let json = serde_json::to_string(&TextElement::from(title.clone())).unwrap();
        let loaded: TextElement = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, TextElement::Title(title));
    }
}
