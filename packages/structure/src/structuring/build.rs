//! Recursive section building from leveled elements.

use arrete_shared::{EnrichedString, StructuredText, TextElement, Title};

use crate::config::MAX_STRUCTURE_DEPTH;
use crate::error::{Result, StructurationError};
use crate::numbering::is_probably_title;

use super::tagging::tag_titles_from;

/// Builds section trees from flat element sequences.
///
/// Building is deterministic: the same input always yields the same tree
/// shape. Only the random node ids differ between runs.
#[derive(Debug, Clone)]
pub struct Structurer {
    max_depth: usize,
}

impl Default for Structurer {
    fn default() -> Self {
        Self {
            max_depth: MAX_STRUCTURE_DEPTH,
        }
    }
}

impl Structurer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the depth of built trees. Titles found deeper become alineas.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build a tree from elements whose titles already carry levels.
    ///
    /// The elements are split at every title of the minimum level present.
    /// Elements before the first split point become alineas of the node
    /// (titles among them are built into leading sections); every split point
    /// opens a child built recursively from the elements up to the next one.
    ///
    /// # Errors
    ///
    /// Fails when a title has level 0, or when `title` is given and an element
    /// title is not strictly deeper than it.
    pub fn build(&self, title: Option<&Title>, elements: &[TextElement]) -> Result<StructuredText> {
        check_levels(title, elements)?;
        let root_title = title
            .map(|t| EnrichedString::new(t.text.clone()))
            .unwrap_or_default();
        let mut root = self.build_node(root_title, elements, 0);
        if let Some(id) = title.and_then(|t| t.id.clone()) {
            root.source_article = Some(id);
        }
        Ok(root)
    }

    /// Build a tree from untagged prose, inferring titles from numbering.
    ///
    /// Text lines carrying a validated numbering pattern become titles; their
    /// level follows the nesting in which patterns are found.
    ///
    /// # Errors
    ///
    /// Same as [`Structurer::build`], for titles already present in `elements`.
    pub fn structure_lines(
        &self,
        title: Option<&Title>,
        elements: &[TextElement],
    ) -> Result<StructuredText> {
        let first_level = title.map_or(1, |t| t.level + 1);
        let tagged = tag_titles_from(elements, first_level, self.max_depth);
        self.build(title, &tagged)
    }

    fn build_node(&self, title: EnrichedString, elements: &[TextElement], depth: usize) -> StructuredText {
        let Some(level) = min_title_level(elements) else {
            return StructuredText::new(title, to_alineas(elements), Vec::new());
        };
        if depth >= self.max_depth {
            tracing::warn!(
                depth,
                title = %title.text,
                "Maximum structure depth reached, flattening titles into alineas"
            );
            return StructuredText::new(title, to_alineas(elements), Vec::new());
        }

        // Titles before the first split point are split again at their own
        // minimum level, innermost prefix first, without recursing on `depth`.
        let (mut outer, groups) = split_at_level(elements, level);
        let mut runs = vec![groups];
        while let Some(prefix_level) = min_title_level(outer) {
            let (before, prefix_groups) = split_at_level(outer, prefix_level);
            runs.push(prefix_groups);
            outer = before;
        }

        let sections = runs
            .into_iter()
            .rev()
            .flatten()
            .map(|(head, rest)| self.build_section(head, rest, depth + 1))
            .collect();
        StructuredText::new(title, to_alineas(outer), sections)
    }

    fn build_section(&self, head: &Title, rest: &[TextElement], depth: usize) -> StructuredText {
        let mut section = self.build_node(EnrichedString::new(head.text.clone()), rest, depth);
        section.source_article = head.id.clone();
        section
    }
}

/// Build with the default [`Structurer`].
///
/// # Errors
///
/// See [`Structurer::build`].
pub fn build(title: Option<&Title>, elements: &[TextElement]) -> Result<StructuredText> {
    Structurer::default().build(title, elements)
}

/// Structure untagged prose with the default [`Structurer`].
///
/// # Errors
///
/// See [`Structurer::structure_lines`].
pub fn structure_lines(title: Option<&Title>, elements: &[TextElement]) -> Result<StructuredText> {
    Structurer::default().structure_lines(title, elements)
}

/// Move a leading alinea that reads like a title into an empty node title.
#[must_use]
pub fn promote_leading_title(mut text: StructuredText) -> StructuredText {
    if !text.title.text.trim().is_empty() {
        return text;
    }
    let promote = text
        .outer_alineas
        .first()
        .is_some_and(|first| !first.is_table() && is_probably_title(&first.text));
    if promote {
        let first = text.outer_alineas.remove(0);
        text.title = EnrichedString::new(first.text).with_links(first.links);
    }
    text
}

fn check_levels(title: Option<&Title>, elements: &[TextElement]) -> Result<()> {
    for element in elements {
        let TextElement::Title(element_title) = element else {
            continue;
        };
        if element_title.level == 0 {
            return Err(StructurationError::InvalidTitleLevel {
                text: element_title.text.clone(),
            });
        }
        if let Some(parent) = title {
            if element_title.level <= parent.level {
                return Err(StructurationError::InconsistentTitleLevel {
                    text: element_title.text.clone(),
                    level: element_title.level,
                    parent_level: parent.level,
                });
            }
        }
    }
    Ok(())
}

fn min_title_level(elements: &[TextElement]) -> Option<usize> {
    elements.iter().filter_map(TextElement::title_level).min()
}

type Group<'a> = (&'a Title, &'a [TextElement]);

/// Split at every title of `level`. `level` must be present in `elements`.
fn split_at_level(elements: &[TextElement], level: usize) -> (&[TextElement], Vec<Group<'_>>) {
    let heads: Vec<(usize, &Title)> = elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| match element {
            TextElement::Title(title) if title.level == level => Some((index, title)),
            _ => None,
        })
        .collect();

    let first = heads.first().map_or(elements.len(), |(index, _)| *index);
    let groups = heads
        .iter()
        .enumerate()
        .map(|(rank, (start, title))| {
            let end = heads.get(rank + 1).map_or(elements.len(), |(next, _)| *next);
            (*title, &elements[start + 1..end])
        })
        .collect();
    (&elements[..first], groups)
}

fn to_alineas(elements: &[TextElement]) -> Vec<EnrichedString> {
    elements
        .iter()
        .map(|element| match element {
            TextElement::Text(text) => EnrichedString::new(text.clone()),
            TextElement::Title(title) => EnrichedString::new(title.text.clone()),
            TextElement::Table(table) => EnrichedString::from_table(table.clone()),
        })
        .collect()
}
