//! Title inference for untagged prose.

use arrete_shared::{TextElement, Title};

use crate::config::MAX_STRUCTURE_DEPTH;
use crate::numbering::{detect_pattern, guess_from_detected};

/// Turn numbered text lines into leveled titles, starting at level 1.
///
/// At each nesting level the first validated numbering pattern wins: lines
/// carrying it become titles, and the lines between two of them are tagged
/// recursively one level deeper. Tables and existing titles pass through
/// unchanged and are never taken for titles.
pub fn tag_titles(elements: &[TextElement]) -> Vec<TextElement> {
    tag_titles_from(elements, 1, MAX_STRUCTURE_DEPTH)
}

pub(crate) fn tag_titles_from(
    elements: &[TextElement],
    first_level: usize,
    max_depth: usize,
) -> Vec<TextElement> {
    let mut tagged = Vec::with_capacity(elements.len());
    tag_run(elements, first_level, first_level + max_depth, &mut tagged);
    tagged
}

fn tag_run(elements: &[TextElement], level: usize, max_level: usize, out: &mut Vec<TextElement>) {
    if level >= max_level {
        out.extend_from_slice(elements);
        return;
    }

    let lines: Vec<&str> = elements
        .iter()
        .map(|element| match element {
            TextElement::Text(text) => text.as_str(),
            TextElement::Title(_) | TextElement::Table(_) => "",
        })
        .collect();
    let detected: Vec<_> = elements
        .iter()
        .map(|element| match element {
            TextElement::Text(text) => detect_pattern(text),
            TextElement::Title(_) | TextElement::Table(_) => None,
        })
        .collect();

    let Some(pattern) = guess_from_detected(&lines, &detected) else {
        out.extend_from_slice(elements);
        return;
    };

    let heads: Vec<usize> = detected
        .iter()
        .enumerate()
        .filter(|(_, candidate)| **candidate == Some(pattern))
        .map(|(index, _)| index)
        .collect();
    tracing::debug!(
        pattern = %pattern,
        level,
        titles = heads.len(),
        "Tagging numbered lines as titles"
    );

    let first = heads.first().copied().unwrap_or(elements.len());
    out.extend_from_slice(&elements[..first]);
    for (rank, start) in heads.iter().enumerate() {
        let end = heads.get(rank + 1).copied().unwrap_or(elements.len());
        out.push(TextElement::Title(Title::new(lines[*start], level)));
        tag_run(&elements[start + 1..end], level + 1, max_level, out);
    }
}
