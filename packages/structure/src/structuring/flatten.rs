//! Flattening a section tree back into leveled elements.

use arrete_shared::{EnrichedString, StructuredText, TextElement, Title};

/// Flatten the content of `text` below its title.
///
/// Sections become titles at their depth (1 for direct children) carrying the
/// node id, alineas become text lines and table alineas become tables.
/// Building the result under the same title gives back a tree of the same shape.
pub fn to_text_elements(text: &StructuredText) -> Vec<TextElement> {
    let mut elements = Vec::new();
    push_content(text, 1, &mut elements);
    elements
}

fn push_content(text: &StructuredText, child_level: usize, out: &mut Vec<TextElement>) {
    out.extend(text.outer_alineas.iter().map(alinea_to_element));
    for section in &text.sections {
        out.push(TextElement::Title(
            Title::new(section.title.text.clone(), child_level).with_id(section.id.clone()),
        ));
        push_content(section, child_level + 1, out);
    }
}

fn alinea_to_element(alinea: &EnrichedString) -> TextElement {
    match &alinea.table {
        Some(table) => TextElement::Table(table.clone()),
        None => TextElement::Text(alinea.text.clone()),
    }
}
