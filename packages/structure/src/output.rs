//! Reading element files and writing section trees.

use std::fs;
use std::path::Path;

use arrete_shared::{StructuredText, TextElement};
use clap::ValueEnum;
use textwrap::{fill, Options};

use crate::config::OUTLINE_WRAP_WIDTH;
use crate::error::Result;

/// Serialization format of written trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Load a JSON array of text elements.
pub fn load_elements(path: &Path) -> Result<Vec<TextElement>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load a structured document from JSON.
pub fn load_tree(path: &Path) -> Result<StructuredText> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Serialize a tree in `format`.
pub fn render_tree(tree: &StructuredText, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(tree)?,
        OutputFormat::Yaml => serde_yaml_ng::to_string(tree)?,
    })
}

/// Write a tree to `path`, creating parent directories as needed.
pub fn save_tree(tree: &StructuredText, path: &Path, format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, render_tree(tree, format)?)?;
    Ok(())
}

/// One line of a section outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub depth: usize,
    pub title: String,
    pub alineas: usize,
    pub active: bool,
}

/// Depth-first list of the sections below the root.
pub fn outline(tree: &StructuredText) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    push_outline(tree, 0, &mut entries);
    entries
}

fn push_outline(node: &StructuredText, depth: usize, entries: &mut Vec<OutlineEntry>) {
    for section in &node.sections {
        entries.push(OutlineEntry {
            depth,
            title: section.title.text.clone(),
            alineas: section.outer_alineas.len(),
            active: section.is_active(),
        });
        push_outline(section, depth + 1, entries);
    }
}

/// Wrap an outline title under its indentation.
pub fn wrap_outline_title(entry: &OutlineEntry) -> String {
    let indent = "  ".repeat(entry.depth);
    let options = Options::new(OUTLINE_WRAP_WIDTH)
        .initial_indent(&indent)
        .subsequent_indent(&indent);
    fill(&entry.title, options)
}
