//! The section tree.

use std::collections::BTreeMap;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::text::EnrichedString;

/// Root-relative child indices identifying a node: `[1, 0]` is the first
/// subsection of the second section. The empty path is the root.
pub type SectionPath = Vec<usize>;

/// Length of generated node identifiers.
const ID_LENGTH: usize = 12;

/// Generate a random alphanumeric node identifier.
pub fn random_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Outcome of applying a parametrization to one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicability {
    pub active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_inactive: Option<String>,

    #[serde(default)]
    pub modified: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Default for Applicability {
    fn default() -> Self {
        Self {
            active: true,
            reason_inactive: None,
            modified: false,
            warnings: Vec::new(),
        }
    }
}

/// A node of the section tree.
///
/// `sections` are in reading order and exclusively owned. `id` is random and
/// only used as a join key; it never carries structural meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredText {
    pub title: EnrichedString,

    #[serde(default)]
    pub outer_alineas: Vec<EnrichedString>,

    #[serde(default)]
    pub sections: Vec<StructuredText>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicability: Option<Applicability>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_str: Option<String>,

    /// Opaque back-reference to the source fragment (e.g. a legal article id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_article: Option<String>,

    #[serde(default = "random_id")]
    pub id: String,
}

impl StructuredText {
    pub fn new(
        title: EnrichedString,
        outer_alineas: Vec<EnrichedString>,
        sections: Vec<StructuredText>,
    ) -> Self {
        Self {
            title,
            outer_alineas,
            sections,
            applicability: None,
            reference_str: None,
            source_article: None,
            id: random_id(),
        }
    }

    #[must_use]
    pub fn with_source_article(mut self, source_article: impl Into<String>) -> Self {
        self.source_article = Some(source_article.into());
        self
    }

    /// Whether this node is active. Nodes never annotated are active.
    pub fn is_active(&self) -> bool {
        self.applicability.as_ref().map_or(true, |a| a.active)
    }

    /// Whether an alternative section replaced this node's content.
    pub fn is_modified(&self) -> bool {
        self.applicability.as_ref().is_some_and(|a| a.modified)
    }

    /// Warnings attached by the applier, if any.
    pub fn warnings(&self) -> &[String] {
        self.applicability
            .as_ref()
            .map(|a| a.warnings.as_slice())
            .unwrap_or_default()
    }

    /// Node at `path`, relative to this node.
    pub fn section_at(&self, path: &[usize]) -> Option<&StructuredText> {
        path.iter()
            .try_fold(self, |node, index| node.sections.get(*index))
    }

    /// Every path below this node, in depth-first reading order.
    pub fn section_paths(&self) -> Vec<SectionPath> {
        let mut paths = Vec::new();
        let mut prefix = Vec::new();
        self.collect_paths(&mut prefix, &mut paths);
        paths
    }

    fn collect_paths(&self, prefix: &mut SectionPath, paths: &mut Vec<SectionPath>) {
        for (index, section) in self.sections.iter().enumerate() {
            prefix.push(index);
            paths.push(prefix.clone());
            section.collect_paths(prefix, paths);
            prefix.pop();
        }
    }

    /// All descendant sections, depth-first.
    pub fn descendants(&self) -> Vec<&StructuredText> {
        let mut result = Vec::new();
        for section in &self.sections {
            result.push(section);
            result.extend(section.descendants());
        }
        result
    }

    /// Markdown-like lines: titles prefixed by `#` per depth, then alineas.
    pub fn text_lines(&self, level: usize) -> Vec<String> {
        let title = self.title.text.trim();
        let mut lines = vec![if level == 0 {
            title.to_string()
        } else {
            format!("{} {title}", "#".repeat(level))
        }];
        for alinea in &self.outer_alineas {
            lines.extend(alinea.text_lines().iter().map(|line| line.trim().to_string()));
        }
        for section in &self.sections {
            lines.extend(section.text_lines(level + 1));
        }
        lines
    }

    /// Map each node id to the chain of titles leading to it, this node's title first.
    pub fn titles_sequences(&self) -> BTreeMap<String, Vec<String>> {
        let mut result = BTreeMap::new();
        for section in &self.sections {
            for (id, chain) in section.titles_sequences() {
                let mut full = Vec::with_capacity(chain.len() + 1);
                full.push(self.title.text.clone());
                full.extend(chain);
                result.insert(id, full);
            }
        }
        result.insert(self.id.clone(), vec![self.title.text.clone()]);
        result
    }

    /// Structural equality, ignoring node ids.
    pub fn same_shape(&self, other: &StructuredText) -> bool {
        self.title == other.title
            && self.outer_alineas == other.outer_alineas
            && self.applicability == other.applicability
            && self.reference_str == other.reference_str
            && self.source_article == other.source_article
            && self.sections.len() == other.sections.len()
            && self
                .sections
                .iter()
                .zip(&other.sections)
                .all(|(a, b)| a.same_shape(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaf(title: &str) -> StructuredText {
        StructuredText::new(EnrichedString::new(title), vec![], vec![])
    }

    fn sample() -> StructuredText {
        StructuredText::new(
            EnrichedString::new("Arrêté"),
            vec![EnrichedString::new("Préambule")],
            vec![
                StructuredText::new(
                    EnrichedString::new("Article 1"),
                    vec![],
                    vec![leaf("1.1"), leaf("1.2")],
                ),
                leaf("Article 2"),
            ],
        )
    }

    #[test]
    fn test_random_ids_differ() {
        let id = random_id();
        assert_eq!(id.len(), ID_LENGTH);
        assert_ne!(id, random_id());
    }

    #[test]
    fn test_section_at() {
        let text = sample();
        assert_eq!(text.section_at(&[]).map(|s| s.title.text.as_str()), Some("Arrêté"));
        assert_eq!(text.section_at(&[0, 1]).map(|s| s.title.text.as_str()), Some("1.2"));
        assert!(text.section_at(&[0, 2]).is_none());
        assert!(text.section_at(&[1, 0]).is_none());
    }

    #[test]
    fn test_section_paths_are_in_reading_order() {
        assert_eq!(
            sample().section_paths(),
            vec![vec![0], vec![0, 0], vec![0, 1], vec![1]]
        );
    }

    #[test]
    fn test_descendants() {
        let text = sample();
        let titles: Vec<&str> = text
            .descendants()
            .iter()
            .map(|s| s.title.text.as_str())
            .collect();
        assert_eq!(titles, vec!["Article 1", "1.1", "1.2", "Article 2"]);
    }

    #[test]
    fn test_text_lines() {
        assert_eq!(
            sample().text_lines(0),
            vec!["Arrêté", "Préambule", "# Article 1", "## 1.1", "## 1.2", "# Article 2"]
        );
    }

    #[test]
    fn test_titles_sequences() {
        let text = sample();
        let sequences = text.titles_sequences();
        let nested = &text.sections[0].sections[1];
        assert_eq!(
            sequences[&nested.id],
            vec!["Arrêté".to_string(), "Article 1".to_string(), "1.2".to_string()]
        );
        assert_eq!(sequences[&text.id], vec!["Arrêté".to_string()]);
        assert_eq!(sequences.len(), 5);
    }

    #[test]
    fn test_same_shape_ignores_ids() {
        let a = sample();
        let b = sample();
        assert_ne!(a, b);
        assert!(a.same_shape(&b));

        let mut c = sample();
        c.sections[1].title = EnrichedString::new("Article 3");
        assert!(!a.same_shape(&c));
    }

    #[test]
    fn test_round_trip() {
        let mut text = sample();
        text.sections[0].applicability = Some(Applicability {
            active: false,
            reason_inactive: Some("raison".to_string()),
            modified: false,
            warnings: vec!["attention".to_string()],
        });
        text.reference_str = Some("Art. 1".to_string());
        let json = serde_json::to_string(&text).unwrap();
        let loaded: StructuredText = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, text);
    }

    #[test]
    fn test_missing_id_is_generated() {
        let loaded: StructuredText =
            serde_json::from_str(r#"{"title": {"text": "T"}}"#).unwrap();
        assert_eq!(loaded.id.len(), ID_LENGTH);
        assert!(loaded.is_active());
        assert!(!loaded.is_modified());
        assert!(loaded.warnings().is_empty());
    }
}
