//! Human-readable reference labels (`Art. 2 2.1.`) derived from title chains.

use std::sync::LazyLock;

use arrete_shared::StructuredText;
use regex::Regex;

use crate::numbering::catalog::ROMAN;
use crate::numbering::matched_prefix;

/// Dotted or dashed numbering once spaces are removed: `1.`, `1.2.`, `1-2-3.`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static VERBOSE_NUMBERING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(?:[.-][0-9]+)*\.").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ROMAN_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{ROMAN}")).expect("valid regex"));

const SEPARATOR: &str = " ";

/// Fill `reference_str` of every section below the root.
///
/// Labels only start at the first article or annexe title of the chain;
/// sections outside any article get an empty label.
#[must_use]
pub fn add_references(mut text: StructuredText) -> StructuredText {
    let mut chain = Vec::new();
    text.sections = text
        .sections
        .into_iter()
        .map(|section| with_references(section, &mut chain))
        .collect();
    text
}

fn with_references(mut section: StructuredText, chain: &mut Vec<String>) -> StructuredText {
    chain.push(section.title.text.clone());
    section.reference_str = Some(merge_titles(chain));
    section.sections = section
        .sections
        .into_iter()
        .map(|child| with_references(child, chain))
        .collect();
    chain.pop();
    section
}

fn merge_titles(titles: &[String]) -> String {
    let Some(start) = titles.iter().position(|title| is_article_or_annexe(title)) else {
        return String::new();
    };
    let prefixes: Vec<Option<String>> = titles[start..].iter().map(|t| extract_prefix(t)).collect();
    merge_prefixes(&prefixes)
}

fn merge_prefixes(prefixes: &[Option<String>]) -> String {
    match prefixes {
        [] => String::new(),
        [single] => single.clone().unwrap_or_default(),
        [first, rest @ ..] => {
            if is_prefix(first.as_deref(), rest[0].as_deref()) {
                return merge_prefixes(rest);
            }
            let merged_rest = merge_prefixes(rest);
            [first.as_deref().unwrap_or_default(), merged_rest.as_str()]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(SEPARATOR)
        }
    }
}

/// Whether `candidate` is subsumed by the next, longer label.
fn is_prefix(candidate: Option<&str>, long_word: Option<&str>) -> bool {
    let (Some(candidate), Some(long_word)) = (candidate, long_word) else {
        return false;
    };
    if starts_with_ignore_case(candidate, "annexe") && starts_with_ignore_case(long_word, "annexe")
    {
        return true;
    }
    let candidate: String = candidate.chars().filter(|c| *c != ' ').collect();
    let long_word: String = long_word.chars().filter(|c| *c != ' ').collect();
    VERBOSE_NUMBERING.is_match(&candidate)
        && VERBOSE_NUMBERING.is_match(&long_word)
        && long_word.starts_with(&candidate)
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.to_lowercase().starts_with(prefix)
}

fn is_article_or_annexe(title: &str) -> bool {
    starts_with_ignore_case(title, "article") || starts_with_ignore_case(title, "annexe")
}

fn extract_prefix(title: &str) -> Option<String> {
    if starts_with_ignore_case(title, "article") {
        return Some(article_prefix(title));
    }
    if starts_with_ignore_case(title, "annexe") {
        return Some(annexe_prefix(title));
    }
    matched_prefix(title).map(|prefix| prefix.replace(' ', ""))
}

fn is_probably_section_number(candidate: &str) -> bool {
    let alphabetic = !candidate.is_empty() && candidate.chars().all(char::is_alphabetic);
    !alphabetic || candidate.chars().count() <= 2 || ROMAN_START.is_match(candidate)
}

fn article_prefix(title: &str) -> String {
    let words: Vec<&str> = title.split(' ').collect();
    match words.as_slice() {
        [] | [_] => "Art.".to_string(),
        [_, second, ..] if second.to_lowercase() == "annexe" => annexe_prefix(&words[1..].join(" ")),
        [_, number, ..] if is_probably_section_number(number) => format!("Art. {number}"),
        _ => "Art. ?".to_string(),
    }
}

fn annexe_prefix(title: &str) -> String {
    let words: Vec<&str> = title.split(' ').collect();
    match words.as_slice() {
        [] | [_] => "Annexe".to_string(),
        [_, number, ..] if is_probably_section_number(number) => format!("Annexe {number}"),
        _ => "Annexe ?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrete_shared::EnrichedString;
    use pretty_assertions::assert_eq;

    fn node(title: &str, sections: Vec<StructuredText>) -> StructuredText {
        StructuredText::new(EnrichedString::new(title), vec![], sections)
    }

    #[test]
    fn test_extract_prefix() {
        assert_eq!(extract_prefix("Article 2"), Some("Art. 2".to_string()));
        assert_eq!(extract_prefix("Article"), Some("Art.".to_string()));
        assert_eq!(extract_prefix("Article premier"), Some("Art. ?".to_string()));
        assert_eq!(extract_prefix("Article Annexe II"), Some("Annexe II".to_string()));
        assert_eq!(extract_prefix("ANNEXE I"), Some("Annexe I".to_string()));
        assert_eq!(extract_prefix("1. 2. Espacé"), Some("1.2.".to_string()));
        assert_eq!(extract_prefix("Sans numéro"), None);
    }

    #[test]
    fn test_consecutive_numbering_is_merged() {
        let titles: Vec<String> = ["Chapitre I", "Article 2", "1. Foo", "1.1. Bar"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(merge_titles(&titles), "Art. 2 1.1.");
    }

    #[test]
    fn test_no_article_gives_empty_label() {
        let titles = vec!["Chapitre I".to_string(), "1. Foo".to_string()];
        assert_eq!(merge_titles(&titles), "");
    }

    #[test]
    fn test_add_references() {
        let text = node(
            "Arrêté",
            vec![
                node("Article 1", vec![node("1. Généralités", vec![])]),
                node("Annexe I", vec![node("Annexe I - A", vec![])]),
            ],
        );
        let text = add_references(text);
        assert_eq!(text.reference_str, None);
        assert_eq!(text.sections[0].reference_str.as_deref(), Some("Art. 1"));
        assert_eq!(
            text.sections[0].sections[0].reference_str.as_deref(),
            Some("Art. 1 1.")
        );
        assert_eq!(text.sections[1].reference_str.as_deref(), Some("Annexe I"));
        assert_eq!(
            text.sections[1].sections[0].reference_str.as_deref(),
            Some("Annexe I")
        );
    }
}
