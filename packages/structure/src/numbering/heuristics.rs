//! Heuristics telling titles apart from prose.

use crate::config::{MAINLY_UPPER_RATIO, MAX_TITLE_WORDS};

/// Words that start sentences rather than titles.
const NON_TITLE_WORDS: &[&str] = &["le", "la", "les", "l", "un", "une", "pour", "sur", "sans"];

/// Whether nearly all letters of `sentence` are upper case.
pub fn is_mainly_upper(sentence: &str) -> bool {
    let (letters, upper) = sentence
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(letters, upper), c| {
            (letters + 1, upper + usize::from(c.is_uppercase()))
        });
    upper as f64 / letters.max(1) as f64 >= MAINLY_UPPER_RATIO
}

fn first_word(sentence: &str) -> &str {
    let word = sentence.split(' ').next().unwrap_or_default();
    word.split(['\'', '’']).next().unwrap_or_default()
}

/// Whether a leading paragraph is probably the title of its article.
pub fn is_probably_title(candidate: &str) -> bool {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return false;
    }
    if is_mainly_upper(candidate) {
        return true;
    }
    if NON_TITLE_WORDS.contains(&first_word(candidate).to_lowercase().as_str()) {
        return false;
    }
    if candidate.ends_with(':') {
        return false;
    }
    candidate.split(' ').count() < MAX_TITLE_WORDS
}
