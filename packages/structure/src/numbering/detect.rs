//! Line classification and pattern validation.

use std::borrow::Cow;
use std::collections::HashSet;

use unicode_normalization::{is_nfc, UnicodeNormalization};

use super::catalog::NumberingPattern;
use super::exceptions::is_exception;

/// NFC form of `line`, borrowed when already normalized.
pub fn normalize(line: &str) -> Cow<'_, str> {
    if is_nfc(line) {
        Cow::Borrowed(line)
    } else {
        Cow::Owned(line.nfc().collect())
    }
}

/// The catalog pattern matching the longest prefix of `line`, with the
/// length of that prefix in bytes.
///
/// Ties go to the pattern declared first. The exception list is not consulted.
pub fn detect_longest_match(line: &str) -> Option<(NumberingPattern, usize)> {
    let mut best: Option<(NumberingPattern, usize)> = None;
    for pattern in NumberingPattern::ALL {
        let Some(found) = pattern.regex().find(line) else {
            continue;
        };
        let size = found.end();
        if best.map_or(true, |(_, best_size)| size > best_size) {
            best = Some((pattern, size));
        }
    }
    best
}

/// The numbering prefix of `line` (`"1.2. "`, `"IV.-"`), if any.
pub fn matched_prefix(line: &str) -> Option<&str> {
    detect_longest_match(line).map(|(_, size)| &line[..size])
}

/// Classify one line, or `None` when it carries no numbering.
///
/// Lines whose prefix is a known false positive never match.
pub fn detect_pattern(line: &str) -> Option<NumberingPattern> {
    let line = normalize(line);
    if is_exception(&line) {
        return None;
    }
    detect_longest_match(&line).map(|(pattern, _)| pattern)
}

/// Classify every line.
pub fn detect_patterns<S: AsRef<str>>(lines: &[S]) -> Vec<Option<NumberingPattern>> {
    lines.iter().map(|line| detect_pattern(line.as_ref())).collect()
}

/// Whether the catalog instances of `pattern` appear in non-decreasing order.
///
/// Every line must start with an instance of the pattern's catalog.
pub fn prefixes_are_increasing<S: AsRef<str>>(pattern: NumberingPattern, lines: &[S]) -> bool {
    let mut previous: Option<Vec<u32>> = None;
    for line in lines {
        let Some(key) = pattern.instance_key(&normalize(line.as_ref())) else {
            return false;
        };
        if previous.as_ref().is_some_and(|prev| key < *prev) {
            return false;
        }
        previous = Some(key);
    }
    true
}

/// Whether at least one line ends a clause (`;` or `:` in its last two characters).
pub fn has_clause_ending<S: AsRef<str>>(lines: &[S]) -> bool {
    lines.iter().any(|line| {
        line.as_ref()
            .chars()
            .rev()
            .take(2)
            .any(|c| c == ';' || c == ':')
    })
}

/// Check that `pattern` really structures `lines`, the lines it was detected on.
pub fn is_valid<S: AsRef<str>>(pattern: NumberingPattern, lines: &[S]) -> bool {
    if pattern.requires_increasing_order() && !prefixes_are_increasing(pattern, lines) {
        return false;
    }
    if pattern.requires_clause_ending() && !has_clause_ending(lines) {
        return false;
    }
    true
}

/// Pick the pattern structuring `lines` from already detected patterns.
///
/// Patterns are tried in order of first appearance; a pattern is kept when it
/// validates on the lines carrying it.
pub fn guess_from_detected<S: AsRef<str>>(
    lines: &[S],
    detected: &[Option<NumberingPattern>],
) -> Option<NumberingPattern> {
    let mut rejected = HashSet::new();
    for pattern in detected.iter().flatten() {
        if rejected.contains(pattern) {
            continue;
        }
        let group: Vec<&str> = lines
            .iter()
            .zip(detected)
            .filter(|(_, candidate)| **candidate == Some(*pattern))
            .map(|(line, _)| line.as_ref())
            .collect();
        if is_valid(*pattern, &group) {
            return Some(*pattern);
        }
        tracing::debug!(
            pattern = %pattern,
            lines = group.len(),
            "Numbering pattern rejected by validation"
        );
        rejected.insert(*pattern);
    }
    None
}

/// Pick the pattern structuring `lines`, or `None`.
pub fn guess_numbering_pattern<S: AsRef<str>>(lines: &[S]) -> Option<NumberingPattern> {
    let detected = detect_patterns(lines);
    guess_from_detected(lines, &detected)
}
