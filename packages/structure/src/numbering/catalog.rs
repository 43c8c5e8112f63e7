//! The fixed catalog of enumeration styles found in ministerial orders.
//!
//! Declaration order matters: when two patterns match prefixes of equal
//! length, the one declared first wins.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Roman numerals from I to XXXIX.
///
/// Alternatives are ordered so that a match is never the empty string.
pub const ROMAN: &str = r"(?:X{1,3}(?:I[XV]|V?I{0,3})|I[XV]|V?I{1,3}|V)";

/// Upper bound of the roman instance catalog (XXXIX).
const MAX_ROMAN: u32 = 39;

/// An enumeration style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberingPattern {
    /// `I.-`, `II.-`
    RomanDash,
    /// `I. `, `II. `
    Roman,
    /// `1. `
    NumericD1,
    /// `1.1. `
    NumericD2,
    /// `1.1.1. `
    NumericD3,
    /// `1) `
    NumericD1Paren,
    /// `1. 1. `
    NumericD2Space,
    /// `1-1. `
    NumericD2Dash,
    /// `1. 1. 1. `
    NumericD3Space,
    /// `1-1-1. `
    NumericD3Dash,
    /// `1. 1. 1. 1. `
    NumericD4Space,
    /// `1° `
    NumericCircle,
    /// `a)`
    Letters,
    /// `A. `
    Caps,
    /// `ANNEXE 1`
    Annexe,
    /// `ANNEXE IV`
    AnnexeRoman,
}

impl NumberingPattern {
    /// Every pattern, in catalog declaration order.
    pub const ALL: [NumberingPattern; 16] = [
        Self::RomanDash,
        Self::Roman,
        Self::NumericD1,
        Self::NumericD2,
        Self::NumericD3,
        Self::NumericD1Paren,
        Self::NumericD2Space,
        Self::NumericD2Dash,
        Self::NumericD3Space,
        Self::NumericD3Dash,
        Self::NumericD4Space,
        Self::NumericCircle,
        Self::Letters,
        Self::Caps,
        Self::Annexe,
        Self::AnnexeRoman,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RomanDash => "roman-dash",
            Self::Roman => "roman",
            Self::NumericD1 => "numeric-d1",
            Self::NumericD2 => "numeric-d2",
            Self::NumericD3 => "numeric-d3",
            Self::NumericD1Paren => "numeric-d1-paren",
            Self::NumericD2Space => "numeric-d2-space",
            Self::NumericD2Dash => "numeric-d2-dash",
            Self::NumericD3Space => "numeric-d3-space",
            Self::NumericD3Dash => "numeric-d3-dash",
            Self::NumericD4Space => "numeric-d4-space",
            Self::NumericCircle => "numeric-circle",
            Self::Letters => "letters",
            Self::Caps => "caps",
            Self::Annexe => "annexe",
            Self::AnnexeRoman => "annexe-roman",
        }
    }

    /// Position in the catalog.
    fn rank(&self) -> usize {
        *self as usize
    }

    /// Prefix regex of this pattern.
    pub fn regex(&self) -> &'static Regex {
        &PREFIX_REGEXES[self.rank()]
    }

    /// Whether the pattern's instances must appear in increasing order.
    #[must_use]
    pub fn requires_increasing_order(&self) -> bool {
        matches!(
            self,
            Self::Roman
                | Self::RomanDash
                | Self::NumericD1
                | Self::NumericD2
                | Self::NumericD2Dash
                | Self::NumericD3
                | Self::NumericD3Dash
                | Self::NumericCircle
                | Self::Letters
                | Self::Caps
        )
    }

    /// Whether the pattern conventionally introduces clauses ending with `;`.
    #[must_use]
    pub fn requires_clause_ending(&self) -> bool {
        matches!(self, Self::Letters)
    }

    /// Position of the line's concrete instance in this pattern's instance catalog.
    ///
    /// Keys compare lexicographically in catalog order: `1.2. ` gives `[1, 2]`,
    /// `c) ` gives `[3]`, `IV. ` gives `[4]`. Returns `None` when the line does
    /// not start with an instance of the catalog, including instances beyond
    /// its bounds (`31.1. ` for `numeric-d2`).
    pub fn instance_key(&self, line: &str) -> Option<Vec<u32>> {
        let spec = instance_spec(*self)?;
        let captures = spec.regex.captures(line)?;
        let mut key = Vec::with_capacity(spec.bounds.len());
        for (index, bound) in spec.bounds.iter().enumerate() {
            let raw = captures.get(index + 1)?.as_str();
            let value = spec.component.parse(raw)?;
            if value == 0 || value > *bound {
                return None;
            }
            key.push(value);
        }
        Some(key)
    }
}

impl fmt::Display for NumberingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NumberingPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|pattern| pattern.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown numbering pattern '{s}'"))
    }
}

fn prefix_source(pattern: NumberingPattern) -> String {
    match pattern {
        NumberingPattern::RomanDash => format!(r"^{ROMAN}\.-"),
        NumberingPattern::Roman => format!(r"^{ROMAN}\. "),
        NumberingPattern::NumericD1 => r"^[0-9]+\. ".to_string(),
        NumberingPattern::NumericD2 => r"^([0-9]+\.){2} ".to_string(),
        NumberingPattern::NumericD3 => r"^([0-9]+\.){3} ".to_string(),
        NumberingPattern::NumericD1Paren => r"^[0-9]+\) ".to_string(),
        NumberingPattern::NumericD2Space => r"^([0-9]+\. ){2}".to_string(),
        NumberingPattern::NumericD2Dash => r"^[0-9]+-[0-9]+\. ".to_string(),
        NumberingPattern::NumericD3Space => r"^([0-9]+\. ){3}".to_string(),
        NumberingPattern::NumericD3Dash => r"^[0-9]+-[0-9]+-[0-9]+\. ".to_string(),
        NumberingPattern::NumericD4Space => r"^([0-9]+\. ){4}".to_string(),
        NumberingPattern::NumericCircle => r"^[0-9]+° ".to_string(),
        NumberingPattern::Letters => r"^[a-z]\)".to_string(),
        NumberingPattern::Caps => r"^[A-Z]\. ".to_string(),
        NumberingPattern::Annexe => r"^ANNEXE [0-9]+".to_string(),
        NumberingPattern::AnnexeRoman => format!(r"^ANNEXE {ROMAN}"),
    }
}

/// Prefix regexes indexed by catalog rank.
#[allow(clippy::expect_used)] // Static regexes that are guaranteed to be valid
static PREFIX_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    NumberingPattern::ALL
        .iter()
        .map(|pattern| Regex::new(&prefix_source(*pattern)).expect("valid regex"))
        .collect()
});

/// How a captured instance component maps to its catalog position.
#[derive(Debug, Clone, Copy)]
enum Component {
    Number,
    Roman,
    Lowercase,
    Uppercase,
}

impl Component {
    fn parse(self, raw: &str) -> Option<u32> {
        match self {
            Self::Number => raw.parse().ok(),
            Self::Roman => roman_to_int(raw),
            Self::Lowercase => single_letter_rank(raw, b'a'),
            Self::Uppercase => single_letter_rank(raw, b'A'),
        }
    }
}

fn single_letter_rank(raw: &str, first: u8) -> Option<u32> {
    match raw.as_bytes() {
        [letter] => Some(u32::from(letter.checked_sub(first)?) + 1),
        _ => None,
    }
}

/// Value of a roman numeral made of I, V and X. Returns `None` for other input.
pub fn roman_to_int(raw: &str) -> Option<u32> {
    if raw.is_empty() {
        return None;
    }
    let mut total: i64 = 0;
    let mut previous = 0;
    for c in raw.chars().rev() {
        let value = match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            _ => return None,
        };
        if value < previous {
            total -= value;
        } else {
            total += value;
            previous = value;
        }
    }
    u32::try_from(total).ok()
}

/// Capture regex and per-level bounds of an instance catalog.
struct InstanceSpec {
    regex: Regex,
    bounds: &'static [u32],
    component: Component,
}

#[allow(clippy::expect_used)] // Static regexes that are guaranteed to be valid
fn spec(source: &str, bounds: &'static [u32], component: Component) -> InstanceSpec {
    InstanceSpec {
        regex: Regex::new(source).expect("valid regex"),
        bounds,
        component,
    }
}

static INSTANCE_SPECS: LazyLock<Vec<(NumberingPattern, InstanceSpec)>> = LazyLock::new(|| {
    vec![
        (
            NumberingPattern::Roman,
            spec(&format!(r"^({ROMAN})\. "), &[MAX_ROMAN], Component::Roman),
        ),
        (
            NumberingPattern::RomanDash,
            spec(&format!(r"^({ROMAN})\.-"), &[MAX_ROMAN], Component::Roman),
        ),
        (
            NumberingPattern::NumericD1,
            spec(r"^([0-9]+)\. ", &[100], Component::Number),
        ),
        (
            NumberingPattern::NumericD2,
            spec(r"^([0-9]+)\.([0-9]+)\. ", &[30, 20], Component::Number),
        ),
        (
            NumberingPattern::NumericD3,
            spec(
                r"^([0-9]+)\.([0-9]+)\.([0-9]+)\. ",
                &[30, 20, 20],
                Component::Number,
            ),
        ),
        (
            NumberingPattern::NumericD2Dash,
            spec(r"^([0-9]+)-([0-9]+)\. ", &[100, 20], Component::Number),
        ),
        (
            NumberingPattern::NumericD3Dash,
            spec(
                r"^([0-9]+)-([0-9]+)-([0-9]+)\. ",
                &[59, 20, 10],
                Component::Number,
            ),
        ),
        (
            NumberingPattern::NumericCircle,
            spec(r"^([0-9]+)° ", &[100], Component::Number),
        ),
        (
            NumberingPattern::Letters,
            spec(r"^([a-z])\) ", &[26], Component::Lowercase),
        ),
        (
            NumberingPattern::Caps,
            spec(r"^([A-Z])\. ", &[26], Component::Uppercase),
        ),
    ]
});

fn instance_spec(pattern: NumberingPattern) -> Option<&'static InstanceSpec> {
    INSTANCE_SPECS
        .iter()
        .find(|(candidate, _)| *candidate == pattern)
        .map(|(_, spec)| spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_names() {
        for pattern in NumberingPattern::ALL {
            let json = serde_json::to_string(&pattern).unwrap();
            assert_eq!(json, format!("\"{}\"", pattern.as_str()));
            assert_eq!(pattern.as_str().parse::<NumberingPattern>(), Ok(pattern));
        }
    }

    #[test]
    fn test_catalog_rank_follows_declaration() {
        for (index, pattern) in NumberingPattern::ALL.iter().enumerate() {
            assert_eq!(pattern.rank(), index);
        }
    }

    #[test]
    fn test_roman_regex_matches_full_numeral() {
        let roman = NumberingPattern::Roman.regex();
        for numeral in ["I", "IV", "V", "IX", "X", "XIV", "XXXIX", "VIII"] {
            let line = format!("{numeral}. Dispositions");
            let matched = roman.find(&line).map(|m| m.as_str().to_string());
            assert_eq!(matched, Some(format!("{numeral}. ")), "numeral {numeral}");
        }
        assert!(roman.find(". Rien").is_none());
        assert!(roman.find("L. Autre").is_none());
    }

    #[test]
    fn test_roman_to_int() {
        assert_eq!(roman_to_int("I"), Some(1));
        assert_eq!(roman_to_int("IV"), Some(4));
        assert_eq!(roman_to_int("IX"), Some(9));
        assert_eq!(roman_to_int("XIV"), Some(14));
        assert_eq!(roman_to_int("XXXIX"), Some(39));
        assert_eq!(roman_to_int("M"), None);
        assert_eq!(roman_to_int(""), None);
    }

    #[test]
    fn test_instance_keys() {
        assert_eq!(NumberingPattern::NumericD1.instance_key("3. Foo"), Some(vec![3]));
        assert_eq!(
            NumberingPattern::NumericD2.instance_key("2.10. Cuvettes"),
            Some(vec![2, 10])
        );
        assert_eq!(NumberingPattern::Letters.instance_key("c) suite"), Some(vec![3]));
        assert_eq!(NumberingPattern::Caps.instance_key("B. Titre"), Some(vec![2]));
        assert_eq!(NumberingPattern::Roman.instance_key("IV. Titre"), Some(vec![4]));
        assert_eq!(
            NumberingPattern::NumericCircle.instance_key("12° alinéa"),
            Some(vec![12])
        );
    }

    #[test]
    fn test_instance_keys_out_of_catalog() {
        assert_eq!(NumberingPattern::NumericD2.instance_key("31.1. Foo"), None);
        assert_eq!(NumberingPattern::NumericD1.instance_key("0. Foo"), None);
        assert_eq!(NumberingPattern::NumericD3Dash.instance_key("1-1-11. Foo"), None);
        assert_eq!(NumberingPattern::Letters.instance_key("a)sans espace"), None);
        assert_eq!(NumberingPattern::Annexe.instance_key("ANNEXE 1"), None);
    }

    #[test]
    fn test_validation_flags() {
        assert!(NumberingPattern::NumericD1.requires_increasing_order());
        assert!(!NumberingPattern::NumericD2Space.requires_increasing_order());
        assert!(!NumberingPattern::Annexe.requires_increasing_order());
        assert!(NumberingPattern::Letters.requires_clause_ending());
        assert!(!NumberingPattern::Caps.requires_clause_ending());
    }
}
