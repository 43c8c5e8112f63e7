//! Known false positives: prose lines that merely look numbered.
//!
//! These are enumerations inside a paragraph (lists of documents to provide,
//! lists of parameters to record) that would otherwise be promoted to
//! section titles. A line is an exception when its first
//! [`MAX_PREFIX_LEN`](crate::config::MAX_PREFIX_LEN) characters equal an entry.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::config::MAX_PREFIX_LEN;

const EXCEPTION_PREFIXES: &[&str] = &[
    "1. Une attestation de la maîtrise foncière sur l'emprise de ",
    "2. Un plan de l'exploitation à une échelle adaptée à la supe",
    "3. Une note succincte indiquant la nature de la substance ex",
    "4. Pour les carrières visées à la rubrique 2510-6, la justif",
    "5. Une description des modalités d'extraction et de remise e",
    "6. Les documents et registres prévus aux articles 3.5 et 4.7",
    "7. Les résultats des dernières mesures sur les effluents et ",
    "1. Le démantèlement des installations de production d'électr",
    "2. L'excavation de la totalité des fondations, jusqu'à la ba",
    "3. La remise en état qui consiste en le décaissement des air",
    "1. Les zones d'effets Z1 et Z2 définies par l'arrêté du 20 a",
    "2. La zone d'effets Z3 définie par l'arrêté du 20 avril 2007",
    "3. La zone d'effets Z4 définie par l'arrêté du 20 avril 2007",
    "1. Le flux horaire maximal en COV à l'exclusion du méthane, ",
    "2. Le flux horaire maximal en COV à l'exclusion du méthane, ",
    "1. Le contrôleur vérifie la présence des documents listés ai",
    "1. Il existe un mode d'élimination des bidons de désinfectan",
    "2. Le contrôleur s'assure que :",
    "1. Les surfaces effectivement épandues ;",
    "3. Les dates d'épandage ;",
    "4. La nature des cultures ;",
    "5. Les rendements des cultures ;",
    "7. Le mode d'épandage et le délai d'enfouissement ;",
    "1. Cas des turbines :",
    "1. Cas des turbines.",
    "2. Cas des moteurs.",
    "2. Cas des moteurs :",
    "3. Autres appareils de combustion :",
    "1. Lorsque la puissance est inférieure à 10 MW :",
    "2. Lorsque la puissance est supérieure ou égale à 10 MW :",
    "1. Réception :",
    "2. Expédition :",
    "4. La description des caractéristiques des sols ;",
    "a) Si leurs concentrations en éléments pathogènes sont supér",
    "b) Si les teneurs en éléments-traces métalliques dans les so",
    "b) Les déchets ci-après :",
    "i) Déchets végétaux agricoles et forestiers ;",
    "b) Comme agent de nettoyage pour dissoudre des salissures ;",
];

static EXCEPTIONS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| EXCEPTION_PREFIXES.iter().copied().collect());

/// The first `MAX_PREFIX_LEN` characters of `line`.
pub fn line_prefix(line: &str) -> &str {
    match line.char_indices().nth(MAX_PREFIX_LEN) {
        Some((byte_index, _)) => &line[..byte_index],
        None => line,
    }
}

/// Whether `line` starts with a known false-positive numbering.
pub fn is_exception(line: &str) -> bool {
    EXCEPTIONS.contains(line_prefix(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_fit_the_window() {
        for prefix in EXCEPTION_PREFIXES {
            assert!(
                prefix.chars().count() <= MAX_PREFIX_LEN,
                "prefix too long: {prefix}"
            );
        }
    }

    #[test]
    fn test_line_prefix_counts_characters() {
        let line = "é".repeat(80);
        assert_eq!(line_prefix(&line).chars().count(), MAX_PREFIX_LEN);
        assert_eq!(line_prefix("court"), "court");
    }

    #[test]
    fn test_short_exception_matches_whole_line() {
        assert!(is_exception("1. Réception :"));
        assert!(!is_exception("1. Réception : des déchets"));
    }

    #[test]
    fn test_long_exception_matches_prefix() {
        assert!(is_exception(
            "1. Le flux horaire maximal en COV à l'exclusion du méthane, lorsque les rejets dépassent"
        ));
    }

    #[test]
    fn test_regular_title_is_not_exception() {
        assert!(!is_exception("1. Dispositions générales"));
    }
}
