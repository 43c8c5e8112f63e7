//! World struct for Cucumber BDD tests
//!
//! Contains the test state that persists across steps in a scenario.

use std::collections::BTreeMap;
use std::fmt;

use arrete_engine::{
    apply, parse_values, EngineError, ParameterValues, Parametrization, VersionName,
};
use arrete_shared::{EnrichedString, StructuredText};
use cucumber::World;

/// Test world that holds state across steps in a Cucumber scenario.
#[derive(World)]
#[world(init = Self::new)]
pub struct ArreteWorld {
    /// Document the parametrization is applied to
    pub document: StructuredText,
    /// Loaded parametrization (if loading succeeded)
    pub parametrization: Option<Parametrization>,
    /// Last loading error (if the parametrization was rejected)
    pub error: Option<EngineError>,
    /// Raw parameter values keyed by parameter id
    pub values: BTreeMap<String, serde_json::Value>,
    /// Last applied document
    pub result: Option<StructuredText>,
    /// Enumerated versions
    pub versions: BTreeMap<VersionName, ParameterValues>,
    /// Generated documents per version
    pub generated: BTreeMap<VersionName, StructuredText>,
}

impl fmt::Debug for ArreteWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArreteWorld")
            .field("document", &self.document.title.text)
            .field("parametrization", &self.parametrization.is_some())
            .field("error", &self.error.as_ref().map(|e| e.to_string()))
            .field("values", &self.values)
            .field("versions", &self.versions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ArreteWorld {
    fn default() -> Self {
        Self::new()
    }
}

fn node(title: &str, alineas: &[&str], sections: Vec<StructuredText>) -> StructuredText {
    StructuredText::new(
        EnrichedString::new(title),
        alineas.iter().map(|a| EnrichedString::new(*a)).collect(),
        sections,
    )
}

impl ArreteWorld {
    /// Create a world holding a small two-article order.
    pub fn new() -> Self {
        let document = node(
            "Arrêté du 27 décembre 2013",
            &["Vu le code de l'environnement ;"],
            vec![
                node(
                    "Article 1",
                    &[
                        "Le présent arrêté s'applique aux installations classées.",
                        "Les dispositions de l'annexe ne s'appliquent pas aux installations existantes.",
                    ],
                    vec![node("1.1. Définitions", &["Au sens du présent arrêté..."], vec![])],
                ),
                node(
                    "Article 2",
                    &[],
                    vec![node("2.1. Prescriptions", &["Texte d'origine"], vec![])],
                ),
            ],
        );
        Self {
            document,
            parametrization: None,
            error: None,
            values: BTreeMap::new(),
            result: None,
            versions: BTreeMap::new(),
            generated: BTreeMap::new(),
        }
    }

    pub fn parametrization(&self) -> &Parametrization {
        self.parametrization.as_ref().unwrap_or_else(|| {
            panic!(
                "No parametrization loaded, error: {:?}",
                self.error.as_ref().map(|e| e.to_string())
            )
        })
    }

    /// Apply the loaded parametrization to `document` with the current values.
    pub fn apply_to(&self, document: &StructuredText) -> StructuredText {
        let parametrization = self.parametrization();
        let values = parse_values(&parametrization.extract_parameters(), &self.values)
            .expect("Invalid parameter values");
        apply(document, parametrization, &values)
    }

    pub fn result(&self) -> &StructuredText {
        self.result.as_ref().expect("No parametrization applied yet")
    }

    /// Section of the applied document at `path`.
    pub fn section(&self, path: &[usize]) -> &StructuredText {
        self.result()
            .section_at(path)
            .unwrap_or_else(|| panic!("No section at path {path:?}"))
    }
}
