//! Arrêté Engine
//!
//! Parametric versioning of structured ministerial orders.
//! This library provides functionality for:
//! - Describing installation parameters and conditions on them
//! - Loading and validating parametrizations (non-applications, alternative sections)
//! - Applying a parametrization to a document for given parameter values
//! - Enumerating the materially distinct versions of a document
//!
//! # Example
//!
//! ```
//! use arrete_engine::{
//!     apply, Condition, EntityReference, NonApplicationCondition, ParameterValues,
//!     Parametrization, WellKnownParameter,
//! };
//! use arrete_shared::{EnrichedString, StructuredText};
//! use chrono::NaiveDate;
//!
//! let installation = WellKnownParameter::DateInstallation.parameter();
//! let cutoff = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
//! let parametrization = Parametrization::new(
//!     vec![NonApplicationCondition::new(
//!         EntityReference::section(vec![0]),
//!         Condition::littler(installation.clone(), cutoff, true),
//!     )],
//!     vec![],
//! )?;
//!
//! let article = StructuredText::new(EnrichedString::new("Article 1"), vec![], vec![]);
//! let document = StructuredText::new(EnrichedString::new("Arrêté"), vec![], vec![article]);
//!
//! let mut values = ParameterValues::new();
//! values.insert(installation, NaiveDate::from_ymd_opt(2020, 6, 1).unwrap().into());
//! let applied = apply(&document, &parametrization, &values);
//! assert!(!applied.sections[0].is_active());
//! # Ok::<(), arrete_engine::ParametrizationError>(())
//! ```

pub mod apply;
pub mod condition;
pub mod config;
pub mod consistency;
pub mod error;
pub mod parameter;
pub mod parametrization;
pub mod satisfiability;
pub mod versions;
pub mod warnings;

// Re-export commonly used items
pub use apply::apply;
pub use condition::Condition;
pub use error::{EngineError, ParametrizationError, Result};
pub use parameter::{
    parse_values, values_by_id, Parameter, ParameterType, ParameterValue, ParameterValues, Regime,
    WellKnownParameter,
};
pub use parametrization::{
    AlternativeSection, ConditionSource, EntityReference, NonApplicationCondition,
    Parametrization, SectionWarning,
};
pub use satisfiability::{could_be_simultaneously_satisfied, is_satisfiable};
pub use versions::{
    count_distinct, enumerate_versions, fingerprint, generate_versions, relevant_date_parameters,
    version_label,
    ParameterOption, VersionName, VersionOptions,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
