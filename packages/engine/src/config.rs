//! Configuration constants for the versioning engine
//!
//! Limits guarding the consistency checker and the version enumerator
//! against pathological parametrizations, and the date formats used in
//! version names and French warnings.

/// Maximum nesting depth of a condition tree.
///
/// Authored conditions rarely nest more than two or three `AND`/`OR` levels.
pub const MAX_CONDITION_DEPTH: usize = 8;

/// Maximum number of conjunctive terms expanded by the satisfiability check.
///
/// Beyond this budget two conditions are reported as possibly satisfiable
/// together, which makes the consistency checker reject the pair.
pub const MAX_DNF_TERMS: usize = 256;

/// Maximum number of versions produced by the enumerator.
pub const MAX_VERSIONS: usize = 4_096;

/// Date format of version names (`date-d-installation < 2021-01-01`).
pub const DATE_LABEL_FORMAT: &str = "%Y-%m-%d";

/// Date format of user-facing warnings (`antérieure au 01/01/2021`).
pub const HUMAN_DATE_FORMAT: &str = "%d/%m/%Y";
