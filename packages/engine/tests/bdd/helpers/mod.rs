//! Conversion helpers for Gherkin tables and arguments.

use std::collections::BTreeMap;

use arrete_shared::SectionPath;

/// Convert a Gherkin table cell to the JSON value a caller would send.
///
/// `true`/`false` become booleans, integers become numbers (timestamps),
/// everything else stays a string (dates as `YYYY-MM-DD`, regime codes).
pub fn convert_gherkin_value(val: &str) -> serde_json::Value {
    let trimmed = val.trim();
    match trimmed {
        "true" => serde_json::Value::Bool(true),
        "false" => serde_json::Value::Bool(false),
        _ => trimmed
            .parse::<i64>()
            .map(serde_json::Value::from)
            .unwrap_or_else(|_| serde_json::Value::String(trimmed.to_string())),
    }
}

/// Parse a two-column `| parameter | value |` table.
pub fn parse_table_to_values(
    table: &cucumber::gherkin::Table,
) -> BTreeMap<String, serde_json::Value> {
    table
        .rows
        .iter()
        .filter(|row| row.len() >= 2 && row[0].trim() != "parameter")
        .map(|row| (row[0].trim().to_string(), convert_gherkin_value(&row[1])))
        .collect()
}

/// Parse a dotted section path: `1.0` is `[1, 0]`, the empty string the root.
pub fn parse_path(raw: &str) -> SectionPath {
    raw.split('.')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.trim()
                .parse()
                .unwrap_or_else(|_| panic!("Invalid section path '{raw}'"))
        })
        .collect()
}
