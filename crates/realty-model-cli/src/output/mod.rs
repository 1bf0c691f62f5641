pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Summary fields shown per scenario in tabular output.
pub(crate) const SUMMARY_COLUMNS: [&str; 8] = [
    "total_return_pct",
    "avg_annual_return_pct",
    "irr_pct",
    "npv",
    "total_net_income",
    "final_property_value",
    "break_even_year",
    "recommendation",
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Scalar rendering shared by the text formatters; `null` becomes `null_repr`.
pub(crate) fn scalar_text(value: &Value, null_repr: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => null_repr.to_string(),
        Value::Array(arr) => arr
            .iter()
            .map(|v| scalar_text(v, null_repr))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// One row per scenario: the variant name followed by `SUMMARY_COLUMNS`.
pub(crate) fn scenario_row(scenario: &Value, null_repr: &str) -> Vec<String> {
    let mut row = vec![scenario
        .get("variant")
        .map(|v| scalar_text(v, null_repr))
        .unwrap_or_default()];
    let summary = scenario.get("summary");
    for col in SUMMARY_COLUMNS {
        row.push(
            summary
                .and_then(|s| s.get(col))
                .map(|v| scalar_text(v, null_repr))
                .unwrap_or_default(),
        );
    }
    row
}
