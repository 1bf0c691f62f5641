use serde_json::Value;

use super::scalar_text;

/// Print just the key answer from the output.
///
/// Scenario analyses print one line per scenario; otherwise the first
/// non-null priority field wins, looking inside `summary` when present.
pub fn print_minimal(value: &Value) {
    for line in minimal_lines(value) {
        println!("{}", line);
    }
}

pub(crate) fn minimal_lines(value: &Value) -> Vec<String> {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(Value::Array(scenarios)) = result_obj.get("scenarios") {
        return scenarios
            .iter()
            .map(|s| {
                let field = |k: &str| {
                    s.get("summary")
                        .and_then(|m| m.get(k))
                        .map(|v| scalar_text(v, "null"))
                        .unwrap_or_default()
                };
                format!(
                    "{}: {} (irr {}%)",
                    s.get("variant").map(|v| scalar_text(v, "")).unwrap_or_default(),
                    field("recommendation"),
                    field("irr_pct")
                )
            })
            .collect();
    }

    let priority_keys = ["irr_pct", "irr", "npv", "recommendation"];
    let target = result_obj.get("summary").unwrap_or(result_obj);

    if let Value::Object(map) = target {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return vec![scalar_text(val, "null")];
                }
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return vec![format!("{}: {}", key, scalar_text(val, "null"))];
        }
    }

    vec![scalar_text(target, "null")]
}
