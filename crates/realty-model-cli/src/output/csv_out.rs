use serde_json::Value;
use std::io::{self, Write};

use super::{scalar_text, scenario_row, SUMMARY_COLUMNS};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV output error: {}", e);
    }
}

/// Scenario analyses become one row per scenario, projections one row per
/// year, sweeps one row per point; anything else is a field/value listing.
pub(crate) fn write_csv<W: Write>(out: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Object(map) => {
            if let Some(Value::Array(scenarios)) = map.get("scenarios") {
                let mut header = vec!["scenario"];
                header.extend(SUMMARY_COLUMNS);
                wtr.write_record(&header)?;
                for scenario in scenarios {
                    wtr.write_record(scenario_row(scenario, ""))?;
                }
            } else if let Some(Value::Array(years)) = map.get("years") {
                write_array_csv(&mut wtr, years)?;
            } else if let Some(Value::Array(points)) = map.get("points") {
                write_array_csv(&mut wtr, points)?;
            } else {
                wtr.write_record(["field", "value"])?;
                for (key, val) in map {
                    wtr.write_record([key.as_str(), &scalar_text(val, "")])?;
                }
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr)?,
        _ => wtr.write_record([&scalar_text(body, "")])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_array_csv<W: Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            wtr.write_record([&scalar_text(item, "")])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(|v| scalar_text(v, "")).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_scenarios_one_row_each() {
        let value = json!({
            "result": {
                "scenarios": [
                    {"variant": "conservative", "summary": {"irr_pct": "3", "break_even_year": null}},
                    {"variant": "optimistic", "summary": {"irr_pct": "9", "break_even_year": 4}}
                ]
            }
        });
        let out = render(&value);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("scenario,total_return_pct"));
        assert!(lines[1].starts_with("conservative,,,3,"));
        assert!(lines[2].contains(",4,"));
    }

    #[test]
    fn test_points_as_rows() {
        let value = json!({
            "result": {
                "driver": "rent",
                "points": [
                    {"driver_value": "1000", "irr_pct": "2"},
                    {"driver_value": "1500", "irr_pct": "5"}
                ]
            }
        });
        let out = render(&value);
        assert_eq!(out.lines().count(), 3);
        assert!(out.contains("1500,5"));
    }

    #[test]
    fn test_plain_object_field_value() {
        let out = render(&json!({"npv": "12.5", "periods": 3}));
        assert!(out.starts_with("field,value"));
        assert!(out.contains("npv,12.5"));
    }
}
