use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{scalar_text, scenario_row, SUMMARY_COLUMNS};

/// Year columns shown in the projection table.
const YEAR_COLUMNS: [&str; 10] = [
    "year",
    "property_value",
    "rental_income",
    "management_fees",
    "taxes",
    "depreciation_tax_savings",
    "net_income",
    "cumulative_cashflow",
    "roi",
    "cash_on_cash_return",
];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_envelope_notes(map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    let Value::Object(res) = result else {
        println!("{}", scalar_text(result, "null"));
        return;
    };

    if let Some(Value::Array(scenarios)) = res.get("scenarios") {
        print_scenario_comparison(scenarios);
        for scenario in scenarios {
            if let Some(Value::String(text)) =
                scenario.get("evaluation").and_then(|e| e.get("text"))
            {
                println!("  {}", text);
            }
        }
    } else if let Some(Value::Array(years)) = res.get("years") {
        print_year_table(years);
        if let Some(Value::Object(summary)) = res.get("summary") {
            println!();
            print_flat_object(summary);
        }
        if let Some(Value::String(text)) = res.get("evaluation").and_then(|e| e.get("text")) {
            println!("\n{}", text);
        }
    } else if let Some(Value::Array(points)) = res.get("points") {
        if let (Some(driver), Some(base)) = (res.get("driver"), res.get("base_value")) {
            println!(
                "Driver: {} (base {})",
                scalar_text(driver, ""),
                scalar_text(base, "")
            );
        }
        print_array_table(points);
    } else {
        print_flat_object(res);
    }
}

fn print_scenario_comparison(scenarios: &[Value]) {
    let mut builder = Builder::default();
    let mut header = vec!["scenario"];
    header.extend(SUMMARY_COLUMNS);
    builder.push_record(header);
    for scenario in scenarios {
        builder.push_record(scenario_row(scenario, "never"));
    }
    println!("{}", Table::from(builder));
}

fn print_year_table(years: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(YEAR_COLUMNS);
    for year in years {
        let row: Vec<String> = YEAR_COLUMNS
            .iter()
            .map(|c| year.get(*c).map(|v| scalar_text(v, "")).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &scalar_text(val, "null")]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| scalar_text(v, "null"))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", scalar_text(item, "null"));
        }
    }
}
