use serde_json::Value;

/// Headline fields, in order of preference. Stress results lead with the
/// severity verdict, impact results with the cost estimate.
const PRIORITY_KEYS: [&str; 6] = [
    "severity",
    "lcr_ratio",
    "tier1_ratio",
    "estimated_annual_cost",
    "worst_case_scenario",
    "scenario_count",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields (descending into a batch `summary`),
/// then falls back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);
    let headline = result_obj
        .as_object()
        .and_then(|m| m.get("summary"))
        .unwrap_or(result_obj);

    if let Value::Object(map) = headline {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(headline));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "undefined".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
