use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::scalar_text;

/// Format output as tables using the tabled crate.
///
/// Scalar fields go in a Field/Value table, nested objects are flattened with
/// dotted keys, and arrays of objects (lenders, tranches) get a table each.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object(map);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object(res_map),
        other => print_table(other),
    }

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

fn print_object(map: &Map<String, Value>) {
    let mut rows = Vec::new();
    let mut sections = Vec::new();
    flatten_into("", map, &mut rows, &mut sections);

    if !rows.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in rows {
            builder.push_record([key, val]);
        }
        println!("{}", Table::from(builder));
    }

    for (name, items) in sections {
        println!("\n{}:", name);
        print_array_table(items);
    }
}

fn flatten_into<'a>(
    prefix: &str,
    map: &'a Map<String, Value>,
    rows: &mut Vec<(String, String)>,
    sections: &mut Vec<(String, &'a [Value])>,
) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) => flatten_into(&name, inner, rows, sections),
            Value::Array(items) if items.iter().any(Value::is_object) => {
                sections.push((name, items.as_slice()));
            }
            _ => rows.push((name, format_value(val))),
        }
    }
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
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        other => scalar_text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_breakdown_flattened() {
        let result = json!({
            "quote": {"rate": "7.0", "total_repayment": "1111.65"},
            "tranches": [{"lender": "Jane", "amount": 480}],
            "exact_rate": "0.0700404486",
        });
        let mut rows = Vec::new();
        let mut sections = Vec::new();
        flatten_into("", result.as_object().unwrap(), &mut rows, &mut sections);

        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"quote.rate"));
        assert!(keys.contains(&"exact_rate"));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].0, "tranches");
    }
}
