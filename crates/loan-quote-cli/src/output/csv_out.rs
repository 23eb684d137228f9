use serde_json::{Map, Value};
use std::io;

use super::scalar_text;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

/// Rows go out in the most useful shape for the value: a lender or tranche
/// list becomes one row per entry, a quote becomes field/value pairs.
fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    match value {
        Value::Object(map) => {
            let body = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            if let Some(items) = first_object_list(body) {
                write_array_csv(wtr, items);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                write_fields(wtr, "", body);
            }
        }
        Value::Array(arr) => write_array_csv(wtr, arr),
        _ => {
            let _ = wtr.write_record([&scalar_text(value)]);
        }
    }
}

fn first_object_list(map: &Map<String, Value>) -> Option<&[Value]> {
    ["lenders", "tranches"].iter().find_map(|key| match map.get(*key) {
        Some(Value::Array(items)) if !items.is_empty() => Some(items.as_slice()),
        _ => None,
    })
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, prefix: &str, map: &Map<String, Value>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) => write_fields(wtr, &name, inner),
            _ => {
                let _ = wtr.write_record([name.as_str(), &scalar_text(val)]);
            }
        }
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(scalar_text).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&scalar_text(item)]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv(&mut wtr, value);
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_quote_as_field_value_pairs() {
        let out = render(&json!({"rate": "7.0", "requested_amount": 1000}));
        assert_eq!(out, "field,value\nrate,7.0\nrequested_amount,1000\n");
    }

    #[test]
    fn test_catalog_as_rows() {
        let out = render(&json!({
            "lenders": [
                {"capacity": 480, "name": "Jane", "rate": "0.069"},
                {"capacity": 520, "name": "Fred", "rate": "0.071"},
            ],
            "total_capacity": 1000,
        }));
        assert_eq!(out, "capacity,name,rate\n480,Jane,0.069\n520,Fred,0.071\n");
    }
}
