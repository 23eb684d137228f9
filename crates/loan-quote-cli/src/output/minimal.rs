use serde_json::Value;

use super::{find_quote, scalar_text};

/// Print just the key answer value from the output.
///
/// For a quote that is the total repayment; for a catalog, its capacity.
/// Anything else falls back to the first field.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_text(value));
}

fn minimal_text(value: &Value) -> String {
    if let Some(quote) = find_quote(value) {
        if let Some(total) = quote.get("total_repayment") {
            return scalar_text(total);
        }
    }

    if let Value::Object(map) = value {
        if let Some(capacity) = map.get("total_capacity") {
            return scalar_text(capacity);
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, scalar_text(val));
        }
    }

    scalar_text(value)
}
