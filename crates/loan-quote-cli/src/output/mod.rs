pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;
pub mod text;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value, currency_sign: &str) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
        OutputFormat::Text => text::print_text(value, currency_sign),
    }
}

/// The quote object inside a command result, whether bare or wrapped in a
/// breakdown envelope.
pub(crate) fn find_quote(value: &Value) -> Option<&serde_json::Map<String, Value>> {
    let candidate = value
        .get("result")
        .and_then(|r| r.get("quote"))
        .unwrap_or(value);
    candidate
        .as_object()
        .filter(|m| m.contains_key("requested_amount") && m.contains_key("total_repayment"))
}

pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_quote_bare_and_wrapped() {
        let quote = json!({"requested_amount": 1000, "rate": "7.0", "monthly_repayment": "30.88", "total_repayment": "1111.65"});
        assert!(find_quote(&quote).is_some());

        let wrapped = json!({"result": {"quote": quote.clone(), "tranches": []}, "warnings": []});
        assert_eq!(find_quote(&wrapped).unwrap()["rate"], "7.0");

        assert!(find_quote(&json!({"lenders": []})).is_none());
    }
}
