use serde_json::Value;

use super::{find_quote, table};

/// Plain-language rendering of a quote, with the currency sign in front of
/// every amount. Anything that is not a quote falls back to the table view.
pub fn print_text(value: &Value, currency_sign: &str) {
    match render_quote(value, currency_sign) {
        Some(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        None => table::print_table(value),
    }
}

fn render_quote(value: &Value, currency_sign: &str) -> Option<Vec<String>> {
    let quote = find_quote(value)?;
    let field = |key: &str| quote.get(key).map(super::scalar_text).unwrap_or_default();

    Some(vec![
        format!("Requested amount: {}{}", currency_sign, field("requested_amount")),
        format!("Rate: {}%", field("rate")),
        format!("Monthly repayment: {}{}", currency_sign, field("monthly_repayment")),
        format!("Total repayment: {}{}", currency_sign, field("total_repayment")),
    ])
}
