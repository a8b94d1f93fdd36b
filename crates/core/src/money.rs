//! Currency amounts.
//!
//! All money is carried as integer minor units (cents). Documents store
//! prices as currency-unit numbers or formatted strings; both are converted
//! here and nowhere else.

use serde_json::Value;

/// Convert a document value in currency units to cents.
///
/// Numbers are rounded half away from zero. Strings may carry a `$`,
/// thousands separators and surrounding whitespace. Anything else is `None`.
pub fn cents_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(cents_from_units),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

/// Currency units (e.g. dollars) to cents.
pub fn cents_from_units(units: f64) -> Option<i64> {
    if !units.is_finite() {
        return None;
    }
    let cents = (units * 100.0).round();
    if cents.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(cents as i64)
}

/// Parse a human-entered amount such as `"$1,250.50"` or `"-12"`.
pub fn parse_amount(input: &str) -> Option<i64> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().and_then(cents_from_units)
}

/// Render cents for display: `format_cents(123456, "USD") == "$1,234.56"`.
///
/// Currencies without a known symbol are suffixed with their code.
pub fn format_cents(cents: i64, currency: &str) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let whole = group_thousands(abs / 100);
    let frac = abs % 100;
    match currency_symbol(currency) {
        Some(sym) => format!("{sign}{sym}{whole}.{frac:02}"),
        None => format!("{sign}{whole}.{frac:02} {}", currency.to_uppercase()),
    }
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_ascii_uppercase().as_str() {
        "USD" | "CAD" | "AUD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    }
}

/// `1234567` to `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
