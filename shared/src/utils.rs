// Display helpers shared by the report renderer and anything else that prints
// money or ratios.

/// Formats a value as dollars with two decimals, e.g. `$1234.50` or `-$3.20`.
pub fn format_currency(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${:.2}", value)
    }
}

/// Formats a ratio as a percentage with two decimals: `0.0213` -> `2.13%`.
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Two-decimal number without a unit.
pub fn format_decimal(value: f64) -> String {
    format!("{:.2}", value)
}
