//! Formatting utilities — USD figures, token amounts, rates, timestamps.

use rust_decimal::Decimal;

/// Format a USD figure with thousands separators and two decimals:
/// `1234567.891` → `"1,234,567.89"`.
pub fn format_usd(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative();
    let abs = rounded.abs();

    let s = format!("{abs:.2}");
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Format a token amount: up to four decimal places, trailing zeros
/// trimmed, but never rendered as bare `""`.
pub fn format_amount(value: Decimal) -> String {
    let s = value.round_dp(4).normalize().to_string();
    if s.is_empty() {
        "0".to_string()
    } else {
        s
    }
}

/// Render a borrow rate as a percentage string.
///
/// Rates ≤ 1.5 are treated as fractions (×100); larger values are assumed
/// to already be percentages. A genuine 150% fraction misclassifies —
/// known limitation, carried over deliberately.
pub fn format_rate_pct(rate: f64) -> String {
    let pct = if rate <= 1.5 { rate * 100.0 } else { rate };
    format!("{pct:.2}%")
}

/// Format a millisecond timestamp as a human-readable UTC string.
pub fn format_timestamp_ms(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}
