//! Monetary helpers shared by the ledger, the batch history and reports.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Flat deduction applied to every gross amount.
pub const TAX_RATE: f64 = 0.05;

/// Rounds to cents. Applied once, when a value is stored.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parses amounts typed by people (`"$400 USD"`, `" 1,250.50 "`).
///
/// Everything but digits, `.` and `-` is discarded; anything that still does
/// not parse to a finite number is zero.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Formats an amount the way exports and the history ledger store it.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// Accepts a JSON number, a numeric string or nothing; the rest reads as 0.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => parse_amount(&s),
        _ => 0.0,
    })
}

/// Identifier/count counterpart of [`lenient_amount`]: `3`, `"3"` and `3.0` are all 3.
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

pub fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_u64(deserializer).map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}
