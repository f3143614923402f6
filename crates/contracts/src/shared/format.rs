//! Number coercion and money formatting shared by every screen.
//!
//! The backend serialises decimals either as JSON numbers or as strings, so
//! amount fields go through the lenient deserializers below.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce any JSON scalar into a finite number, 0.0 otherwise
pub fn safe_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Parse user input as a number. Accepts a decimal comma.
pub fn parse_amount(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// "1234.5" -> "1234.50 €"
pub fn format_eur(value: f64) -> String {
    let v = if value.is_finite() { value } else { 0.0 };
    format!("{:.2} €", v)
}

/// Signed percentage with one decimal, "—" when missing
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:+.1}%", v),
        _ => "—".to_string(),
    }
}

pub fn deserialize_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(safe_number(&value))
}

pub fn deserialize_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        other => Some(safe_number(&other)),
    })
}

/// Accept strings, numbers or null for free-text fields
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_safe_number() {
        assert_eq!(safe_number(&json!(12.5)), 12.5);
        assert_eq!(safe_number(&json!("7.25")), 7.25);
        assert_eq!(safe_number(&json!("abc")), 0.0);
        assert_eq!(safe_number(&json!(null)), 0.0);
    }

    #[test]
    fn test_format_eur() {
        assert_eq!(format_eur(1234.5), "1234.50 €");
        assert_eq!(format_eur(-3.0), "-3.00 €");
        assert_eq!(format_eur(f64::NAN), "0.00 €");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12,5"), Some(12.5));
        assert_eq!(parse_amount(" 40 "), Some(40.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("x"), None);
    }

    #[test]
    fn test_round2_and_pct() {
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(1500.0 * 0.3), 450.0);
        assert_eq!(format_pct(Some(12.345)), "+12.3%");
        assert_eq!(format_pct(None), "—");
    }

    #[test]
    fn test_lenient_fields() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(deserialize_with = "deserialize_f64")]
            total: f64,
            #[serde(default, deserialize_with = "deserialize_opt_f64")]
            fianza: Option<f64>,
        }
        let row: Row = serde_json::from_value(json!({"total": "99.90", "fianza": null})).unwrap();
        assert_eq!(row.total, 99.9);
        assert_eq!(row.fianza, None);

        #[derive(Deserialize)]
        struct Address {
            #[serde(deserialize_with = "deserialize_text")]
            numero: String,
        }
        let a: Address = serde_json::from_value(json!({"numero": 12})).unwrap();
        assert_eq!(a.numero, "12");
    }
}
