//! Coercions shared by the predicates.

use crate::error::FacetsError;
use crate::model::FieldValue;
use crate::registry::FieldType;
use serde_json::Value;

/// The string form of a field value as the text and choice predicates see it.
pub(crate) fn display_string(value: FieldValue<'_>) -> String {
    match value {
        FieldValue::Missing => String::new(),
        FieldValue::Text(s) => s.to_string(),
        FieldValue::Date(d) => d.to_string(),
        FieldValue::List(items) => items.join(","),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Json(Value::String(s)) => s.clone(),
        FieldValue::Json(v) => v.to_string(),
    }
}

/// Rule value as a string. Non-string scalars are stringified, null is empty.
pub(crate) fn wire_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse the longest numeric prefix of `s`, after leading whitespace.
///
/// `"12px"` is 12, `"  -3.5e2x"` is -350, `"abc"` and `""` are `None`.
pub(crate) fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        let sign = if bytes.first() == Some(&b'-') { -1.0 } else { 1.0 };
        return Some(sign * f64::INFINITY);
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}

pub(crate) fn illegal(field_type: FieldType, operator: &str) -> FacetsError {
    FacetsError::IllegalOperator {
        field_type,
        operator: operator.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn float_prefix() {
        assert_eq!(parse_float_prefix("42"), Some(42.0));
        assert_eq!(parse_float_prefix("  12px"), Some(12.0));
        assert_eq!(parse_float_prefix("-3.5e2x"), Some(-350.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("-"), None);
    }

    #[test]
    fn wire_strings() {
        assert_eq!(wire_string(&json!("x")), "x");
        assert_eq!(wire_string(&json!(3)), "3");
        assert_eq!(wire_string(&Value::Null), "");
    }

    #[test]
    fn display_strings() {
        let tags = vec!["a".to_string(), "b".to_string()];
        assert_eq!(display_string(FieldValue::List(&tags)), "a,b");
        assert_eq!(display_string(FieldValue::Json(&json!("s"))), "s");
        assert_eq!(display_string(FieldValue::Missing), "");
    }
}
