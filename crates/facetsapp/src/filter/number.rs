//! Number predicates.
//!
//! The two sides of a comparison are coerced differently. A field value that
//! is missing or not numeric reads as `0`, so it takes part in comparisons.
//! A rule operand that does not parse is `NaN`, so no ordered comparison
//! matches and only `is_not` holds. Range bounds that are missing or falsy
//! read as `0`.

use super::value::{illegal, parse_float_prefix};
use crate::error::Result;
use crate::model::FieldValue;
use crate::registry::FieldType;
use serde_json::{json, Value};

/// Number operators. Operands keep their wire form so saved views
/// round-trip unchanged; they are coerced at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberOp {
    Is(Value),
    IsNot(Value),
    GreaterThan(Value),
    LessThan(Value),
    GreaterOrEqual(Value),
    LessOrEqual(Value),
    Between { from: Value, to: Value },
    IsEmpty,
    IsNotEmpty,
}

impl NumberOp {
    pub fn code(&self) -> &'static str {
        match self {
            NumberOp::Is(_) => "is",
            NumberOp::IsNot(_) => "is_not",
            NumberOp::GreaterThan(_) => "is_greater_than",
            NumberOp::LessThan(_) => "is_less_than",
            NumberOp::GreaterOrEqual(_) => "is_greater_than_or_equal",
            NumberOp::LessOrEqual(_) => "is_less_than_or_equal",
            NumberOp::Between { .. } => "is_between",
            NumberOp::IsEmpty => "is_empty",
            NumberOp::IsNotEmpty => "is_not_empty",
        }
    }

    pub(crate) fn from_wire(operator: &str, value: &Value) -> Result<Self> {
        let operand = || value.clone();
        Ok(match operator {
            "is" => NumberOp::Is(operand()),
            "is_not" => NumberOp::IsNot(operand()),
            "is_greater_than" => NumberOp::GreaterThan(operand()),
            "is_less_than" => NumberOp::LessThan(operand()),
            "is_greater_than_or_equal" => NumberOp::GreaterOrEqual(operand()),
            "is_less_than_or_equal" => NumberOp::LessOrEqual(operand()),
            "is_between" => NumberOp::Between {
                from: value.get("from").cloned().unwrap_or(Value::Null),
                to: value.get("to").cloned().unwrap_or(Value::Null),
            },
            "is_empty" => NumberOp::IsEmpty,
            "is_not_empty" => NumberOp::IsNotEmpty,
            other => return Err(illegal(FieldType::Number, other)),
        })
    }

    pub(crate) fn wire_value(&self) -> Value {
        match self {
            NumberOp::Is(v)
            | NumberOp::IsNot(v)
            | NumberOp::GreaterThan(v)
            | NumberOp::LessThan(v)
            | NumberOp::GreaterOrEqual(v)
            | NumberOp::LessOrEqual(v) => v.clone(),
            NumberOp::Between { from, to } => json!({ "from": from, "to": to }),
            NumberOp::IsEmpty | NumberOp::IsNotEmpty => Value::String(String::new()),
        }
    }
}

/// Field side: missing or non-numeric reads as zero.
pub(crate) fn field_number(value: FieldValue<'_>) -> f64 {
    let parsed = match value {
        FieldValue::Json(Value::Number(n)) => n.as_f64(),
        FieldValue::Json(Value::String(s)) => parse_float_prefix(s),
        FieldValue::Text(s) => parse_float_prefix(s),
        _ => None,
    };
    parsed.filter(|n| !n.is_nan()).unwrap_or(0.0)
}

/// Operand side: unparseable is NaN.
pub(crate) fn operand_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_float_prefix(s).unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Range bound: null, empty, `false` and `0` all read as zero.
fn bound_number(value: &Value) -> f64 {
    match value {
        Value::Null | Value::Bool(false) => 0.0,
        Value::String(s) if s.is_empty() => 0.0,
        other => operand_number(other),
    }
}

/// Falsy values other than `0` are empty: missing, null, `false` and `""`.
fn is_empty(value: FieldValue<'_>) -> bool {
    match value {
        FieldValue::Missing | FieldValue::Json(Value::Null) => true,
        FieldValue::Bool(b) | FieldValue::Json(&Value::Bool(b)) => !b,
        FieldValue::Text(s) => s.is_empty(),
        FieldValue::Json(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

pub(crate) fn evaluate(value: FieldValue<'_>, op: &NumberOp) -> bool {
    let n = field_number(value);
    match op {
        NumberOp::Is(f) => n == operand_number(f),
        NumberOp::IsNot(f) => n != operand_number(f),
        NumberOp::GreaterThan(f) => n > operand_number(f),
        NumberOp::LessThan(f) => n < operand_number(f),
        NumberOp::GreaterOrEqual(f) => n >= operand_number(f),
        NumberOp::LessOrEqual(f) => n <= operand_number(f),
        NumberOp::Between { from, to } => n >= bound_number(from) && n <= bound_number(to),
        NumberOp::IsEmpty => is_empty(value),
        NumberOp::IsNotEmpty => !is_empty(value),
    }
}
