//! Multi-choice and toggle predicates.

use super::value::{illegal, wire_string};
use crate::error::Result;
use crate::model::FieldValue;
use crate::registry::FieldType;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiChoiceOp {
    /// Same number of values, and every rule value present.
    Is(Vec<String>),
    IsNot(Vec<String>),
    /// Any overlap.
    Contains(Vec<String>),
    DoesNotContain(Vec<String>),
    IsEmpty,
    IsNotEmpty,
    HasAnyValue,
    IsUnknown,
}

impl MultiChoiceOp {
    pub fn code(&self) -> &'static str {
        match self {
            MultiChoiceOp::Is(_) => "is",
            MultiChoiceOp::IsNot(_) => "is_not",
            MultiChoiceOp::Contains(_) => "contains",
            MultiChoiceOp::DoesNotContain(_) => "does_not_contain",
            MultiChoiceOp::IsEmpty => "is_empty",
            MultiChoiceOp::IsNotEmpty => "is_not_empty",
            MultiChoiceOp::HasAnyValue => "has_any_value",
            MultiChoiceOp::IsUnknown => "is_unknown",
        }
    }

    pub(crate) fn from_wire(operator: &str, value: &Value) -> Result<Self> {
        let list = || match value {
            Value::Array(items) => items.iter().map(wire_string).collect(),
            _ => Vec::new(),
        };
        Ok(match operator {
            "is" => MultiChoiceOp::Is(list()),
            "is_not" => MultiChoiceOp::IsNot(list()),
            "contains" => MultiChoiceOp::Contains(list()),
            "does_not_contain" => MultiChoiceOp::DoesNotContain(list()),
            "is_empty" => MultiChoiceOp::IsEmpty,
            "is_not_empty" => MultiChoiceOp::IsNotEmpty,
            "has_any_value" => MultiChoiceOp::HasAnyValue,
            "is_unknown" => MultiChoiceOp::IsUnknown,
            other => return Err(illegal(FieldType::MultiChoice, other)),
        })
    }

    pub(crate) fn wire_value(&self) -> Value {
        match self {
            MultiChoiceOp::Is(v)
            | MultiChoiceOp::IsNot(v)
            | MultiChoiceOp::Contains(v)
            | MultiChoiceOp::DoesNotContain(v) => {
                Value::Array(v.iter().cloned().map(Value::String).collect())
            }
            _ => Value::String(String::new()),
        }
    }
}

fn field_list(value: FieldValue<'_>) -> Vec<&str> {
    match value {
        FieldValue::List(items) => items.iter().map(String::as_str).collect(),
        FieldValue::Json(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn evaluate(value: FieldValue<'_>, op: &MultiChoiceOp) -> bool {
    let values = field_list(value);
    let has = |f: &String| values.contains(&f.as_str());
    let same = |filters: &[String]| values.len() == filters.len() && filters.iter().all(has);
    match op {
        MultiChoiceOp::Is(f) => same(f),
        MultiChoiceOp::IsNot(f) => !same(f),
        MultiChoiceOp::Contains(f) => f.iter().any(has),
        MultiChoiceOp::DoesNotContain(f) => !f.iter().any(has),
        MultiChoiceOp::IsEmpty | MultiChoiceOp::IsUnknown => values.is_empty(),
        MultiChoiceOp::IsNotEmpty | MultiChoiceOp::HasAnyValue => !values.is_empty(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOp {
    IsTrue,
    IsFalse,
}

impl ToggleOp {
    pub fn code(&self) -> &'static str {
        match self {
            ToggleOp::IsTrue => "is_true",
            ToggleOp::IsFalse => "is_false",
        }
    }

    pub(crate) fn from_wire(operator: &str) -> Result<Self> {
        match operator {
            "is_true" => Ok(ToggleOp::IsTrue),
            "is_false" => Ok(ToggleOp::IsFalse),
            other => Err(illegal(FieldType::Toggle, other)),
        }
    }
}

/// A flag that is missing or not a boolean matches neither operator.
pub(crate) fn evaluate_toggle(value: FieldValue<'_>, op: ToggleOp) -> bool {
    let flag = match value {
        FieldValue::Bool(b) => Some(b),
        FieldValue::Json(Value::Bool(b)) => Some(*b),
        _ => None,
    };
    match op {
        ToggleOp::IsTrue => flag == Some(true),
        ToggleOp::IsFalse => flag == Some(false),
    }
}
