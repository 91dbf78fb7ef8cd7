//! Text and choice predicates.
//!
//! Both compare a single string. Text is case-insensitive and supports
//! substring operators; choice is an exact, case-sensitive match against one
//! option plus the "unknown" check.

use super::value::{display_string, illegal, wire_string};
use crate::error::Result;
use crate::model::FieldValue;
use crate::registry::FieldType;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOp {
    Is(String),
    IsNot(String),
    Contains(String),
    DoesNotContain(String),
    StartsWith(String),
    EndsWith(String),
    IsEmpty,
    IsNotEmpty,
}

impl TextOp {
    pub fn code(&self) -> &'static str {
        match self {
            TextOp::Is(_) => "is",
            TextOp::IsNot(_) => "is_not",
            TextOp::Contains(_) => "contains",
            TextOp::DoesNotContain(_) => "does_not_contain",
            TextOp::StartsWith(_) => "starts_with",
            TextOp::EndsWith(_) => "ends_with",
            TextOp::IsEmpty => "is_empty",
            TextOp::IsNotEmpty => "is_not_empty",
        }
    }

    pub(crate) fn from_wire(operator: &str, value: &Value) -> Result<Self> {
        let text = || wire_string(value);
        Ok(match operator {
            "is" => TextOp::Is(text()),
            "is_not" => TextOp::IsNot(text()),
            "contains" => TextOp::Contains(text()),
            "does_not_contain" => TextOp::DoesNotContain(text()),
            "starts_with" => TextOp::StartsWith(text()),
            "ends_with" => TextOp::EndsWith(text()),
            "is_empty" => TextOp::IsEmpty,
            "is_not_empty" => TextOp::IsNotEmpty,
            other => return Err(illegal(FieldType::Text, other)),
        })
    }

    pub(crate) fn wire_value(&self) -> Value {
        match self {
            TextOp::Is(s)
            | TextOp::IsNot(s)
            | TextOp::Contains(s)
            | TextOp::DoesNotContain(s)
            | TextOp::StartsWith(s)
            | TextOp::EndsWith(s) => Value::String(s.clone()),
            TextOp::IsEmpty | TextOp::IsNotEmpty => Value::String(String::new()),
        }
    }
}

pub(crate) fn evaluate(value: FieldValue<'_>, op: &TextOp) -> bool {
    let value = display_string(value).to_lowercase();
    let lower = |s: &str| s.to_lowercase();
    match op {
        TextOp::Is(f) => value == lower(f),
        TextOp::IsNot(f) => value != lower(f),
        TextOp::Contains(f) => value.contains(&lower(f)),
        TextOp::DoesNotContain(f) => !value.contains(&lower(f)),
        TextOp::StartsWith(f) => value.starts_with(&lower(f)),
        TextOp::EndsWith(f) => value.ends_with(&lower(f)),
        TextOp::IsEmpty => value.trim().is_empty(),
        TextOp::IsNotEmpty => !value.trim().is_empty(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceOp {
    Is(String),
    IsNot(String),
    IsEmpty,
    IsNotEmpty,
    HasAnyValue,
    IsUnknown,
}

impl ChoiceOp {
    pub fn code(&self) -> &'static str {
        match self {
            ChoiceOp::Is(_) => "is",
            ChoiceOp::IsNot(_) => "is_not",
            ChoiceOp::IsEmpty => "is_empty",
            ChoiceOp::IsNotEmpty => "is_not_empty",
            ChoiceOp::HasAnyValue => "has_any_value",
            ChoiceOp::IsUnknown => "is_unknown",
        }
    }

    pub(crate) fn from_wire(operator: &str, value: &Value) -> Result<Self> {
        Ok(match operator {
            "is" => ChoiceOp::Is(wire_string(value)),
            "is_not" => ChoiceOp::IsNot(wire_string(value)),
            "is_empty" => ChoiceOp::IsEmpty,
            "is_not_empty" => ChoiceOp::IsNotEmpty,
            "has_any_value" => ChoiceOp::HasAnyValue,
            "is_unknown" => ChoiceOp::IsUnknown,
            other => return Err(illegal(FieldType::Choice, other)),
        })
    }

    pub(crate) fn wire_value(&self) -> Value {
        match self {
            ChoiceOp::Is(s) | ChoiceOp::IsNot(s) => Value::String(s.clone()),
            _ => Value::String(String::new()),
        }
    }
}

pub(crate) fn evaluate_choice(value: FieldValue<'_>, op: &ChoiceOp) -> bool {
    let value = display_string(value);
    match op {
        ChoiceOp::Is(f) => value == *f,
        ChoiceOp::IsNot(f) => value != *f,
        ChoiceOp::IsEmpty => value.trim().is_empty(),
        ChoiceOp::IsNotEmpty | ChoiceOp::HasAnyValue => !value.trim().is_empty(),
        ChoiceOp::IsUnknown => value.is_empty() || value == "unknown" || value == "undefined",
    }
}
