//! Compact rule expressions for the command line.
//!
//! `field:operator[:value]`, for example:
//!
//! - `title:contains:community`
//! - `status:is:Pending review`
//! - `tags:contains:new,featured`
//! - `publishedAt:is_before:one_week_ago`
//! - `publishedAt:is_between:2025-01-01..2025-01-31`
//! - `metrics.views:is_between:10..100`
//! - `locked:is_true`
//!
//! The value is everything after the second colon, so it may contain colons.

use super::rule::{Condition, FilterRule};
use crate::error::{FacetsError, Result};
use crate::registry::{is_legal, needs_value, FieldRegistry, FieldType};
use serde_json::{json, Value};

pub fn parse_rule_expr(expr: &str, registry: &FieldRegistry) -> Result<FilterRule> {
    let mut parts = expr.splitn(3, ':');
    let field = parts.next().unwrap_or_default().trim();
    let operator = parts.next().map(str::trim).unwrap_or_default();
    let raw_value = parts.next();

    if operator.is_empty() {
        return Err(FacetsError::invalid_value(
            "",
            format!("expected field:operator[:value], got '{}'", expr),
        ));
    }

    let spec = registry
        .get(field)
        .ok_or_else(|| FacetsError::UnknownField(field.to_string()))?;
    if !is_legal(spec.field_type, operator) {
        return Err(FacetsError::IllegalOperator {
            field_type: spec.field_type,
            operator: operator.to_string(),
        });
    }

    let value = match raw_value {
        Some(v) => wire_value(spec.field_type, operator, v.trim()),
        None if needs_value(operator) => {
            return Err(FacetsError::invalid_value(operator, "a value is required"));
        }
        None => Value::String(String::new()),
    };

    let condition = Condition::from_wire(spec.field_type, operator, &value)?;
    condition.check_values()?;
    let rule = FilterRule::generated(field, condition);
    registry.validate(&rule)?;
    Ok(rule)
}

/// Translate the textual value into the wire shape the operator expects.
fn wire_value(field_type: FieldType, operator: &str, raw: &str) -> Value {
    match (field_type, operator) {
        (FieldType::MultiChoice, _) => Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect(),
        ),
        (FieldType::Number | FieldType::Date, "is_between") => {
            let (from, to) = raw.split_once("..").unwrap_or((raw, ""));
            json!({ "from": from.trim(), "to": to.trim() })
        }
        (FieldType::Date, "is_relative_to_today") => Value::String(raw.to_string()),
        (FieldType::Date, _) => {
            if raw.parse::<super::DatePreset>().is_ok() {
                json!({ "preset": raw })
            } else {
                json!({ "preset": "custom", "date": raw })
            }
        }
        _ => Value::String(raw.to_string()),
    }
}
