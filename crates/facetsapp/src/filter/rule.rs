//! Filter rules and their wire format.
//!
//! On disk a rule is a flat object:
//!
//! ```json
//! { "id": "1736900000000", "field": "title", "operator": "contains",
//!   "value": "community", "fieldType": "text" }
//! ```
//!
//! In memory the operator and value are folded into a [`Condition`], whose
//! variants are exactly the operators registered for each field type. A rule
//! naming an operator its type does not support fails to decode.

use super::date::DateOp;
use super::multi::{MultiChoiceOp, ToggleOp};
use super::number::NumberOp;
use super::text::{ChoiceOp, TextOp};
use crate::error::{FacetsError, Result};
use crate::registry::FieldType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ids reserved for synthesized status and CMS-type rules.
pub const STATUS_AUTO_ID: &str = "status-auto";
pub const CMS_TYPE_AUTO_ID: &str = "cms-type-auto";

pub fn is_reserved_id(id: &str) -> bool {
    id == STATUS_AUTO_ID || id == CMS_TYPE_AUTO_ID
}

/// Operator and operand, typed by field type.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Text(TextOp),
    Number(NumberOp),
    Date(DateOp),
    Choice(ChoiceOp),
    MultiChoice(MultiChoiceOp),
    Toggle(ToggleOp),
}

impl Condition {
    /// Build a condition from its wire parts.
    pub fn from_wire(field_type: FieldType, operator: &str, value: &Value) -> Result<Self> {
        Ok(match field_type {
            FieldType::Text => Condition::Text(TextOp::from_wire(operator, value)?),
            FieldType::Number => Condition::Number(NumberOp::from_wire(operator, value)?),
            FieldType::Date => Condition::Date(DateOp::from_wire(operator, value)?),
            FieldType::Choice => Condition::Choice(ChoiceOp::from_wire(operator, value)?),
            FieldType::MultiChoice => {
                Condition::MultiChoice(MultiChoiceOp::from_wire(operator, value)?)
            }
            FieldType::Toggle => Condition::Toggle(ToggleOp::from_wire(operator)?),
        })
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Condition::Text(_) => FieldType::Text,
            Condition::Number(_) => FieldType::Number,
            Condition::Date(_) => FieldType::Date,
            Condition::Choice(_) => FieldType::Choice,
            Condition::MultiChoice(_) => FieldType::MultiChoice,
            Condition::Toggle(_) => FieldType::Toggle,
        }
    }

    pub fn operator(&self) -> &'static str {
        match self {
            Condition::Text(op) => op.code(),
            Condition::Number(op) => op.code(),
            Condition::Date(op) => op.code(),
            Condition::Choice(op) => op.code(),
            Condition::MultiChoice(op) => op.code(),
            Condition::Toggle(op) => op.code(),
        }
    }

    /// The operand in wire form. Valueless operators carry `""`.
    pub fn value(&self) -> Value {
        match self {
            Condition::Text(op) => op.wire_value(),
            Condition::Number(op) => op.wire_value(),
            Condition::Date(op) => op.wire_value(),
            Condition::Choice(op) => op.wire_value(),
            Condition::MultiChoice(op) => op.wire_value(),
            Condition::Toggle(_) => Value::String(String::new()),
        }
    }

    /// Stricter checks applied when a rule is authored.
    ///
    /// Decoding accepts any operand shape so old views keep loading; a rule
    /// being created now must carry parseable dates and numbers.
    pub fn check_values(&self) -> Result<()> {
        match self {
            Condition::Date(op) => op.check_values(),
            Condition::Number(op) => {
                let check = |v: &Value| {
                    if super::number::operand_number(v).is_nan() {
                        Err(FacetsError::invalid_value(
                            op.code(),
                            format!("{} is not a number", v),
                        ))
                    } else {
                        Ok(())
                    }
                };
                match op {
                    NumberOp::Is(v)
                    | NumberOp::IsNot(v)
                    | NumberOp::GreaterThan(v)
                    | NumberOp::LessThan(v)
                    | NumberOp::GreaterOrEqual(v)
                    | NumberOp::LessOrEqual(v) => check(v),
                    NumberOp::Between { from, to } => {
                        check(from)?;
                        check(to)
                    }
                    NumberOp::IsEmpty | NumberOp::IsNotEmpty => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }
}

/// A single filter rule: a field and a condition on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub struct FilterRule {
    pub id: String,
    pub field: String,
    pub condition: Condition,
}

impl FilterRule {
    pub fn new(id: impl Into<String>, field: impl Into<String>, condition: Condition) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            condition,
        }
    }

    /// A rule with a freshly generated id.
    pub fn generated(field: impl Into<String>, condition: Condition) -> Self {
        Self::new(uuid::Uuid::new_v4().simple().to_string(), field, condition)
    }

    pub fn field_type(&self) -> FieldType {
        self.condition.field_type()
    }

    pub fn operator(&self) -> &'static str {
        self.condition.operator()
    }

    pub fn value(&self) -> Value {
        self.condition.value()
    }

    pub fn is_reserved(&self) -> bool {
        is_reserved_id(&self.id)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRule {
    id: String,
    field: String,
    operator: String,
    #[serde(default)]
    value: Value,
    field_type: FieldType,
}

impl TryFrom<RawRule> for FilterRule {
    type Error = FacetsError;

    fn try_from(raw: RawRule) -> Result<Self> {
        let condition = Condition::from_wire(raw.field_type, &raw.operator, &raw.value)?;
        Ok(FilterRule::new(raw.id, raw.field, condition))
    }
}

impl From<FilterRule> for RawRule {
    fn from(rule: FilterRule) -> Self {
        RawRule {
            operator: rule.operator().to_string(),
            value: rule.value(),
            field_type: rule.field_type(),
            id: rule.id,
            field: rule.field,
        }
    }
}
