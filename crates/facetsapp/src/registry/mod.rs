//! # Field & Operator Registry
//!
//! The registry is the single source of truth for what can be filtered and
//! sorted. It answers three questions:
//!
//! - **Which fields exist?** [`FieldRegistry`] maps a field key (`"title"`,
//!   `"publishedAt"`, ...) to its [`FieldSpec`]: label, [`FieldType`], the
//!   choice options offered to the user, and whether it is sortable.
//! - **Which operators are legal?** [`operators_for`] returns the ordered
//!   operator list for a [`FieldType`], each with a human label.
//! - **Does a rule make sense?** [`FieldRegistry::validate`] rejects rules that
//!   target an unknown field or disagree with the field's type.
//!
//! ## Field Types
//!
//! | Type | Example field | Value shape |
//! |------|---------------|-------------|
//! | `text` | `title` | free text, compared case-insensitively |
//! | `date` | `publishedAt` | date literal, preset, or range |
//! | `choice` | `status` | one of a closed set of strings |
//! | `multi-choice` | `tags` | a set of strings |
//! | `toggle` | `locked` | boolean |
//! | `number` | custom fields | numeric literal or range |
//!
//! Built-in fields cover the content table. Additional fields can be
//! registered from configuration (see [`crate::config::CustomField`]); they are
//! resolved against a record's extra keys by dotted path.

mod fields;
mod operators;

pub use fields::{FieldRegistry, FieldSpec};
pub use operators::{
    is_legal, needs_value, operator_label, operators_for, OperatorSpec, CHOICE_OPERATORS,
    DATE_OPERATORS, DATE_PRESETS, MULTI_CHOICE_OPERATORS, NUMBER_OPERATORS, RELATIVE_CONDITIONS,
    TEXT_OPERATORS, TOGGLE_OPERATORS,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The data type of a filterable field.
///
/// Determines which operators are legal and how values are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Date,
    Choice,
    MultiChoice,
    Toggle,
    Number,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        FieldType::Text,
        FieldType::Date,
        FieldType::Choice,
        FieldType::MultiChoice,
        FieldType::Toggle,
        FieldType::Number,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::Choice => "choice",
            FieldType::MultiChoice => "multi-choice",
            FieldType::Toggle => "toggle",
            FieldType::Number => "number",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|ft| ft.as_str() == s)
            .ok_or_else(|| format!("unknown field type '{}'", s))
    }
}
