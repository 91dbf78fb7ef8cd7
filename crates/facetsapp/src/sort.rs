//! # Sorting
//!
//! At most one sort is active at a time. Setting a sort replaces the previous
//! one; [`SortState`] enforces this by holding an `Option`.
//!
//! Only sortable registry fields can be sorted on. Values compare by field
//! type:
//!
//! | Type | Order |
//! |------|-------|
//! | text, choice, multi-choice | case-insensitive string |
//! | date | chronological; missing first, `"Not published"` as epoch |
//! | toggle | `false` before `true`, missing first |
//! | number | numeric total order, missing as `0` |
//!
//! Sorting is stable, so records with equal keys keep their input order.
//!
//! ## Wire Format
//!
//! Saved views store sorting as a list holding zero or one
//! `{"field": "title", "direction": "asc"}`. The older table encoding
//! `{"id": "title", "desc": false}` is still read.

use crate::error::{FacetsError, Result};
use crate::filter::{display_string, field_instant, field_number};
use crate::model::{FieldValue, Record};
use crate::registry::{FieldRegistry, FieldSpec, FieldType};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = FacetsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(FacetsError::invalid_value(
                "sort",
                format!("direction must be asc or desc, got '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortRule {
    pub field: String,
    pub direction: SortDirection,
}

impl SortRule {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

impl<'de> Deserialize<'de> for SortRule {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let helper = SortRuleHelper::deserialize(deserializer)?;

        // Current form wins; the table library's {id, desc} is the fallback.
        let field = helper
            .field
            .or(helper.id)
            .ok_or_else(|| serde::de::Error::missing_field("field"))?;
        let direction = match (helper.direction, helper.desc) {
            (Some(direction), _) => direction,
            (None, Some(true)) => SortDirection::Desc,
            (None, _) => SortDirection::Asc,
        };
        Ok(SortRule { field, direction })
    }
}

#[derive(Deserialize)]
struct SortRuleHelper {
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    direction: Option<SortDirection>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    desc: Option<bool>,
}

/// The single active sort, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState(Option<SortRule>);

impl SortState {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn by(rule: SortRule) -> Self {
        Self(Some(rule))
    }

    /// Replace the active sort.
    pub fn set(&mut self, rule: SortRule) {
        self.0 = Some(rule);
    }

    /// Change the direction of the active sort. No-op when nothing is sorted.
    pub fn set_direction(&mut self, direction: SortDirection) {
        if let Some(rule) = &mut self.0 {
            rule.direction = direction;
        }
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn rule(&self) -> Option<&SortRule> {
        self.0.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Option<SortRule>> for SortState {
    fn from(rule: Option<SortRule>) -> Self {
        Self(rule)
    }
}

impl Serialize for SortState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let list: Vec<&SortRule> = self.0.iter().collect();
        list.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SortState {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut list = Vec::<SortRule>::deserialize(deserializer)?;
        if list.len() > 1 {
            tracing::debug!(entries = list.len(), "keeping first of multiple sort entries");
        }
        list.truncate(1);
        Ok(Self(list.pop()))
    }
}

/// The registry entry for the sort field, if it exists and is sortable.
pub fn sortable_field<'g>(rule: &SortRule, registry: &'g FieldRegistry) -> Result<&'g FieldSpec> {
    let spec = registry
        .get(&rule.field)
        .ok_or_else(|| FacetsError::UnknownField(rule.field.clone()))?;
    if !spec.sortable {
        return Err(FacetsError::NotSortable(rule.field.clone()));
    }
    Ok(spec)
}

/// Build a comparator for `rule`.
///
/// Fails if the field is unknown or not sortable.
pub fn comparator<'r>(
    rule: &'r SortRule,
    registry: &FieldRegistry,
) -> Result<impl Fn(&Record, &Record) -> Ordering + 'r> {
    let field_type = sortable_field(rule, registry)?.field_type;
    let direction = rule.direction;
    Ok(move |a: &Record, b: &Record| {
        let ord = compare_values(
            field_type,
            a.field_value(&rule.field),
            b.field_value(&rule.field),
        );
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    })
}

fn compare_values(field_type: FieldType, a: FieldValue<'_>, b: FieldValue<'_>) -> Ordering {
    match field_type {
        FieldType::Date => field_instant(a).cmp(&field_instant(b)),
        FieldType::Number => field_number(a).total_cmp(&field_number(b)),
        FieldType::Toggle => toggle_key(a).cmp(&toggle_key(b)),
        FieldType::Text | FieldType::Choice | FieldType::MultiChoice => display_string(a)
            .to_lowercase()
            .cmp(&display_string(b).to_lowercase()),
    }
}

fn toggle_key(value: FieldValue<'_>) -> Option<bool> {
    match value {
        FieldValue::Bool(b) => Some(b),
        FieldValue::Json(serde_json::Value::Bool(b)) => Some(*b),
        _ => None,
    }
}

/// Stable-sort `records` in place by the active sort. No sort leaves the
/// order untouched.
pub fn apply_sort(records: &mut [&Record], state: &SortState, registry: &FieldRegistry) -> Result<()> {
    let Some(rule) = state.rule() else {
        return Ok(());
    };
    let cmp = comparator(rule, registry)?;
    records.sort_by(|a, b| cmp(*a, *b));
    tracing::debug!(field = %rule.field, direction = %rule.direction, count = records.len(), "sorted records");
    Ok(())
}

/// Parse `field[:asc|desc]`. Direction defaults to ascending.
pub fn parse_sort_expr(expr: &str, registry: &FieldRegistry) -> Result<SortRule> {
    let (field, direction) = match expr.split_once(':') {
        Some((field, dir)) => (field.trim(), dir.trim().parse()?),
        None => (expr.trim(), SortDirection::Asc),
    };
    let rule = SortRule::new(field, direction);
    sortable_field(&rule, registry)?;
    Ok(rule)
}
