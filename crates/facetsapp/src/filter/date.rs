//! Date predicates.
//!
//! Record dates are wall-clock values with no timezone. Presets and relative
//! conditions resolve against the [`EvalContext`]'s day, at midnight.
//!
//! `is` / `is_not` compare calendar days. The ordered operators compare the
//! full instant, so a record at 10:00 today is *after* the `today` preset.
//! `is_between` is inclusive on both ends by calendar day.

use super::value::{illegal, wire_string};
use super::EvalContext;
use crate::error::{FacetsError, Result};
use crate::model::{parse_date_literal, FieldValue, RecordDate};
use crate::registry::FieldType;
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{json, Value};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// A named date resolved relative to the evaluation day.
///
/// The range-sounding presets (`last_7_days`, `last_month`, ...) resolve to a
/// single day like the others: seven days ago, the first of last month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    Today,
    Tomorrow,
    Yesterday,
    OneWeekAgo,
    OneWeekFromNow,
    OneMonthAgo,
    OneMonthFromNow,
    Last7Days,
    Next7Days,
    LastMonth,
    NextMonth,
    ThisYear,
    LastYear,
    NextYear,
}

impl DatePreset {
    pub const ALL: [DatePreset; 14] = [
        DatePreset::Today,
        DatePreset::Tomorrow,
        DatePreset::Yesterday,
        DatePreset::OneWeekAgo,
        DatePreset::OneWeekFromNow,
        DatePreset::OneMonthAgo,
        DatePreset::OneMonthFromNow,
        DatePreset::Last7Days,
        DatePreset::Next7Days,
        DatePreset::LastMonth,
        DatePreset::NextMonth,
        DatePreset::ThisYear,
        DatePreset::LastYear,
        DatePreset::NextYear,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DatePreset::Today => "today",
            DatePreset::Tomorrow => "tomorrow",
            DatePreset::Yesterday => "yesterday",
            DatePreset::OneWeekAgo => "one_week_ago",
            DatePreset::OneWeekFromNow => "one_week_from_now",
            DatePreset::OneMonthAgo => "one_month_ago",
            DatePreset::OneMonthFromNow => "one_month_from_now",
            DatePreset::Last7Days => "last_7_days",
            DatePreset::Next7Days => "next_7_days",
            DatePreset::LastMonth => "last_month",
            DatePreset::NextMonth => "next_month",
            DatePreset::ThisYear => "this_year",
            DatePreset::LastYear => "last_year",
            DatePreset::NextYear => "next_year",
        }
    }

    /// The day this preset names, given today.
    pub fn resolve(&self, today: NaiveDate) -> Option<NaiveDate> {
        let first_of_month = today.with_day(1)?;
        match self {
            DatePreset::Today => Some(today),
            DatePreset::Tomorrow => today.checked_add_days(Days::new(1)),
            DatePreset::Yesterday => today.checked_sub_days(Days::new(1)),
            DatePreset::OneWeekAgo | DatePreset::Last7Days => today.checked_sub_days(Days::new(7)),
            DatePreset::OneWeekFromNow | DatePreset::Next7Days => {
                today.checked_add_days(Days::new(7))
            }
            DatePreset::OneMonthAgo => today.checked_sub_months(Months::new(1)),
            DatePreset::OneMonthFromNow => today.checked_add_months(Months::new(1)),
            DatePreset::LastMonth => first_of_month.checked_sub_months(Months::new(1)),
            DatePreset::NextMonth => first_of_month.checked_add_months(Months::new(1)),
            DatePreset::ThisYear => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            DatePreset::LastYear => NaiveDate::from_ymd_opt(today.year() - 1, 1, 1),
            DatePreset::NextYear => NaiveDate::from_ymd_opt(today.year() + 1, 1, 1),
        }
    }
}

impl fmt::Display for DatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DatePreset {
    type Err = FacetsError;

    fn from_str(s: &str) -> Result<Self> {
        DatePreset::ALL
            .into_iter()
            .find(|p| p.code() == s)
            .ok_or_else(|| FacetsError::invalid_value("date", format!("unknown date preset '{}'", s)))
    }
}

/// What a single-date operator compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTarget {
    Preset(DatePreset),
    /// A literal date as the user typed it; parsed at evaluation time.
    Custom(String),
}

impl DateTarget {
    fn from_wire(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => match map.get("preset").and_then(Value::as_str) {
                Some(code) if code != "custom" => Ok(DateTarget::Preset(code.parse()?)),
                _ => Ok(DateTarget::Custom(
                    map.get("date").map(wire_string).unwrap_or_default(),
                )),
            },
            other => Ok(DateTarget::Custom(wire_string(other))),
        }
    }

    fn wire_value(&self) -> Value {
        match self {
            DateTarget::Preset(p) => json!({ "preset": p.code() }),
            DateTarget::Custom(date) => json!({ "preset": "custom", "date": date }),
        }
    }

    /// Resolve to an instant. Presets land on midnight; an unparseable
    /// custom date has none.
    fn instant(&self, ctx: &EvalContext) -> Option<NaiveDateTime> {
        match self {
            DateTarget::Preset(p) => p.resolve(ctx.today).map(|d| d.and_time(NaiveTime::MIN)),
            DateTarget::Custom(s) => parse_date_literal(s),
        }
    }

    /// Resolve to a calendar day. An empty custom date means today.
    fn day(&self, ctx: &EvalContext) -> Option<NaiveDate> {
        match self {
            DateTarget::Custom(s) if s.trim().is_empty() => Some(ctx.today),
            other => other.instant(ctx).map(|dt| dt.date()),
        }
    }
}

impl fmt::Display for DateTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateTarget::Preset(p) => write!(f, "{}", p),
            DateTarget::Custom(s) => f.write_str(s),
        }
    }
}

/// Conditions for `is_relative_to_today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeCondition {
    TodayAndEarlier,
    Overdue,
    LaterThanToday,
    LastQuarter,
    NextQuarter,
}

impl RelativeCondition {
    pub const ALL: [RelativeCondition; 5] = [
        RelativeCondition::TodayAndEarlier,
        RelativeCondition::Overdue,
        RelativeCondition::LaterThanToday,
        RelativeCondition::LastQuarter,
        RelativeCondition::NextQuarter,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            RelativeCondition::TodayAndEarlier => "today_and_earlier",
            RelativeCondition::Overdue => "overdue",
            RelativeCondition::LaterThanToday => "later_than_today",
            RelativeCondition::LastQuarter => "last_quarter",
            RelativeCondition::NextQuarter => "next_quarter",
        }
    }

    fn holds(&self, day: NaiveDate, today: NaiveDate) -> bool {
        match self {
            RelativeCondition::TodayAndEarlier => day <= today,
            RelativeCondition::Overdue => day < today,
            RelativeCondition::LaterThanToday => day > today,
            RelativeCondition::LastQuarter => {
                let start = quarter_start(today);
                let from = start.and_then(|s| s.checked_sub_months(Months::new(3)));
                matches!((from, start), (Some(from), Some(to)) if day >= from && day < to)
            }
            RelativeCondition::NextQuarter => {
                let start = quarter_start(today);
                let from = start.and_then(|s| s.checked_add_months(Months::new(3)));
                let to = start.and_then(|s| s.checked_add_months(Months::new(6)));
                matches!((from, to), (Some(from), Some(to)) if day >= from && day < to)
            }
        }
    }
}

impl FromStr for RelativeCondition {
    type Err = FacetsError;

    fn from_str(s: &str) -> Result<Self> {
        RelativeCondition::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| {
                FacetsError::invalid_value(
                    "is_relative_to_today",
                    format!("unknown relative condition '{}'", s),
                )
            })
    }
}

/// First day of the quarter containing `day`.
fn quarter_start(day: NaiveDate) -> Option<NaiveDate> {
    let month = (day.month0() / 3) * 3 + 1;
    NaiveDate::from_ymd_opt(day.year(), month, 1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateOp {
    Is(DateTarget),
    IsNot(DateTarget),
    IsBefore(DateTarget),
    IsAfter(DateTarget),
    IsOnOrBefore(DateTarget),
    IsOnOrAfter(DateTarget),
    /// Bounds are date literals, parsed at evaluation time.
    IsBetween { from: String, to: String },
    IsRelativeToToday(RelativeCondition),
    IsEmpty,
    IsNotEmpty,
    IsSet,
    IsNotSet,
}

impl DateOp {
    pub fn code(&self) -> &'static str {
        match self {
            DateOp::Is(_) => "is",
            DateOp::IsNot(_) => "is_not",
            DateOp::IsBefore(_) => "is_before",
            DateOp::IsAfter(_) => "is_after",
            DateOp::IsOnOrBefore(_) => "is_on_or_before",
            DateOp::IsOnOrAfter(_) => "is_on_or_after",
            DateOp::IsBetween { .. } => "is_between",
            DateOp::IsRelativeToToday(_) => "is_relative_to_today",
            DateOp::IsEmpty => "is_empty",
            DateOp::IsNotEmpty => "is_not_empty",
            DateOp::IsSet => "is_set",
            DateOp::IsNotSet => "is_not_set",
        }
    }

    pub(crate) fn from_wire(operator: &str, value: &Value) -> Result<Self> {
        let target = || DateTarget::from_wire(value);
        Ok(match operator {
            "is" => DateOp::Is(target()?),
            "is_not" => DateOp::IsNot(target()?),
            "is_before" => DateOp::IsBefore(target()?),
            "is_after" => DateOp::IsAfter(target()?),
            "is_on_or_before" => DateOp::IsOnOrBefore(target()?),
            "is_on_or_after" => DateOp::IsOnOrAfter(target()?),
            "is_between" => DateOp::IsBetween {
                from: value.get("from").map(wire_string).unwrap_or_default(),
                to: value.get("to").map(wire_string).unwrap_or_default(),
            },
            "is_relative_to_today" => DateOp::IsRelativeToToday(wire_string(value).parse()?),
            "is_empty" => DateOp::IsEmpty,
            "is_not_empty" => DateOp::IsNotEmpty,
            "is_set" => DateOp::IsSet,
            "is_not_set" => DateOp::IsNotSet,
            other => return Err(illegal(FieldType::Date, other)),
        })
    }

    pub(crate) fn wire_value(&self) -> Value {
        match self {
            DateOp::Is(t)
            | DateOp::IsNot(t)
            | DateOp::IsBefore(t)
            | DateOp::IsAfter(t)
            | DateOp::IsOnOrBefore(t)
            | DateOp::IsOnOrAfter(t) => t.wire_value(),
            DateOp::IsBetween { from, to } => json!({ "from": from, "to": to }),
            DateOp::IsRelativeToToday(c) => Value::String(c.code().to_string()),
            DateOp::IsEmpty | DateOp::IsNotEmpty | DateOp::IsSet | DateOp::IsNotSet => {
                Value::String(String::new())
            }
        }
    }

    /// Check literal dates parse. Used when authoring; decoding stays lenient.
    pub(crate) fn check_values(&self) -> Result<()> {
        let check = |s: &str| {
            parse_date_literal(s)
                .map(|_| ())
                .ok_or_else(|| FacetsError::invalid_value(self.code(), format!("'{}' is not a date", s)))
        };
        match self {
            DateOp::Is(DateTarget::Custom(s)) | DateOp::IsNot(DateTarget::Custom(s))
                if s.trim().is_empty() =>
            {
                Ok(())
            }
            DateOp::Is(DateTarget::Custom(s))
            | DateOp::IsNot(DateTarget::Custom(s))
            | DateOp::IsBefore(DateTarget::Custom(s))
            | DateOp::IsAfter(DateTarget::Custom(s))
            | DateOp::IsOnOrBefore(DateTarget::Custom(s))
            | DateOp::IsOnOrAfter(DateTarget::Custom(s)) => check(s),
            DateOp::IsBetween { from, to } => {
                check(from)?;
                check(to)
            }
            _ => Ok(()),
        }
    }
}

/// Resolve a field value to a record date. Empty strings count as missing.
fn record_date(value: FieldValue<'_>) -> Option<Cow<'_, RecordDate>> {
    match value {
        FieldValue::Date(d) => Some(Cow::Borrowed(d)),
        FieldValue::Text(s) if !s.is_empty() => Some(Cow::Owned(RecordDate::from(s.to_string()))),
        FieldValue::Json(Value::String(s)) if !s.is_empty() => {
            Some(Cow::Owned(RecordDate::from(s.clone())))
        }
        _ => None,
    }
}

/// The comparable instant of a date field, for sorting.
pub(crate) fn field_instant(value: FieldValue<'_>) -> Option<NaiveDateTime> {
    record_date(value).and_then(|d| d.instant())
}

pub(crate) fn evaluate(value: FieldValue<'_>, op: &DateOp, ctx: &EvalContext) -> bool {
    let date = record_date(value);
    let absent = date.as_deref().map_or(true, RecordDate::is_absent);
    let instant = date.as_deref().and_then(RecordDate::instant);

    let same_day = |t: &DateTarget| match (instant, t.day(ctx)) {
        (Some(i), Some(d)) => i.date() == d,
        _ => false,
    };
    let ordered = |t: &DateTarget, cmp: fn(&NaiveDateTime, &NaiveDateTime) -> bool| {
        match (instant, t.instant(ctx)) {
            (Some(i), Some(target)) => cmp(&i, &target),
            _ => false,
        }
    };

    match op {
        DateOp::Is(t) => same_day(t),
        DateOp::IsNot(t) => !same_day(t),
        DateOp::IsBefore(t) => ordered(t, |a, b| a < b),
        DateOp::IsAfter(t) => ordered(t, |a, b| a > b),
        DateOp::IsOnOrBefore(t) => ordered(t, |a, b| a <= b),
        DateOp::IsOnOrAfter(t) => ordered(t, |a, b| a >= b),
        DateOp::IsBetween { from, to } => {
            let from = parse_date_literal(from).map(|d| d.date());
            let to = parse_date_literal(to).map(|d| d.date());
            match (instant, from, to) {
                (Some(i), Some(from), Some(to)) => i.date() >= from && i.date() <= to,
                _ => false,
            }
        }
        DateOp::IsRelativeToToday(c) => instant.is_some_and(|i| c.holds(i.date(), ctx.today)),
        DateOp::IsEmpty | DateOp::IsNotSet => absent,
        DateOp::IsNotEmpty | DateOp::IsSet => !absent,
    }
}
