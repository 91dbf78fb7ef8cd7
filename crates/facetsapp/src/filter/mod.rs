//! # Filter Engine
//!
//! Rules are evaluated one record at a time by [`evaluate`], which looks the
//! rule's field up on the record and dispatches on the rule's
//! [`Condition`]. A rule list combines with AND: [`matching`] yields the
//! records every rule accepts, lazily and in input order.
//!
//! ```text
//! records ──► matching(rules) ──► apply_sort ──► caller
//!               │
//!               └─ evaluate(record, rule, ctx) per rule, short-circuiting
//! ```
//!
//! There is no OR and no grouping. An empty rule list keeps every record.
//!
//! ## Determinism
//!
//! Date presets ("today", "last_month", ...) depend on the current day. The
//! [`EvalContext`] carries that day explicitly so results are reproducible;
//! production callers use [`EvalContext::local`].
//!
//! ## Coercion Rules
//!
//! | Type | Field side | Rule side |
//! |------|------------|-----------|
//! | text | stringified, lowercased; missing is `""` | lowercased |
//! | choice | stringified, case kept | exact string |
//! | number | missing/non-numeric is `0` | unparseable is `NaN` |
//! | date | `"Not published"` is epoch / absent | literal or preset |
//! | multi-choice | non-list is `[]` | non-list is `[]` |
//! | toggle | non-boolean matches nothing | none |

mod date;
mod expr;
mod multi;
mod number;
mod rule;
mod text;
mod value;

pub use date::{DateOp, DatePreset, DateTarget, RelativeCondition};
pub use expr::parse_rule_expr;
pub use multi::{MultiChoiceOp, ToggleOp};
pub use number::NumberOp;
pub use rule::{is_reserved_id, Condition, FilterRule, CMS_TYPE_AUTO_ID, STATUS_AUTO_ID};
pub use text::{ChoiceOp, TextOp};

pub(crate) use date::field_instant;
pub(crate) use number::field_number;
pub(crate) use value::display_string;

use crate::model::Record;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

/// The moment rules are evaluated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalContext {
    pub today: NaiveDate,
    pub now: NaiveDateTime,
}

impl EvalContext {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            today: now.date(),
            now,
        }
    }

    /// Midnight on `day`.
    pub fn on(day: NaiveDate) -> Self {
        Self::at(day.and_time(NaiveTime::MIN))
    }

    /// The local wall clock.
    pub fn local() -> Self {
        Self::at(Local::now().naive_local())
    }
}

/// Whether `record` satisfies `rule`.
pub fn evaluate(record: &Record, rule: &FilterRule, ctx: &EvalContext) -> bool {
    let value = record.field_value(&rule.field);
    match &rule.condition {
        Condition::Text(op) => text::evaluate(value, op),
        Condition::Choice(op) => text::evaluate_choice(value, op),
        Condition::Number(op) => number::evaluate(value, op),
        Condition::Date(op) => date::evaluate(value, op, ctx),
        Condition::MultiChoice(op) => multi::evaluate(value, op),
        Condition::Toggle(op) => multi::evaluate_toggle(value, *op),
    }
}

/// Records satisfying every rule, in input order.
pub fn matching<'a, I>(
    records: I,
    rules: &'a [FilterRule],
    ctx: &'a EvalContext,
) -> impl Iterator<Item = &'a Record> + 'a
where
    I: IntoIterator<Item = &'a Record>,
    I::IntoIter: 'a,
{
    records
        .into_iter()
        .filter(move |record| rules.iter().all(|rule| evaluate(record, rule, ctx)))
}

/// Collect [`matching`] records.
pub fn apply_filters<'a>(
    records: &'a [Record],
    rules: &[FilterRule],
    ctx: &EvalContext,
) -> Vec<&'a Record> {
    let result: Vec<&Record> = records
        .iter()
        .filter(|record| rules.iter().all(|rule| evaluate(record, rule, ctx)))
        .collect();
    tracing::debug!(
        rules = rules.len(),
        input = records.len(),
        matched = result.len(),
        "applied filters"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordDate;
    use serde_json::json;

    fn ctx() -> EvalContext {
        EvalContext::on(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
    }

    fn post(id: &str, title: &str, status: &str, tags: &[&str]) -> Record {
        let mut r = Record::new(id, title);
        r.status = status.to_string();
        r.tags = tags.iter().map(|t| t.to_string()).collect();
        r
    }

    fn sample() -> Vec<Record> {
        vec![
            post("1", "Community Building", "Published", &["community", "new"]),
            post("2", "Moderation Guide", "Draft", &["moderation"]),
            post("3", "Community Wishlist", "Draft", &["community"]),
        ]
    }

    fn ids(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn empty_rule_list_is_identity() {
        let records = sample();
        let out = apply_filters(&records, &[], &ctx());
        assert_eq!(ids(&out), vec!["1", "2", "3"]);
    }

    #[test]
    fn rules_combine_with_and() {
        let records = sample();
        let rules = vec![
            FilterRule::new("a", "title", Condition::Text(TextOp::Contains("community".into()))),
            FilterRule::new("b", "status", Condition::Choice(ChoiceOp::Is("Draft".into()))),
        ];
        let out = apply_filters(&records, &rules, &ctx());
        assert_eq!(ids(&out), vec!["3"]);
    }

    #[test]
    fn rule_order_does_not_change_result() {
        let records = sample();
        let mut rules = vec![
            FilterRule::new("a", "tags", Condition::MultiChoice(MultiChoiceOp::Contains(vec!["community".into()]))),
            FilterRule::new("b", "status", Condition::Choice(ChoiceOp::IsNot("Published".into()))),
        ];
        let forward = ids(&apply_filters(&records, &rules, &ctx()));
        rules.reverse();
        let backward = ids(&apply_filters(&records, &rules, &ctx()));
        assert_eq!(forward, backward);
    }

    #[test]
    fn matching_is_lazy_and_ordered() {
        let records = sample();
        let rules = vec![FilterRule::new(
            "a",
            "title",
            Condition::Text(TextOp::StartsWith("community".into())),
        )];
        let c = ctx();
        let first = matching(&records, &rules, &c).next().unwrap();
        assert_eq!(first.id, "1");
        assert_eq!(matching(&records, &rules, &c).count(), 2);
    }

    #[test]
    fn custom_fields_resolve_by_path() {
        let mut records = sample();
        records[0].extra.insert("metrics".into(), json!({"views": 120}));
        records[1].extra.insert("metrics".into(), json!({"views": "15"}));
        let rules = vec![FilterRule::new(
            "a",
            "metrics.views",
            Condition::Number(NumberOp::GreaterThan(json!(10))),
        )];
        let out = apply_filters(&records, &rules, &ctx());
        assert_eq!(ids(&out), vec!["1", "2"]);
    }

    #[test]
    fn date_rules_use_context_day() {
        let mut records = sample();
        records[0].published_at = Some(RecordDate::from("Jan 15, 2025".to_string()));
        records[1].published_at = Some(RecordDate::NotPublished);
        let rules = vec![FilterRule::new(
            "a",
            "publishedAt",
            Condition::Date(DateOp::Is(DateTarget::Preset(DatePreset::Today))),
        )];
        let out = apply_filters(&records, &rules, &ctx());
        assert_eq!(ids(&out), vec!["1"]);
    }

    #[test]
    fn eval_context_constructors() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let c = EvalContext::on(day);
        assert_eq!(c.today, day);
        assert_eq!(c.now.time(), NaiveTime::MIN);
    }
}
