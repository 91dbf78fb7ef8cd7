//! The table pipeline: selectors and user rules in, filtered and sorted
//! records out.
//!
//! ```text
//! EditingState + tab ─► effective_rules ─► apply_filters ─► apply_sort
//!                                                          └─► StatusCounts
//! ```

use crate::error::Result;
use crate::filter::{apply_filters, EvalContext, FilterRule};
use crate::model::Record;
use crate::registry::FieldRegistry;
use crate::sort::apply_sort;
use crate::sync::{effective_rules, ContentTab};
use crate::views::EditingState;
use serde::Serialize;

/// Per-status totals shown on the tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub published: usize,
    pub scheduled: usize,
    pub draft: usize,
    pub pending: usize,
}

impl StatusCounts {
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.total += 1;
            match record.status.as_str() {
                "Published" => counts.published += 1,
                "Schedule" => counts.scheduled += 1,
                "Draft" => counts.draft += 1,
                "Pending review" => counts.pending += 1,
                _ => {}
            }
        }
        counts
    }

    /// The count shown on `tab`.
    pub fn for_tab(&self, tab: ContentTab) -> usize {
        match tab {
            ContentTab::All => self.total,
            ContentTab::Published => self.published,
            ContentTab::Scheduled => self.scheduled,
            ContentTab::Drafts => self.draft,
            ContentTab::Pending => self.pending,
        }
    }
}

#[derive(Debug)]
pub struct QueryOutput<'a> {
    pub records: Vec<&'a Record>,
    /// The rules that were evaluated, synthetic ones included.
    pub rules: Vec<FilterRule>,
    /// Counts over `records`.
    pub counts: StatusCounts,
}

/// Filter and sort `records` for the table.
///
/// Fails only when the sort names a field that cannot be sorted on.
pub fn run<'a>(
    records: &'a [Record],
    editing: &EditingState,
    tab: ContentTab,
    registry: &FieldRegistry,
    ctx: &EvalContext,
) -> Result<QueryOutput<'a>> {
    let rules = effective_rules(
        editing.filters.rules(),
        tab,
        editing.show_status_filter,
        editing.selected_cms_type.as_deref(),
    );

    let mut matched = apply_filters(records, &rules, ctx);
    apply_sort(&mut matched, &editing.sorting, registry)?;
    let counts = StatusCounts::tally(matched.iter().copied());

    tracing::debug!(
        tab = %tab,
        rules = rules.len(),
        matched = counts.total,
        "ran query"
    );

    Ok(QueryOutput {
        records: matched,
        rules,
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FacetsError;
    use crate::filter::{ChoiceOp, Condition, DateOp, TextOp};
    use crate::model::RecordDate;
    use crate::sort::{SortDirection, SortRule, SortState};
    use crate::sync::FilterSet;
    use chrono::NaiveDate;

    fn ctx() -> EvalContext {
        EvalContext::on(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
    }

    fn record(id: &str, title: &str, status: &str, cms: &str) -> Record {
        let mut r = Record::new(id, title);
        r.status = status.into();
        r.cms_model = cms.into();
        r
    }

    fn sample() -> Vec<Record> {
        vec![
            record("1", "Zeta launch", "Published", "Article"),
            record("2", "Alpha draft", "Draft", "Article"),
            record("3", "Beta plan", "Draft", "Guide"),
            record("4", "Gamma review", "Pending review", "Article"),
        ]
    }

    fn titles(out: &QueryOutput) -> Vec<String> {
        out.records.iter().map(|r| r.title.clone()).collect()
    }

    #[test]
    fn published_rule_keeps_only_published() {
        let records = vec![
            record("a", "A", "Draft", "Article"),
            record("b", "B", "Published", "Article"),
        ];
        let editing = EditingState {
            filters: FilterSet::from(vec![FilterRule::new(
                "r",
                "status",
                Condition::Choice(ChoiceOp::Is("Published".into())),
            )]),
            ..Default::default()
        };
        let out = run(&records, &editing, ContentTab::All, &FieldRegistry::builtin(), &ctx()).unwrap();
        assert_eq!(titles(&out), vec!["B"]);
    }

    #[test]
    fn not_published_matches_is_empty() {
        let mut records = sample();
        records[0].published_at = Some(RecordDate::from("Jan 13, 2025".to_string()));
        records[1].published_at = Some(RecordDate::NotPublished);
        let editing = EditingState {
            filters: FilterSet::from(vec![FilterRule::new(
                "r",
                "publishedAt",
                Condition::Date(DateOp::IsEmpty),
            )]),
            ..Default::default()
        };
        let out = run(&records, &editing, ContentTab::All, &FieldRegistry::builtin(), &ctx()).unwrap();
        assert_eq!(titles(&out), vec!["Alpha draft"]);
    }

    #[test]
    fn selectors_add_synthetic_rules() {
        let records = sample();
        let editing = EditingState {
            show_status_filter: true,
            selected_cms_type: Some("article".into()),
            ..Default::default()
        };
        let out = run(&records, &editing, ContentTab::Drafts, &FieldRegistry::builtin(), &ctx()).unwrap();
        assert_eq!(titles(&out), vec!["Alpha draft"]);
        assert_eq!(out.rules.len(), 2);
        assert!(out.rules.iter().all(|r| r.is_reserved()));
    }

    #[test]
    fn user_status_rule_wins_over_tab() {
        let records = sample();
        let editing = EditingState {
            filters: FilterSet::from(vec![FilterRule::new(
                "r",
                "status",
                Condition::Choice(ChoiceOp::Is("Pending review".into())),
            )]),
            show_status_filter: true,
            ..Default::default()
        };
        let out = run(&records, &editing, ContentTab::Drafts, &FieldRegistry::builtin(), &ctx()).unwrap();
        assert_eq!(titles(&out), vec!["Gamma review"]);
    }

    #[test]
    fn sorts_after_filtering() {
        let records = sample();
        let editing = EditingState {
            filters: FilterSet::from(vec![FilterRule::new(
                "r",
                "cmsModel",
                Condition::Choice(ChoiceOp::Is("Article".into())),
            )]),
            sorting: SortState::by(SortRule::new("title", SortDirection::Asc)),
            ..Default::default()
        };
        let out = run(&records, &editing, ContentTab::All, &FieldRegistry::builtin(), &ctx()).unwrap();
        assert_eq!(titles(&out), vec!["Alpha draft", "Gamma review", "Zeta launch"]);
    }

    #[test]
    fn counts_match_output() {
        let records = sample();
        let editing = EditingState {
            filters: FilterSet::from(vec![FilterRule::new(
                "r",
                "title",
                Condition::Text(TextOp::DoesNotContain("zeta".into())),
            )]),
            ..Default::default()
        };
        let out = run(&records, &editing, ContentTab::All, &FieldRegistry::builtin(), &ctx()).unwrap();
        assert_eq!(out.counts.total, out.records.len());
        assert_eq!(
            out.counts,
            StatusCounts {
                total: 3,
                published: 0,
                scheduled: 0,
                draft: 2,
                pending: 1,
            }
        );
        assert_eq!(out.counts.for_tab(ContentTab::Drafts), 2);
    }

    #[test]
    fn unsortable_field_errors() {
        let records = sample();
        let editing = EditingState {
            sorting: SortState::by(SortRule::new("tags", SortDirection::Asc)),
            ..Default::default()
        };
        let err = run(&records, &editing, ContentTab::All, &FieldRegistry::builtin(), &ctx()).unwrap_err();
        assert!(matches!(err, FacetsError::NotSortable(_)));
    }

    #[test]
    fn input_is_not_mutated() {
        let records = sample();
        let before = records.clone();
        let editing = EditingState {
            sorting: SortState::by(SortRule::new("title", SortDirection::Desc)),
            ..Default::default()
        };
        run(&records, &editing, ContentTab::All, &FieldRegistry::builtin(), &ctx()).unwrap();
        assert_eq!(records, before);
    }
}
