//! Operator tables, one per field type.
//!
//! Order matters: it is the order operators are offered in a picker.

use super::FieldType;

/// An operator code and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorSpec {
    pub code: &'static str,
    pub label: &'static str,
}

const fn op(code: &'static str, label: &'static str) -> OperatorSpec {
    OperatorSpec { code, label }
}

pub const TEXT_OPERATORS: &[OperatorSpec] = &[
    op("is", "Is"),
    op("is_not", "Is not"),
    op("contains", "Contains"),
    op("does_not_contain", "Does not contain"),
    op("starts_with", "Starts with"),
    op("ends_with", "Ends with"),
    op("is_empty", "Is empty"),
    op("is_not_empty", "Is not empty"),
];

// is_empty/is_not_set and is_not_empty/is_set behave identically; both
// spellings exist in saved views.
pub const DATE_OPERATORS: &[OperatorSpec] = &[
    op("is", "Is"),
    op("is_not", "Is not"),
    op("is_before", "Is before"),
    op("is_after", "Is after"),
    op("is_on_or_before", "Is on or before"),
    op("is_on_or_after", "Is on or after"),
    op("is_between", "Is between"),
    op("is_relative_to_today", "Is relative to today"),
    op("is_empty", "Is empty"),
    op("is_not_empty", "Is not empty"),
    op("is_set", "Is set"),
    op("is_not_set", "Is not set"),
];

pub const CHOICE_OPERATORS: &[OperatorSpec] = &[
    op("is", "Is"),
    op("is_not", "Is not"),
    op("is_empty", "Is empty"),
    op("is_not_empty", "Is not empty"),
    op("has_any_value", "Has any value"),
    op("is_unknown", "Is unknown"),
];

pub const MULTI_CHOICE_OPERATORS: &[OperatorSpec] = &[
    op("is", "Is"),
    op("is_not", "Is not"),
    op("contains", "Contains"),
    op("does_not_contain", "Does not contain"),
    op("is_empty", "Is empty"),
    op("is_not_empty", "Is not empty"),
    op("has_any_value", "Has any value"),
    op("is_unknown", "Is unknown"),
];

pub const TOGGLE_OPERATORS: &[OperatorSpec] = &[op("is_true", "Is true"), op("is_false", "Is false")];

pub const NUMBER_OPERATORS: &[OperatorSpec] = &[
    op("is", "Is"),
    op("is_not", "Is not"),
    op("is_greater_than", "Is greater than"),
    op("is_less_than", "Is less than"),
    op("is_greater_than_or_equal", "Is greater than or equal"),
    op("is_less_than_or_equal", "Is less than or equal"),
    op("is_between", "Is between"),
    op("is_empty", "Is empty"),
    op("is_not_empty", "Is not empty"),
];

/// Named date presets, resolved relative to the evaluation day.
pub const DATE_PRESETS: &[OperatorSpec] = &[
    op("today", "Today"),
    op("tomorrow", "Tomorrow"),
    op("yesterday", "Yesterday"),
    op("one_week_ago", "One week ago"),
    op("one_week_from_now", "One week from now"),
    op("one_month_ago", "One month ago"),
    op("one_month_from_now", "One month from now"),
    op("last_7_days", "Last 7 days"),
    op("next_7_days", "Next 7 days"),
    op("last_month", "Last month"),
    op("next_month", "Next month"),
    op("this_year", "This year"),
    op("last_year", "Last year"),
    op("next_year", "Next year"),
    op("custom", "Custom date"),
];

/// Conditions accepted by the `is_relative_to_today` date operator.
pub const RELATIVE_CONDITIONS: &[OperatorSpec] = &[
    op("today_and_earlier", "Today & Earlier"),
    op("overdue", "Overdue"),
    op("later_than_today", "Later than Today"),
    op("last_quarter", "Last quarter"),
    op("next_quarter", "Next quarter"),
];

const VALUELESS: &[&str] = &[
    "is_empty",
    "is_not_empty",
    "has_any_value",
    "is_unknown",
    "is_set",
    "is_not_set",
    "is_true",
    "is_false",
];

/// The ordered operator list for a field type.
pub fn operators_for(field_type: FieldType) -> &'static [OperatorSpec] {
    match field_type {
        FieldType::Text => TEXT_OPERATORS,
        FieldType::Date => DATE_OPERATORS,
        FieldType::Choice => CHOICE_OPERATORS,
        FieldType::MultiChoice => MULTI_CHOICE_OPERATORS,
        FieldType::Toggle => TOGGLE_OPERATORS,
        FieldType::Number => NUMBER_OPERATORS,
    }
}

/// Whether `code` is a registered operator for `field_type`.
pub fn is_legal(field_type: FieldType, code: &str) -> bool {
    operators_for(field_type).iter().any(|op| op.code == code)
}

/// Whether an operator takes a value from the user.
pub fn needs_value(code: &str) -> bool {
    !VALUELESS.contains(&code)
}

/// Display label for an operator code, if registered for the type.
pub fn operator_label(field_type: FieldType, code: &str) -> Option<&'static str> {
    operators_for(field_type)
        .iter()
        .find(|op| op.code == code)
        .map(|op| op.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_operators() {
        for ft in FieldType::ALL {
            assert!(!operators_for(ft).is_empty(), "{} has no operators", ft);
        }
    }

    #[test]
    fn legality_is_per_type() {
        assert!(is_legal(FieldType::Text, "starts_with"));
        assert!(!is_legal(FieldType::Choice, "starts_with"));
        assert!(is_legal(FieldType::Date, "is_set"));
        assert!(!is_legal(FieldType::Text, "is_set"));
        assert!(is_legal(FieldType::Toggle, "is_true"));
        assert!(!is_legal(FieldType::Toggle, "is_empty"));
    }

    #[test]
    fn valueless_operators() {
        assert!(!needs_value("is_empty"));
        assert!(!needs_value("is_true"));
        assert!(!needs_value("is_not_set"));
        assert!(needs_value("is"));
        assert!(needs_value("is_between"));
    }

    #[test]
    fn labels_follow_registration() {
        assert_eq!(operator_label(FieldType::Number, "is_between"), Some("Is between"));
        assert_eq!(operator_label(FieldType::Choice, "is_between"), None);
    }

    #[test]
    fn operator_codes_are_unique_within_a_type() {
        for ft in FieldType::ALL {
            let ops = operators_for(ft);
            for (i, a) in ops.iter().enumerate() {
                assert!(
                    ops[i + 1..].iter().all(|b| b.code != a.code),
                    "duplicate {} in {}",
                    a.code,
                    ft
                );
            }
        }
    }
}
