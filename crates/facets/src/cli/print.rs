//! Terminal rendering for records, rules, fields and views.
//!
//! Layout is fixed-width: the record table fills [`LINE_WIDTH`] columns, with
//! the title column absorbing whatever the fixed columns leave over. Widths
//! are measured with `unicode-width`, so wide glyphs in titles don't break
//! alignment.

use super::styles::{
    status_style, DIM, ERROR, HEADING, RULE_AUTO, SUCCESS, TITLE, VIEW_NAME, WARNING,
};
use chrono::{DateTime, Utc};
use facetsapp::commands::fields::FieldInfo;
use facetsapp::commands::query::{QueryOutput, StatusCounts};
use facetsapp::commands::{CmdMessage, MessageLevel};
use facetsapp::filter::FilterRule;
use facetsapp::model::Record;
use facetsapp::sync::ContentTab;
use facetsapp::views::CustomView;
use serde_json::Value;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const STATUS_WIDTH: usize = 16;
const TYPE_WIDTH: usize = 12;
const DATE_WIDTH: usize = 20;
const TIME_WIDTH: usize = 14;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", DIM.apply_to(&message.content)),
            MessageLevel::Success => println!("{}", SUCCESS.apply_to(&message.content)),
            MessageLevel::Warning => println!("{}", WARNING.apply_to(&message.content)),
            MessageLevel::Error => println!("{}", ERROR.apply_to(&message.content)),
        }
    }
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> facetsapp::error::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Rules line, record table, then the per-status counts.
pub fn print_query(output: &QueryOutput<'_>, tab: ContentTab) {
    if !output.rules.is_empty() {
        let rules: Vec<String> = output
            .rules
            .iter()
            .map(|rule| {
                let text = rule_summary(rule);
                if rule.is_reserved() {
                    RULE_AUTO.apply_to(format!("{} (auto)", text)).to_string()
                } else {
                    text
                }
            })
            .collect();
        let sep = DIM.apply_to(" · ").to_string();
        println!("{} {}", DIM.apply_to("Filters:"), rules.join(sep.as_str()));
        println!();
    }

    print_records(&output.records);
    println!();
    println!("{}", counts_line(&output.counts, tab));
}

pub fn print_records(records: &[&Record]) {
    if records.is_empty() {
        println!("No records match.");
        return;
    }

    let title_width = LINE_WIDTH.saturating_sub(STATUS_WIDTH + TYPE_WIDTH + DATE_WIDTH);
    for record in records {
        let title = pad_to_width(&truncate_to_width(&record.title, title_width - 1), title_width);
        let status = pad_to_width(&truncate_to_width(&record.status, STATUS_WIDTH - 1), STATUS_WIDTH);
        let cms = pad_to_width(&truncate_to_width(&record.cms_model, TYPE_WIDTH - 1), TYPE_WIDTH);
        let date = record
            .published_at
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();

        println!(
            "{}{}{}{}",
            TITLE.apply_to(title),
            status_style(&record.status).apply_to(status),
            cms,
            DIM.apply_to(format!("{:>width$}", date, width = DATE_WIDTH))
        );
    }
}

fn counts_line(counts: &StatusCounts, tab: ContentTab) -> String {
    let tabs = [
        (ContentTab::All, "all"),
        (ContentTab::Published, "published"),
        (ContentTab::Scheduled, "scheduled"),
        (ContentTab::Drafts, "drafts"),
        (ContentTab::Pending, "pending"),
    ];
    tabs.iter()
        .map(|(t, label)| {
            let text = format!("{} {}", counts.for_tab(*t), label);
            if *t == tab {
                TITLE.apply_to(text).to_string()
            } else {
                DIM.apply_to(text).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn print_fields(fields: &[FieldInfo]) {
    for field in fields {
        let sortable = if field.sortable { ", sortable" } else { "" };
        println!(
            "{} {}",
            TITLE.apply_to(&field.key),
            DIM.apply_to(format!("({}{})", field.field_type, sortable))
        );
        if !field.options.is_empty() {
            println!("    options: {}", field.options.join(", "));
        }
        let ops: Vec<&str> = field.operators.iter().map(|op| op.code).collect();
        println!("    {}", ops.join(" "));
    }
}

pub fn print_views(views: &[CustomView]) {
    if views.is_empty() {
        return;
    }
    let id_width = views.iter().map(|v| v.id.width()).max().unwrap_or(0) + 2;
    let fixed = id_width + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed);

    for view in views {
        let name = format!("{}  {}", view.name, view.summary());
        let name = pad_to_width(&truncate_to_width(&name, available), available);
        println!(
            "{}{}{}",
            VIEW_NAME.apply_to(name),
            DIM.apply_to(format!("{:<width$}", view.id, width = id_width)),
            DIM.apply_to(format_time_ago(view.updated_at))
        );
    }
}

pub fn print_view_detail(view: &CustomView) {
    println!("{}", VIEW_NAME.apply_to(&view.name));
    println!("{}", DIM.apply_to(&view.id));
    println!();

    println!("{}", HEADING.apply_to("Filters"));
    if view.filters.is_empty() {
        println!("  {}", DIM.apply_to("none"));
    }
    for rule in &view.filters {
        println!("  {}", rule_summary(rule));
    }

    println!("{}", HEADING.apply_to("Sort"));
    match view.sorting.rule() {
        Some(rule) => println!("  {} ({})", rule.field, rule.direction),
        None => println!("  {}", DIM.apply_to("none")),
    }

    if view.show_status_filter {
        println!("{} shown", HEADING.apply_to("Status filter"));
    }
    if let Some(cms_type) = &view.selected_cms_type {
        println!("{} {}", HEADING.apply_to("CMS type"), cms_type);
    }

    println!();
    println!(
        "{}",
        DIM.apply_to(format!(
            "created {}, updated {}",
            format_time_ago(view.created_at).trim(),
            format_time_ago(view.updated_at).trim()
        ))
    );
}

/// `field operator value`, e.g. `tags contains new, featured`.
pub fn rule_summary(rule: &FilterRule) -> String {
    let value = format_rule_value(&rule.value());
    if value.is_empty() {
        format!("{} {}", rule.field, rule.operator())
    } else {
        format!("{} {} {}", rule.field, rule.operator(), value)
    }
}

fn format_rule_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(format_rule_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => {
            if let (Some(from), Some(to)) = (map.get("from"), map.get("to")) {
                format!("{}..{}", format_rule_value(from), format_rule_value(to))
            } else if let Some(date) = map.get("date") {
                format_rule_value(date)
            } else if let Some(preset) = map.get("preset") {
                format_rule_value(preset)
            } else {
                value.to_string()
            }
        }
        other => other.to_string(),
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
