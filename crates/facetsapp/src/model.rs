//! # Domain Model: Content Records
//!
//! A [`Record`] is one row of the content table: a post with its title,
//! workflow status, author, space, publication date, CMS type, tags and lock
//! flag. Records are supplied by the caller (typically fetched from the API,
//! see [`crate::ingest`]) and are never mutated by filtering or sorting.
//!
//! ## Publication Dates
//!
//! `publishedAt` is a display string in the source data. It is either a date
//! or the sentinel `"Not published"`. [`RecordDate`] keeps the three cases
//! apart:
//!
//! - `NotPublished`: the sentinel. Counts as *empty* for emptiness checks and
//!   as the Unix epoch for ordered comparisons.
//! - `At`: a parsed wall-clock date-time. No timezone conversion is applied.
//! - `Unparsed`: any other string. Matches no ordered comparison.
//!
//! ## Field Access
//!
//! Filters and sorts address fields by key. [`Record::field_value`] resolves a
//! key to a [`FieldValue`]: built-in keys map to struct fields, anything else
//! is looked up in [`Record::extra`] by dotted path (`"metrics.views"`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The literal the dashboard uses for posts without a publication date.
pub const NOT_PUBLISHED: &str = "Not published";

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%b %d, %Y", "%B %d, %Y", "%m/%d/%Y"];

/// Parse a date literal as found in records and rule values.
///
/// Accepts RFC 3339 timestamps (kept at their own wall-clock time), ISO
/// date-times without offset, ISO dates, and the dashboard's display format
/// (`"Jan 13, 2025"`). Date-only inputs resolve to midnight.
pub fn parse_date_literal(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// A record's publication date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordDate {
    NotPublished,
    At(NaiveDateTime),
    Unparsed(String),
}

impl RecordDate {
    /// Missing-or-sentinel check shared by `is_empty` and `is_not_set`.
    pub fn is_absent(&self) -> bool {
        matches!(self, RecordDate::NotPublished)
    }

    /// The instant used for ordered comparisons.
    ///
    /// The sentinel compares as the Unix epoch; unparseable strings have no
    /// instant.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        match self {
            RecordDate::NotPublished => Some(DateTime::<Utc>::UNIX_EPOCH.naive_utc()),
            RecordDate::At(dt) => Some(*dt),
            RecordDate::Unparsed(_) => None,
        }
    }
}

impl From<String> for RecordDate {
    fn from(s: String) -> Self {
        if s == NOT_PUBLISHED {
            return RecordDate::NotPublished;
        }
        match parse_date_literal(&s) {
            Some(dt) => RecordDate::At(dt),
            None => RecordDate::Unparsed(s),
        }
    }
}

impl From<RecordDate> for String {
    fn from(date: RecordDate) -> Self {
        date.to_string()
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordDate::NotPublished => f.write_str(NOT_PUBLISHED),
            RecordDate::At(dt) if dt.time() == NaiveTime::MIN => {
                write!(f, "{}", dt.format("%Y-%m-%d"))
            }
            RecordDate::At(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            RecordDate::Unparsed(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One row of the content table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub space: Space,
    #[serde(default)]
    pub published_at: Option<RecordDate>,
    #[serde(default)]
    pub cms_model: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub locked: bool,
    /// Keys not modelled above, addressable by custom fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A resolved field value, borrowed from a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Text(&'a str),
    Date(&'a RecordDate),
    List(&'a [String]),
    Bool(bool),
    Json(&'a Value),
}

impl Record {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: String::new(),
            author: Author::default(),
            space: Space::default(),
            published_at: None,
            cms_model: String::new(),
            tags: Vec::new(),
            locked: false,
            extra: Map::new(),
        }
    }

    /// Resolve a field key against this record.
    ///
    /// # Supported Keys
    ///
    /// | Key | Value |
    /// |-----|-------|
    /// | `"id"`, `"title"`, `"status"`, `"cmsModel"` | `Text` |
    /// | `"author"`, `"author.name"` | `Text` (author name) |
    /// | `"space"`, `"space.name"` | `Text` (space name) |
    /// | `"publishedAt"` | `Date`, or `Missing` when absent |
    /// | `"tags"` | `List` |
    /// | `"locked"` | `Bool` |
    /// | anything else | dotted path into `extra`, `Json` or `Missing` |
    pub fn field_value(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::Text(&self.id),
            "title" => FieldValue::Text(&self.title),
            "status" => FieldValue::Text(&self.status),
            "author" | "author.name" => FieldValue::Text(&self.author.name),
            "space" | "space.name" => FieldValue::Text(&self.space.name),
            "publishedAt" => match &self.published_at {
                Some(date) => FieldValue::Date(date),
                None => FieldValue::Missing,
            },
            "cmsModel" => FieldValue::Text(&self.cms_model),
            "tags" => FieldValue::List(&self.tags),
            "locked" => FieldValue::Bool(self.locked),
            path => self.extra_value(path),
        }
    }

    fn extra_value(&self, path: &str) -> FieldValue<'_> {
        let mut segments = path.split('.');
        let Some(first) = segments.next() else {
            return FieldValue::Missing;
        };
        let mut current = match self.extra.get(first) {
            Some(v) => v,
            None => return FieldValue::Missing,
        };
        for segment in segments {
            match current.get(segment) {
                Some(v) => current = v,
                None => return FieldValue::Missing,
            }
        }
        if current.is_null() {
            FieldValue::Missing
        } else {
            FieldValue::Json(current)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn parses_display_format() {
        assert_eq!(parse_date_literal("Jan 13, 2025"), Some(ymd(2025, 1, 13)));
        assert_eq!(parse_date_literal("January 13, 2025"), Some(ymd(2025, 1, 13)));
    }

    #[test]
    fn parses_iso_forms() {
        assert_eq!(parse_date_literal("2025-01-13"), Some(ymd(2025, 1, 13)));
        let dt = parse_date_literal("2025-01-13T09:30:00").unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "09:30");
        let rfc = parse_date_literal("2025-01-13T09:30:00+02:00").unwrap();
        assert_eq!(rfc.format("%H:%M").to_string(), "09:30");
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_eq!(parse_date_literal(""), None);
        assert_eq!(parse_date_literal("someday"), None);
    }

    #[test]
    fn sentinel_is_not_published() {
        let date = RecordDate::from(NOT_PUBLISHED.to_string());
        assert_eq!(date, RecordDate::NotPublished);
        assert!(date.is_absent());
        assert_eq!(date.instant().unwrap().date(), NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
    }

    #[test]
    fn unparsed_date_has_no_instant() {
        let date = RecordDate::from("next sprint".to_string());
        assert!(!date.is_absent());
        assert_eq!(date.instant(), None);
        assert_eq!(date.to_string(), "next sprint");
    }

    #[test]
    fn record_deserializes_dashboard_shape() {
        let record: Record = serde_json::from_value(json!({
            "id": "dOUwwAq3Lc9vmA",
            "title": "Level Up Your Community",
            "status": "Schedule",
            "author": { "name": "John Doe", "avatar": "https://example.test/a.png" },
            "space": { "name": "Discussions", "color": "#6366f1" },
            "publishedAt": "Jan 13, 2025",
            "cmsModel": "Discussion",
            "tags": ["Discussion", "new", "me_too"],
            "locked": false,
            "metrics": { "views": 42 }
        }))
        .unwrap();

        assert_eq!(record.author.name, "John Doe");
        assert_eq!(record.published_at, Some(RecordDate::At(ymd(2025, 1, 13))));
        assert_eq!(record.field_value("metrics.views"), FieldValue::Json(&json!(42)));
    }

    #[test]
    fn field_value_resolves_builtin_keys() {
        let mut record = Record::new("1", "Hello");
        record.author.name = "Jane Smith".into();
        record.tags = vec!["new".into()];
        record.locked = true;

        assert_eq!(record.field_value("title"), FieldValue::Text("Hello"));
        assert_eq!(record.field_value("author"), FieldValue::Text("Jane Smith"));
        assert_eq!(record.field_value("author.name"), FieldValue::Text("Jane Smith"));
        assert_eq!(record.field_value("locked"), FieldValue::Bool(true));
        assert_eq!(record.field_value("publishedAt"), FieldValue::Missing);
        assert!(matches!(record.field_value("tags"), FieldValue::List(t) if t.len() == 1));
    }

    #[test]
    fn extra_paths_missing_or_null_are_missing() {
        let mut record = Record::new("1", "Hello");
        record.extra.insert("score".into(), Value::Null);
        assert_eq!(record.field_value("score"), FieldValue::Missing);
        assert_eq!(record.field_value("metrics.views"), FieldValue::Missing);
    }

    #[test]
    fn published_at_serializes_back_to_sentinel() {
        let mut record = Record::new("1", "Draft post");
        record.published_at = Some(RecordDate::NotPublished);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["publishedAt"], json!("Not published"));
    }
}
