//! # Record Ingestion
//!
//! The posts API returns rows in the database shape (`snake_case`, lowercase
//! statuses, ids instead of names). The table works on [`Record`]s. This
//! module maps one to the other.
//!
//! | API field | Record field | Fallback |
//! |-----------|--------------|----------|
//! | `status` | `status` | `published`→`Published`, `scheduled`→`Schedule`, `pending_review`→`Pending review`, else `Draft` |
//! | `author.full_name` / `author.username` | `author.name` | `Author <first 4 of author_id>`, else `Anonymous` |
//! | `space.name` | `space.name` | `Space <first 6 of space_id>` when only an id is known, else `General` |
//! | `published_at` | `publishedAt` | `"Not published"` |
//! | `cms_type` | `cmsModel` | `Unknown` |
//! | `tags` | `tags` | strings or `{ "name": ... }` objects |
//! | `title` | `title` | `Untitled` |
//! | `locked` | `locked` | `false` |
//!
//! Empty strings count as missing throughout. Keys the mapping does not know
//! are carried into [`Record::extra`] so custom fields can reach them.
//!
//! Input files may hold either shape, or a mix: [`parse_records`] decides per
//! element.

use crate::error::{FacetsError, Result};
use crate::model::{Author, Record, RecordDate, Space};
use chrono::{DateTime, Local, NaiveTime};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const DEFAULT_SPACE_COLOR: &str = "#6366f1";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiAuthor {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiSpace {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ApiTag {
    Name(String),
    Object { name: String },
    Other(Value),
}

impl ApiTag {
    fn into_name(self) -> String {
        match self {
            ApiTag::Name(name) | ApiTag::Object { name } => name,
            ApiTag::Other(Value::String(s)) => s,
            ApiTag::Other(other) => other.to_string(),
        }
    }
}

/// A post as the API returns it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiPost {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub author: Option<ApiAuthor>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub space: Option<ApiSpace>,
    #[serde(default)]
    pub space_id: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub cms_type: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<ApiTag>>,
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Authors and spaces fetched alongside the posts, keyed by id.
///
/// Posts usually carry only `author_id` and `space_id`; a directory fills in
/// the names.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    pub authors: HashMap<String, ApiAuthor>,
    pub spaces: HashMap<String, ApiSpace>,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

fn prefix(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Display status for an API status.
pub fn map_status(status: Option<&str>) -> &'static str {
    match status {
        Some("published") => "Published",
        Some("scheduled") => "Schedule",
        Some("pending_review") => "Pending review",
        _ => "Draft",
    }
}

fn map_published_at(raw: Option<&str>) -> RecordDate {
    let Some(raw) = raw else {
        return RecordDate::NotPublished;
    };
    // Timestamps become the local calendar day, as the table shows them.
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        let day = dt.with_timezone(&Local).date_naive();
        return RecordDate::At(day.and_time(NaiveTime::MIN));
    }
    match RecordDate::from(raw.to_string()) {
        RecordDate::At(dt) => RecordDate::At(dt.date().and_time(NaiveTime::MIN)),
        other => other,
    }
}

impl ApiPost {
    /// Map to a table record, filling author and space from `directory`.
    pub fn into_record(self, directory: &Directory) -> Record {
        let author = self
            .author_id
            .as_ref()
            .and_then(|id| directory.authors.get(id))
            .or(self.author.as_ref());
        let author_name = author
            .and_then(|a| non_empty(&a.full_name).or(non_empty(&a.username)))
            .map(str::to_string)
            .or_else(|| non_empty(&self.author_id).map(|id| format!("Author {}", prefix(id, 4))))
            .unwrap_or_else(|| "Anonymous".to_string());

        let space = self
            .space_id
            .as_ref()
            .and_then(|id| directory.spaces.get(id))
            .or(self.space.as_ref());
        let space_name = space
            .and_then(|s| non_empty(&s.name))
            .map(str::to_string)
            .or_else(|| non_empty(&self.space_id).map(|id| format!("Space {}", prefix(id, 6))))
            .unwrap_or_else(|| "General".to_string());
        let space_color = space
            .and_then(|s| non_empty(&s.color))
            .unwrap_or(DEFAULT_SPACE_COLOR)
            .to_string();

        Record {
            id: self.id.clone().unwrap_or_default(),
            title: non_empty(&self.title).unwrap_or("Untitled").to_string(),
            status: map_status(self.status.as_deref()).to_string(),
            author: Author {
                name: author_name,
                avatar: author.and_then(|a| a.avatar_url.clone()),
            },
            space: Space {
                name: space_name,
                color: Some(space_color),
            },
            published_at: Some(map_published_at(non_empty(&self.published_at))),
            cms_model: non_empty(&self.cms_type).unwrap_or("Unknown").to_string(),
            tags: self
                .tags
                .unwrap_or_default()
                .into_iter()
                .map(ApiTag::into_name)
                .collect(),
            locked: self.locked.unwrap_or(false),
            extra: self.extra,
        }
    }
}

const API_ONLY_KEYS: &[&str] = &["cms_type", "published_at", "author_id", "space_id"];

fn looks_like_api_post(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    API_ONLY_KEYS.iter().any(|k| obj.contains_key(*k))
        || obj
            .get("status")
            .and_then(Value::as_str)
            .is_some_and(|s| s.chars().next().is_some_and(|c| c.is_ascii_lowercase()))
}

/// Parse a JSON array of records or API posts.
///
/// Also accepts an object wrapping the array under `posts` or `records`.
pub fn parse_records(raw: &str, directory: &Directory) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(raw).map_err(FacetsError::Serialization)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("posts").or_else(|| obj.remove("records")) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(FacetsError::Api(
                    "Expected an array of records or an object with a 'posts' array".to_string(),
                ))
            }
        },
        _ => return Err(FacetsError::Api("Expected an array of records".to_string())),
    };

    let mut records = Vec::with_capacity(items.len());
    let mut mapped = 0usize;
    for item in items {
        if looks_like_api_post(&item) {
            let post: ApiPost = serde_json::from_value(item).map_err(FacetsError::Serialization)?;
            records.push(post.into_record(directory));
            mapped += 1;
        } else {
            records.push(serde_json::from_value(item).map_err(FacetsError::Serialization)?);
        }
    }
    tracing::debug!(total = records.len(), mapped, "parsed records");
    Ok(records)
}
