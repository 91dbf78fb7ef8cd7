//! Field specifications and the field registry.

use super::FieldType;
use crate::config::CustomField;
use crate::error::{FacetsError, Result};
use crate::filter::FilterRule;
use once_cell::sync::Lazy;

/// Specification for a single filterable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// The key rules use to address the field (e.g. "publishedAt")
    pub key: String,

    /// Human label shown in pickers
    pub label: String,

    pub field_type: FieldType,

    /// Values offered for choice and multi-choice fields.
    ///
    /// These are suggestions for the UI, not a constraint on rule values:
    /// records fetched from the API may carry values outside this list.
    pub options: Vec<String>,

    /// Whether the field appears in the sort picker
    pub sortable: bool,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            options: Vec::new(),
            sortable: false,
        }
    }

    fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|s| s.to_string()).collect();
        self
    }

    fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }
}

static BUILTIN: Lazy<Vec<FieldSpec>> = Lazy::new(|| {
    vec![
        FieldSpec::new("title", "Title", FieldType::Text).sortable(),
        FieldSpec::new("status", "Status", FieldType::Choice)
            .with_options(&["Published", "Draft", "Schedule", "Pending review"])
            .sortable(),
        FieldSpec::new("author", "Author", FieldType::Choice)
            .with_options(&["John Doe", "Jane Smith", "Alice Johnson", "Mark Wilson"])
            .sortable(),
        FieldSpec::new("space", "Space", FieldType::Choice)
            .with_options(&[
                "Discussions",
                "Articles",
                "Wishlist",
                "Guidelines",
                "Marketing",
            ])
            .sortable(),
        FieldSpec::new("publishedAt", "Published Date", FieldType::Date).sortable(),
        FieldSpec::new("cmsModel", "CMS Type", FieldType::Choice)
            .with_options(&["Discussion", "Article", "Wishlist", "Guide", "Strategy"])
            .sortable(),
        FieldSpec::new("tags", "Tags", FieldType::MultiChoice).with_options(&[
            "Discussion",
            "new",
            "me_too",
            "community",
            "featured",
            "moderation",
        ]),
        FieldSpec::new("locked", "Locked", FieldType::Toggle).sortable(),
    ]
});

/// Registry of filterable fields.
///
/// Built-in content fields are always present; custom fields are appended in
/// registration order.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: Vec<FieldSpec>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FieldRegistry {
    /// The built-in content fields.
    pub fn builtin() -> Self {
        Self {
            fields: BUILTIN.clone(),
        }
    }

    /// Built-in fields plus fields declared in configuration.
    ///
    /// A custom field may not reuse a key that is already registered.
    pub fn with_custom_fields(custom: &[CustomField]) -> Result<Self> {
        let mut registry = Self::builtin();
        for field in custom {
            registry.register(
                FieldSpec {
                    key: field.key.clone(),
                    label: field.label.clone().unwrap_or_else(|| field.key.clone()),
                    field_type: field.field_type,
                    options: field.options.clone(),
                    sortable: field.sortable,
                },
            )?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, spec: FieldSpec) -> Result<()> {
        if spec.key.trim().is_empty() {
            return Err(FacetsError::Config("field key cannot be empty".to_string()));
        }
        if self.get(&spec.key).is_some() {
            return Err(FacetsError::Config(format!(
                "field '{}' is already registered",
                spec.key
            )));
        }
        tracing::debug!(field = %spec.key, field_type = %spec.field_type, "registered field");
        self.fields.push(spec);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn sortable_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.sortable)
    }

    /// Check a rule against the registry.
    ///
    /// The operator itself is already known to be legal for the rule's type
    /// (see [`crate::filter::Condition`]); this checks the field exists and
    /// agrees with that type.
    pub fn validate(&self, rule: &FilterRule) -> Result<&FieldSpec> {
        let spec = self
            .get(&rule.field)
            .ok_or_else(|| FacetsError::UnknownField(rule.field.clone()))?;
        let found = rule.field_type();
        if spec.field_type != found {
            return Err(FacetsError::FieldTypeMismatch {
                field: rule.field.clone(),
                expected: spec.field_type,
                found,
            });
        }
        Ok(spec)
    }
}
