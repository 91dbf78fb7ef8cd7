//! # Configuration
//!
//! Facets configuration is managed by [`clapfig`], which handles layered
//! loading from TOML files and programmatic overrides.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Data-dir Config**: `<data-dir>/facets.toml` for an explicit `--data` dir.
//! 2. **Global Config**: `facets.toml` in the OS data directory (via `directories`).
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `storage_key` | `content-custom-views` | Store key holding saved views |
//! | `default_tab` | `all` | Tab used when a query names none |
//! | `custom_fields` | none | Extra filterable fields, see below |
//!
//! ## Custom Fields
//!
//! ```toml
//! [[custom_fields]]
//! key = "metrics.views"
//! label = "Views"
//! type = "number"
//! sortable = true
//! ```
//!
//! The key is a dotted path into the record's unmodelled keys.
//!
//! ## CLI Usage
//!
//! - `facets config get <key>`: Get a specific value.
//! - `facets config set <key> <value>`: Set a value.
//! - `facets config gen`: Generate a sample `facets.toml`.

use crate::registry::FieldType;
use crate::sync::ContentTab;
use confique::Config;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STORAGE_KEY: &str = "content-custom-views";

/// A filterable field declared in configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CustomField {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub sortable: bool,
}

/// Configuration for facets, stored in `facets.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FacetsConfig {
    /// Store key under which saved views are kept
    #[config(default = "content-custom-views")]
    pub storage_key: String,

    /// Tab selected when none is given: all, published, scheduled, drafts or pending
    #[config(default = "all")]
    pub default_tab: String,

    /// Additional filterable fields, addressed by dotted path into the record
    pub custom_fields: Option<Vec<CustomField>>,
}

impl Default for FacetsConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_tab: "all".to_string(),
            custom_fields: None,
        }
    }
}

impl FacetsConfig {
    /// The configured default tab. Unrecognised names fall back to `all`.
    pub fn default_tab(&self) -> ContentTab {
        self.default_tab.parse().unwrap_or_else(|_| {
            tracing::warn!(tab = %self.default_tab, "unknown default_tab, using 'all'");
            ContentTab::All
        })
    }

    pub fn custom_fields(&self) -> &[CustomField] {
        self.custom_fields.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FacetsConfig::default();
        assert_eq!(config.storage_key, "content-custom-views");
        assert_eq!(config.default_tab(), ContentTab::All);
        assert!(config.custom_fields().is_empty());
    }

    #[test]
    fn test_default_tab_parses() {
        let config = FacetsConfig {
            default_tab: "drafts".to_string(),
            ..Default::default()
        };
        assert_eq!(config.default_tab(), ContentTab::Drafts);
    }

    #[test]
    fn test_unknown_default_tab_falls_back() {
        let config = FacetsConfig {
            default_tab: "archived".to_string(),
            ..Default::default()
        };
        assert_eq!(config.default_tab(), ContentTab::All);
    }

    #[test]
    fn test_custom_fields_from_toml() {
        let config: FacetsConfig = toml::from_str(
            r#"
            storage_key = "views"
            default_tab = "all"

            [[custom_fields]]
            key = "metrics.views"
            label = "Views"
            type = "number"
            sortable = true

            [[custom_fields]]
            key = "region"
            type = "choice"
            options = ["EU", "US"]
            "#,
        )
        .unwrap();
        let fields = config.custom_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field_type, FieldType::Number);
        assert!(fields[0].sortable);
        assert_eq!(fields[1].label, None);
        assert_eq!(fields[1].options, vec!["EU", "US"]);
        assert!(!fields[1].sortable);
    }
}
