//! # Data Directory and Context Setup
//!
//! Facets keeps its configuration and saved views in one data directory.
//!
//! ## Resolution Order
//!
//! [`initialize`] picks the directory as follows:
//! 1. An explicit `data_override` (the CLI's `--data`).
//! 2. The `FACETS_DATA` environment variable (primarily for testing).
//! 3. The OS-appropriate data directory (via the `directories` crate).
//!
//! ## Configuration Search
//!
//! `facets.toml` is looked up in the OS data directory and, when an override
//! is given, in the override directory too. Both are merged with the override
//! winning. A missing or unreadable file falls back to compiled defaults.
//!
//! Custom fields declared in configuration are registered on top of the
//! built-in ones. A bad declaration (duplicate key) is reported and the
//! built-in registry is used instead.

use crate::api::FacetsApi;
use crate::config::FacetsConfig;
use crate::registry::FieldRegistry;
use crate::store::{FsBackend, ViewStore};
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use std::path::PathBuf;

pub const CONFIG_FILE: &str = "facets.toml";
pub const DATA_ENV: &str = "FACETS_DATA";

pub struct FacetsContext {
    pub api: FacetsApi<FsBackend>,
    pub config: FacetsConfig,
    pub data_dir: PathBuf,
}

/// The default data directory: `FACETS_DATA`, else the OS data dir.
pub fn default_data_dir() -> PathBuf {
    std::env::var(DATA_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            ProjectDirs::from("com", "facets", "facets").map(|dirs| dirs.data_dir().to_path_buf())
        })
        .unwrap_or_else(|| PathBuf::from(".facets"))
}

/// Config search paths: global first, override last so it wins on merge.
pub fn config_search_paths(data_override: Option<&PathBuf>) -> Vec<SearchPath> {
    let mut paths = vec![SearchPath::Path(default_data_dir())];
    if let Some(dir) = data_override {
        paths.push(SearchPath::Path(dir.clone()));
    }
    paths
}

/// Resolve the data directory, load configuration and open the view store.
pub fn initialize(data_override: Option<PathBuf>) -> FacetsContext {
    let data_dir = data_override.clone().unwrap_or_else(default_data_dir);

    let config: FacetsConfig = Clapfig::builder()
        .app_name("facets")
        .file_name(CONFIG_FILE)
        .search_paths(config_search_paths(data_override.as_ref()))
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_default();

    let registry = FieldRegistry::with_custom_fields(config.custom_fields()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring custom fields");
        FieldRegistry::builtin()
    });

    tracing::debug!(data_dir = %data_dir.display(), key = %config.storage_key, "initialized");

    let store = ViewStore::open(FsBackend::new(&data_dir), config.storage_key.clone());
    let api = FacetsApi::new(store, registry);

    FacetsContext {
        api,
        config,
        data_dir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::EditingState;
    use std::fs;

    #[test]
    fn test_initialize_with_override_uses_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = initialize(Some(dir.path().to_path_buf()));
        assert_eq!(ctx.data_dir, dir.path());

        ctx.api.save_view("Saved", &EditingState::default()).unwrap();
        assert!(dir.path().join("content-custom-views.json").exists());
    }

    #[test]
    fn test_initialize_reads_config_from_override() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
storage_key = "my-views"
default_tab = "drafts"
"#,
        )
        .unwrap();

        let ctx = initialize(Some(dir.path().to_path_buf()));
        assert_eq!(ctx.config.storage_key, "my-views");
        assert_eq!(ctx.api.store().key(), "my-views");
        assert_eq!(ctx.config.default_tab(), crate::sync::ContentTab::Drafts);
    }

    #[test]
    fn test_duplicate_custom_field_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[[custom_fields]]
key = "title"
type = "text"
"#,
        )
        .unwrap();

        let ctx = initialize(Some(dir.path().to_path_buf()));
        assert_eq!(ctx.api.registry().fields().len(), FieldRegistry::builtin().fields().len());
    }
}
