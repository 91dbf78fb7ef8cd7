use crate::api::FacetsApi;
use crate::model::{Record, RecordDate};
use crate::registry::FieldRegistry;
use crate::store::{FsBackend, ViewStore};
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub api: FacetsApi<FsBackend>,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let store = ViewStore::open(FsBackend::new(&root), crate::config::DEFAULT_STORAGE_KEY);
        Self {
            _temp_dir: temp_dir,
            api: FacetsApi::new(store, FieldRegistry::builtin()),
            root,
        }
    }

    /// Reopen the store from disk, as a restarted process would.
    pub fn reopen(&mut self) {
        let store = ViewStore::open(FsBackend::new(&self.root), crate::config::DEFAULT_STORAGE_KEY);
        self.api = FacetsApi::new(store, FieldRegistry::builtin());
    }
}

/// A small content table covering every status and a few CMS types.
pub fn sample_records() -> Vec<Record> {
    let rows = [
        ("1", "Level Up Your Community", "Published", "Discussion", "Jan 13, 2025", &["community", "new"][..]),
        ("2", "Moderation Guide", "Draft", "Guide", "Not published", &["moderation"][..]),
        ("3", "Spring Launch Plan", "Schedule", "Strategy", "Mar 1, 2025", &["featured"][..]),
        ("4", "Wishlist Roundup", "Pending review", "Wishlist", "Not published", &[][..]),
        ("5", "Onboarding Checklist", "Published", "Article", "Dec 20, 2024", &["new"][..]),
    ];
    rows.iter()
        .map(|(id, title, status, cms, published, tags)| {
            let mut r = Record::new(*id, *title);
            r.status = status.to_string();
            r.cms_model = cms.to_string();
            r.published_at = Some(RecordDate::from(published.to_string()));
            r.tags = tags.iter().map(|t| t.to_string()).collect();
            r
        })
        .collect()
}
