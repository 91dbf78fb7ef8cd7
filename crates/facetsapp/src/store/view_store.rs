use super::backend::StorageBackend;
use crate::error::{FacetsError, Result};
use crate::filter::FilterRule;
use crate::views::{CustomView, EditingState, ViewPatch};
use chrono::Utc;
use uuid::Uuid;

/// Saved views under one storage key, plus the active view.
///
/// The list is held in memory and written through on every mutation:
/// the next list is serialized and persisted first, and only a successful
/// write replaces the in-memory copy.
pub struct ViewStore<B: StorageBackend> {
    backend: B,
    key: String,
    views: Vec<CustomView>,
    current: Option<CustomView>,
}

impl<B: StorageBackend> ViewStore<B> {
    /// Load the views stored under `key`.
    ///
    /// Never fails: an unreadable or corrupt payload opens as an empty store.
    /// A corrupt payload is copied to `<key>.corrupt` before anything can
    /// overwrite it.
    pub fn open(backend: B, key: impl Into<String>) -> Self {
        let key = key.into();
        let views = Self::load_views(&backend, &key);
        tracing::debug!(key = %key, count = views.len(), "opened view store");
        Self {
            backend,
            key,
            views,
            current: None,
        }
    }

    fn load_views(backend: &B, key: &str) -> Vec<CustomView> {
        let raw = match backend.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "could not read saved views, starting empty");
                return Vec::new();
            }
        };
        if raw.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<Vec<CustomView>>(&raw) {
            Ok(mut views) => {
                for view in &mut views {
                    strip_reserved(&mut view.filters);
                }
                views
            }
            Err(e) => {
                let backup = format!("{}.corrupt", key);
                tracing::warn!(
                    key = %key,
                    error = %e,
                    backup = %backend.location(&backup).display(),
                    "saved views are corrupt, starting empty"
                );
                if let Err(e) = backend.write(&backup, &raw) {
                    tracing::warn!(error = %e, "could not back up corrupt views");
                }
                Vec::new()
            }
        }
    }

    fn persist(&self, next: &[CustomView]) -> Result<()> {
        let payload = serde_json::to_string_pretty(next).map_err(FacetsError::Serialization)?;
        self.backend.write(&self.key, &payload)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn views(&self) -> &[CustomView] {
        &self.views
    }

    /// The active view, if any.
    /// The storage backend the views are persisted to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn current(&self) -> Option<&CustomView> {
        self.current.as_ref()
    }

    pub fn get(&self, id: &str) -> Option<&CustomView> {
        self.views.iter().find(|v| v.id == id)
    }

    /// First view whose name matches, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&CustomView> {
        let name = name.trim();
        self.views
            .iter()
            .find(|v| v.name == name)
            .or_else(|| self.views.iter().find(|v| v.name.eq_ignore_ascii_case(name)))
    }

    /// Look a view up by id, then by name.
    pub fn resolve(&self, id_or_name: &str) -> Result<&CustomView> {
        self.get(id_or_name)
            .or_else(|| self.find_by_name(id_or_name))
            .ok_or_else(|| FacetsError::ViewNotFound(id_or_name.to_string()))
    }

    /// Save `state` as a new view and make it the active one.
    pub fn save(&mut self, name: &str, state: &EditingState) -> Result<CustomView> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FacetsError::Api("View name cannot be empty".to_string()));
        }

        let now = Utc::now();
        let mut filters = state.filters.rules().to_vec();
        strip_reserved(&mut filters);
        let view = CustomView {
            id: generate_view_id(now.timestamp_millis()),
            name: name.to_string(),
            filters,
            sorting: state.sorting.clone(),
            show_status_filter: state.show_status_filter,
            selected_cms_type: state.selected_cms_type.clone(),
            created_at: now,
            updated_at: now,
        };

        let mut next = self.views.clone();
        next.push(view.clone());
        self.persist(&next)?;
        self.views = next;
        self.current = Some(view.clone());

        tracing::info!(id = %view.id, name = %view.name, "saved view");
        Ok(view)
    }

    /// Merge `patch` into the view `id` and bump its `updated_at`.
    pub fn update(&mut self, id: &str, patch: &ViewPatch) -> Result<CustomView> {
        let index = self
            .views
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| FacetsError::ViewNotFound(id.to_string()))?;

        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(FacetsError::Api("View name cannot be empty".to_string()));
            }
        }

        let mut updated = self.views[index].clone();
        updated.apply(patch);
        updated.name = updated.name.trim().to_string();
        strip_reserved(&mut updated.filters);
        updated.updated_at = Utc::now();

        let mut next = self.views.clone();
        next[index] = updated.clone();
        self.persist(&next)?;
        self.views = next;

        if let Some(current) = &mut self.current {
            if current.id == updated.id {
                *current = updated.clone();
            }
        }

        tracing::info!(id = %updated.id, name = %updated.name, "updated view");
        Ok(updated)
    }

    /// Remove the view `id`. Clears the active view if it was this one.
    pub fn delete(&mut self, id: &str) -> Result<CustomView> {
        let index = self
            .views
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| FacetsError::ViewNotFound(id.to_string()))?;

        let mut next = self.views.clone();
        let removed = next.remove(index);
        self.persist(&next)?;
        self.views = next;

        if self.current.as_ref().is_some_and(|c| c.id == removed.id) {
            self.current = None;
        }

        tracing::info!(id = %removed.id, name = %removed.name, "deleted view");
        Ok(removed)
    }

    /// Make `view` the active one. The store is not touched.
    pub fn load(&mut self, view: &CustomView) {
        self.current = Some(view.clone());
    }

    pub fn load_by_id(&mut self, id: &str) -> Result<&CustomView> {
        let view = self
            .get(id)
            .cloned()
            .ok_or_else(|| FacetsError::ViewNotFound(id.to_string()))?;
        Ok(self.current.insert(view))
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }
}

fn strip_reserved(filters: &mut Vec<FilterRule>) {
    let before = filters.len();
    filters.retain(|rule| !rule.is_reserved());
    if filters.len() != before {
        tracing::debug!(dropped = before - filters.len(), "dropped auto-generated rules from view");
    }
}

/// `view-<millis>-<9 char suffix>`.
fn generate_view_id(millis: i64) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("view-{}-{}", millis, &suffix[..9])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{ChoiceOp, Condition, TextOp, STATUS_AUTO_ID};
    use crate::sort::{SortDirection, SortRule, SortState};
    use crate::store::mem_backend::MemBackend;
    use crate::sync::FilterSet;

    const KEY: &str = "content-custom-views";

    fn state() -> EditingState {
        EditingState {
            filters: FilterSet::from(vec![FilterRule::new(
                "r1",
                "title",
                Condition::Text(TextOp::Contains("guide".into())),
            )]),
            sorting: SortState::by(SortRule::new("title", SortDirection::Asc)),
            show_status_filter: false,
            selected_cms_type: None,
        }
    }

    fn store() -> ViewStore<MemBackend> {
        ViewStore::open(MemBackend::new(), KEY)
    }

    #[test]
    fn test_save_sets_current_and_persists() {
        let mut store = store();
        let view = store.save("  My View ", &state()).unwrap();

        assert_eq!(view.name, "My View");
        assert!(view.id.starts_with("view-"));
        assert_eq!(view.created_at, view.updated_at);
        assert_eq!(store.current().map(|v| v.id.as_str()), Some(view.id.as_str()));

        let raw = store.backend().read(KEY).unwrap().unwrap();
        let on_disk: Vec<CustomView> = serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk, vec![view]);
    }

    #[test]
    fn test_view_id_shape() {
        let id = generate_view_id(1736900000000);
        let parts: Vec<&str> = id.splitn(3, '-').collect();
        assert_eq!(parts[0], "view");
        assert_eq!(parts[1], "1736900000000");
        assert_eq!(parts[2].len(), 9);
        assert_ne!(generate_view_id(1), generate_view_id(1));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut store = store();
        assert!(matches!(store.save("   ", &state()), Err(FacetsError::Api(_))));
        assert!(store.views().is_empty());
    }

    #[test]
    fn test_update_mirrors_current() {
        let mut store = store();
        let view = store.save("Drafts", &state()).unwrap();

        let mut edited = state();
        edited.show_status_filter = true;
        let updated = store.update(&view.id, &ViewPatch::from_state(&edited)).unwrap();

        assert_eq!(updated.name, "Drafts");
        assert!(updated.show_status_filter);
        assert!(updated.updated_at >= view.updated_at);
        assert_eq!(updated.created_at, view.created_at);
        assert_eq!(store.current(), Some(&updated));
        assert!(!edited.is_dirty(store.current().unwrap()));
    }

    #[test]
    fn test_update_other_view_leaves_current() {
        let mut store = store();
        let first = store.save("First", &state()).unwrap();
        let second = store.save("Second", &state()).unwrap();
        store.load(&first);

        store.update(&second.id, &ViewPatch::rename("Renamed")).unwrap();

        assert_eq!(store.current().unwrap().name, "First");
        assert_eq!(store.get(&second.id).unwrap().name, "Renamed");
    }

    #[test]
    fn test_unknown_id_errors() {
        let mut store = store();
        assert!(matches!(
            store.update("nope", &ViewPatch::rename("x")),
            Err(FacetsError::ViewNotFound(_))
        ));
        assert!(matches!(store.delete("nope"), Err(FacetsError::ViewNotFound(_))));
        assert!(matches!(store.load_by_id("nope"), Err(FacetsError::ViewNotFound(_))));
    }

    #[test]
    fn test_delete_clears_current() {
        let mut store = store();
        let view = store.save("Gone", &state()).unwrap();
        store.delete(&view.id).unwrap();
        assert!(store.current().is_none());
        assert!(store.views().is_empty());
        assert_eq!(store.backend().read(KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_delete_other_keeps_current() {
        let mut store = store();
        let keep = store.save("Keep", &state()).unwrap();
        let other = store.save("Other", &state()).unwrap();
        store.load_by_id(&keep.id).unwrap();
        store.delete(&other.id).unwrap();
        assert_eq!(store.current().map(|v| v.id.clone()), Some(keep.id));
    }

    #[test]
    fn test_load_does_not_touch_store() {
        let mut store = store();
        let view = store.save("V", &state()).unwrap();
        store.clear_current();
        let before = store.backend().read(KEY).unwrap();

        store.load(&view);

        assert_eq!(store.current(), Some(&view));
        assert_eq!(store.backend().read(KEY).unwrap(), before);
    }

    #[test]
    fn test_write_failure_leaves_state_unchanged() {
        let mut store = store();
        let view = store.save("Stable", &state()).unwrap();
        store.backend().set_simulate_write_error(true);

        assert!(store.save("New", &state()).is_err());
        assert!(store.update(&view.id, &ViewPatch::rename("Changed")).is_err());
        assert!(store.delete(&view.id).is_err());

        assert_eq!(store.views(), &[view.clone()]);
        assert_eq!(store.current(), Some(&view));
    }

    #[test]
    fn test_reopen_sees_latest_state() {
        let backend = MemBackend::new();
        let mut store = ViewStore::open(backend, KEY);
        let view = store.save("Persisted", &state()).unwrap();

        let reopened = ViewStore::open(store.backend, KEY);
        assert_eq!(reopened.views(), &[view]);
        assert!(reopened.current().is_none());
    }

    #[test]
    fn test_corrupt_payload_opens_empty_and_is_backed_up() {
        let backend = MemBackend::new();
        backend.insert_raw(KEY, "{not json");
        let store = ViewStore::open(backend, KEY);

        assert!(store.views().is_empty());
        let backup = store.backend().read(&format!("{}.corrupt", KEY)).unwrap();
        assert_eq!(backup.as_deref(), Some("{not json"));
    }

    #[test]
    fn test_missing_fields_treated_as_corrupt() {
        let backend = MemBackend::new();
        backend.insert_raw(KEY, r#"[{"id": "view-1-x", "filters": []}]"#);
        let store = ViewStore::open(backend, KEY);
        assert!(store.views().is_empty());
    }

    #[test]
    fn test_reserved_rules_never_persisted() {
        let mut store = store();
        let mut with_synthetic = state();
        with_synthetic.filters = FilterSet::from(vec![
            FilterRule::new(STATUS_AUTO_ID, "status", Condition::Choice(ChoiceOp::Is("Draft".into()))),
            FilterRule::new("r1", "title", Condition::Text(TextOp::Contains("guide".into()))),
        ]);
        let view = store.save("No synthetic", &with_synthetic).unwrap();
        assert_eq!(view.filters.len(), 1);
        assert_eq!(view.filters[0].id, "r1");
    }

    #[test]
    fn test_resolve_by_id_then_name() {
        let mut store = store();
        let view = store.save("Weekly Review", &state()).unwrap();
        assert_eq!(store.resolve(&view.id).unwrap().id, view.id);
        assert_eq!(store.resolve("weekly review").unwrap().id, view.id);
        assert!(matches!(store.resolve("missing"), Err(FacetsError::ViewNotFound(_))));
    }
}
