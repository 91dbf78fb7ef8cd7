//! Saved view commands.
//!
//! Views are addressed by id or by name (see [`ViewStore::resolve`]).

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{StorageBackend, ViewStore};
use crate::views::{EditingState, ViewPatch};

pub fn list<B: StorageBackend>(store: &ViewStore<B>) -> CmdResult {
    let views = store.views().to_vec();
    let mut result = CmdResult::default();
    if views.is_empty() {
        result.add_message(CmdMessage::info("No saved views"));
    }
    result.with_listed_views(views)
}

pub fn show<B: StorageBackend>(store: &ViewStore<B>, id_or_name: &str) -> Result<CmdResult> {
    let view = store.resolve(id_or_name)?.clone();
    Ok(CmdResult::default().with_listed_views(vec![view]))
}

/// Save `state` under `name`. Duplicate names are allowed but flagged.
pub fn save<B: StorageBackend>(
    store: &mut ViewStore<B>,
    name: &str,
    state: &EditingState,
) -> Result<CmdResult> {
    let duplicate = store.find_by_name(name).is_some();
    let view = store.save(name, state)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Saved view '{}'", view.name)));
    if duplicate {
        result.add_message(CmdMessage::warning(format!(
            "Another view is already named '{}'; use the id to tell them apart",
            view.name
        )));
    }
    Ok(result.with_affected_views(vec![view]))
}

pub fn update<B: StorageBackend>(
    store: &mut ViewStore<B>,
    id_or_name: &str,
    patch: &ViewPatch,
) -> Result<CmdResult> {
    let id = store.resolve(id_or_name)?.id.clone();
    let mut result = CmdResult::default();
    if patch.is_empty() {
        result.add_message(CmdMessage::info("Nothing to update"));
        let view = store.resolve(&id)?.clone();
        return Ok(result.with_affected_views(vec![view]));
    }

    let view = store.update(&id, patch)?;
    result.add_message(CmdMessage::success(format!("Updated view '{}'", view.name)));
    Ok(result.with_affected_views(vec![view]))
}

pub fn delete<B: StorageBackend>(store: &mut ViewStore<B>, id_or_name: &str) -> Result<CmdResult> {
    let id = store.resolve(id_or_name)?.id.clone();
    let view = store.delete(&id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Deleted view '{}'", view.name)));
    Ok(result.with_affected_views(vec![view]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::error::FacetsError;
    use crate::filter::{Condition, FilterRule, TextOp};
    use crate::sort::{SortDirection, SortRule, SortState};
    use crate::store::MemBackend;
    use crate::sync::FilterSet;

    fn store() -> ViewStore<MemBackend> {
        ViewStore::open(MemBackend::new(), "views")
    }

    fn state() -> EditingState {
        EditingState {
            filters: FilterSet::from(vec![FilterRule::new(
                "r1",
                "title",
                Condition::Text(TextOp::Contains("launch".into())),
            )]),
            sorting: SortState::by(SortRule::new("publishedAt", SortDirection::Desc)),
            ..Default::default()
        }
    }

    #[test]
    fn save_then_list_returns_exact_view() {
        let mut store = store();
        save(&mut store, "My View", &state()).unwrap();

        let listed = list(&store).listed_views;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "My View");
        assert_eq!(listed[0].filters, state().filters.into_rules());
        assert_eq!(listed[0].sorting, state().sorting);
    }

    #[test]
    fn empty_list_says_so() {
        let result = list(&store());
        assert!(result.listed_views.is_empty());
        assert_eq!(result.messages[0].content, "No saved views");
    }

    #[test]
    fn duplicate_name_warns() {
        let mut store = store();
        save(&mut store, "Same", &state()).unwrap();
        let result = save(&mut store, "Same", &state()).unwrap();
        assert_eq!(store.views().len(), 2);
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning));
    }

    #[test]
    fn update_and_delete_by_name() {
        let mut store = store();
        save(&mut store, "Weekly", &state()).unwrap();

        let result = update(&mut store, "weekly", &ViewPatch::rename("Monthly")).unwrap();
        assert_eq!(result.affected_views[0].name, "Monthly");

        delete(&mut store, "Monthly").unwrap();
        assert!(store.views().is_empty());
    }

    #[test]
    fn empty_patch_is_noop() {
        let mut store = store();
        let saved = save(&mut store, "Keep", &state()).unwrap().affected_views[0].clone();
        let result = update(&mut store, &saved.id, &ViewPatch::default()).unwrap();
        assert_eq!(result.affected_views[0], saved);
        assert_eq!(result.messages[0].content, "Nothing to update");
    }

    #[test]
    fn unknown_view_errors() {
        let mut store = store();
        assert!(matches!(show(&store, "nope"), Err(FacetsError::ViewNotFound(_))));
        assert!(matches!(delete(&mut store, "nope"), Err(FacetsError::ViewNotFound(_))));
    }
}
