//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for facets operations, whatever UI sits on top.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (rule and sort expressions, view ids or names)
//! - **Returns structured types** (`Result<CmdResult>`, [`QueryOutput`])
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Terminal I/O**: No stdout, stderr, or formatting
//!
//! ## Expressions
//!
//! CLI-style clients describe state as strings:
//!
//! - Rules: `field:operator[:value]`, see [`parse_rule_expr`]
//! - Sort: `field[:asc|desc]`, see [`parse_sort_expr`]
//!
//! [`FacetsApi::editing_state`] turns a set of these into an [`EditingState`].
//!
//! ## Generic Over StorageBackend
//!
//! `FacetsApi<B: StorageBackend>` is generic over the view storage:
//! - Production: `FacetsApi<FsBackend>`
//! - Testing: `FacetsApi<MemBackend>`

use crate::commands::{self, fields::FieldInfo, query::QueryOutput, CmdResult};
use crate::error::{FacetsError, Result};
use crate::filter::{parse_rule_expr, EvalContext};
use crate::ingest::{parse_records, Directory};
use crate::model::Record;
use crate::registry::FieldRegistry;
use crate::sort::{parse_sort_expr, SortState};
use crate::store::{StorageBackend, ViewStore};
use crate::sync::{ContentTab, FilterSet};
use crate::views::{EditingState, ViewPatch};
use std::fs;
use std::path::Path;

/// The main API facade for facets operations.
pub struct FacetsApi<B: StorageBackend> {
    store: ViewStore<B>,
    registry: FieldRegistry,
}

impl<B: StorageBackend> FacetsApi<B> {
    pub fn new(store: ViewStore<B>, registry: FieldRegistry) -> Self {
        Self { store, registry }
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn store(&self) -> &ViewStore<B> {
        &self.store
    }

    /// Build editing state from CLI-style expressions.
    pub fn editing_state<S: AsRef<str>>(
        &self,
        filters: &[S],
        sort: Option<&str>,
        show_status_filter: bool,
        cms_type: Option<&str>,
    ) -> Result<EditingState> {
        let mut set = FilterSet::new();
        for expr in filters {
            let rule = parse_rule_expr(expr.as_ref(), &self.registry)?;
            set.add(rule, &self.registry)?;
        }
        let sorting = match sort {
            Some(expr) => SortState::by(parse_sort_expr(expr, &self.registry)?),
            None => SortState::none(),
        };
        Ok(EditingState {
            filters: set,
            sorting,
            show_status_filter,
            selected_cms_type: cms_type.filter(|t| !t.is_empty()).map(str::to_string),
        })
    }

    /// Read records from a JSON file of records or API posts.
    pub fn load_records(&self, path: &Path) -> Result<Vec<Record>> {
        let raw = fs::read_to_string(path).map_err(FacetsError::Io)?;
        parse_records(&raw, &Directory::default())
    }

    pub fn query<'a>(
        &self,
        records: &'a [Record],
        editing: &EditingState,
        tab: ContentTab,
        ctx: &EvalContext,
    ) -> Result<QueryOutput<'a>> {
        commands::query::run(records, editing, tab, &self.registry, ctx)
    }

    pub fn fields(&self) -> Vec<FieldInfo> {
        commands::fields::list(&self.registry)
    }

    pub fn list_views(&self) -> CmdResult {
        commands::views::list(&self.store)
    }

    pub fn show_view(&self, id_or_name: &str) -> Result<CmdResult> {
        commands::views::show(&self.store, id_or_name)
    }

    pub fn save_view(&mut self, name: &str, state: &EditingState) -> Result<CmdResult> {
        commands::views::save(&mut self.store, name, state)
    }

    pub fn update_view(&mut self, id_or_name: &str, patch: &ViewPatch) -> Result<CmdResult> {
        commands::views::update(&mut self.store, id_or_name, patch)
    }

    pub fn delete_view(&mut self, id_or_name: &str) -> Result<CmdResult> {
        commands::views::delete(&mut self.store, id_or_name)
    }

    /// Make a saved view active and return the state it restores.
    ///
    /// Stored rules are checked against the registry first; a view with a
    /// rule the registry rejects is not made active.
    pub fn load_view(&mut self, id_or_name: &str) -> Result<EditingState> {
        let view = self.store.resolve(id_or_name)?;
        for rule in &view.filters {
            self.registry.validate(rule)?;
        }
        let id = view.id.clone();
        let view = self.store.load_by_id(&id)?;
        Ok(EditingState::from_view(view))
    }
}
