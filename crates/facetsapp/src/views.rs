//! # Saved Views
//!
//! A [`CustomView`] is a named snapshot of the table's editing state: the user
//! rules, the sort, and the two selectors. The live state the user is working
//! on is an [`EditingState`]; comparing the two tells whether the active view
//! has unsaved changes.
//!
//! Views never contain synthetic rules. The selectors are stored instead and
//! the synthetic rules are rebuilt when the view is applied.
//!
//! ## On Disk
//!
//! ```json
//! {
//!   "id": "view-1736900000000-k3j9x0a2b",
//!   "name": "Drafts needing review",
//!   "filters": [ { "id": "...", "field": "status", ... } ],
//!   "sorting": [ { "field": "publishedAt", "direction": "desc" } ],
//!   "showStatusFilter": false,
//!   "selectedCmsType": "article",
//!   "createdAt": "2025-01-15T09:30:00.000Z",
//!   "updatedAt": "2025-01-15T09:30:00.000Z"
//! }
//! ```

use crate::filter::FilterRule;
use crate::sort::SortState;
use crate::sync::{ContentTab, FilterSet, TabState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomView {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub filters: Vec<FilterRule>,
    #[serde(default)]
    pub sorting: SortState,
    #[serde(default)]
    pub show_status_filter: bool,
    #[serde(default)]
    pub selected_cms_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

impl CustomView {
    /// One-line description for view lists: "2 filters, sorted, cms type".
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.filters.is_empty() {
            parts.push(plural(self.filters.len(), "filter"));
        }
        if !self.sorting.is_empty() {
            parts.push("sorted".to_string());
        }
        if self.show_status_filter {
            parts.push("status".to_string());
        }
        if self.selected_cms_type.is_some() {
            parts.push("cms type".to_string());
        }
        if parts.is_empty() {
            "no filters".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Copy fields from `patch`. Timestamps are the caller's business.
    pub(crate) fn apply(&mut self, patch: &ViewPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(filters) = &patch.filters {
            self.filters = filters.clone();
        }
        if let Some(sorting) = &patch.sorting {
            self.sorting = sorting.clone();
        }
        if let Some(show) = patch.show_status_filter {
            self.show_status_filter = show;
        }
        if let Some(cms_type) = &patch.selected_cms_type {
            self.selected_cms_type = cms_type.clone();
        }
    }
}

/// A partial update to a saved view. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewPatch {
    pub name: Option<String>,
    pub filters: Option<Vec<FilterRule>>,
    pub sorting: Option<SortState>,
    pub show_status_filter: Option<bool>,
    /// `Some(None)` clears the selected type.
    pub selected_cms_type: Option<Option<String>>,
}

impl ViewPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Overwrite the view's state with `state`, keeping its name.
    pub fn from_state(state: &EditingState) -> Self {
        Self {
            name: None,
            filters: Some(state.filters.rules().to_vec()),
            sorting: Some(state.sorting.clone()),
            show_status_filter: Some(state.show_status_filter),
            selected_cms_type: Some(state.selected_cms_type.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The table state being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditingState {
    pub filters: FilterSet,
    pub sorting: SortState,
    pub show_status_filter: bool,
    pub selected_cms_type: Option<String>,
}

impl EditingState {
    /// The state a view restores ("discard changes").
    pub fn from_view(view: &CustomView) -> Self {
        Self {
            filters: FilterSet::from(view.filters.clone()),
            sorting: view.sorting.clone(),
            show_status_filter: view.show_status_filter,
            selected_cms_type: view.selected_cms_type.clone(),
        }
    }

    /// Reset rules, sort and selectors.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Take the selectors from a dashboard route. Returns the route's tab.
    ///
    /// A route without a status section leaves `show_status_filter` alone.
    pub fn apply_route(&mut self, route: &TabState) -> ContentTab {
        if route.show_status_filter {
            self.show_status_filter = true;
        }
        if route.selected_cms_type.is_some() {
            self.selected_cms_type = route.selected_cms_type.clone();
        }
        route.tab
    }

    /// Whether this state differs from `view`. Rule order matters.
    pub fn is_dirty(&self, view: &CustomView) -> bool {
        self.filters.rules() != view.filters.as_slice()
            || self.sorting != view.sorting
            || self.show_status_filter != view.show_status_filter
            || self.selected_cms_type != view.selected_cms_type
    }

    /// Whether there is anything worth saving as a view.
    ///
    /// A CMS type on its own is just a sidebar section, not a view.
    pub fn has_active_state(&self) -> bool {
        !self.filters.is_empty() || !self.sorting.is_empty() || self.show_status_filter
    }

    /// Lines describing what saving this state would store.
    pub fn save_preview(&self, tab: ContentTab) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.filters.is_empty() {
            lines.push(plural(self.filters.len(), "filter"));
        }
        if let Some(rule) = self.sorting.rule() {
            lines.push(format!("Sort by {} ({})", rule.field, rule.direction));
        }
        if self.show_status_filter {
            lines.push(format!("Status filter: {}", tab.status_name()));
        }
        if let Some(cms_type) = &self.selected_cms_type {
            lines.push(format!("CMS type: {}", cms_type));
        }
        lines
    }
}
