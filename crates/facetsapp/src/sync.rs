//! # Tab and CMS-Type Synchronization
//!
//! The content table has two selectors outside the rule list: the status tab
//! (with its "show status filter" switch) and the CMS type chosen from the
//! sidebar. Both act as filters. Rather than writing them into the user's
//! rule list, they are synthesized on the fly:
//!
//! ```text
//! user rules ─┬──────────────────────────────► displayed / effective rules
//!             │                                ▲
//! selectors ──┴─► synthetic status / cms rule ─┘  (only if no user rule
//!                                                   targets that field)
//! ```
//!
//! Synthetic rules carry reserved ids ([`STATUS_AUTO_ID`],
//! [`CMS_TYPE_AUTO_ID`]) and are never persisted; a saved view stores the
//! selectors instead. They cannot be removed through [`FilterSet`].

use crate::error::{FacetsError, Result};
use crate::filter::{
    is_reserved_id, ChoiceOp, Condition, FilterRule, CMS_TYPE_AUTO_ID, STATUS_AUTO_ID,
};
use crate::registry::FieldRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status tabs of the content table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentTab {
    #[default]
    All,
    Published,
    Scheduled,
    Drafts,
    Pending,
}

impl ContentTab {
    pub const ALL: [ContentTab; 5] = [
        ContentTab::All,
        ContentTab::Published,
        ContentTab::Scheduled,
        ContentTab::Drafts,
        ContentTab::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentTab::All => "all",
            ContentTab::Published => "published",
            ContentTab::Scheduled => "scheduled",
            ContentTab::Drafts => "drafts",
            ContentTab::Pending => "pending",
        }
    }

    /// The record status this tab shows. `All` falls back to `Published`.
    pub fn status_name(&self) -> &'static str {
        match self {
            ContentTab::Scheduled => "Schedule",
            ContentTab::Drafts => "Draft",
            ContentTab::Pending => "Pending review",
            ContentTab::Published | ContentTab::All => "Published",
        }
    }
}

impl fmt::Display for ContentTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentTab {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ContentTab::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown tab '{}', expected one of: all, published, scheduled, drafts, pending",
                    s
                )
            })
    }
}

/// Selector state derived from the dashboard route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabState {
    pub tab: ContentTab,
    pub show_status_filter: bool,
    pub selected_cms_type: Option<String>,
}

/// Route sections that are not CMS types.
const NON_TYPE_SECTIONS: &[&str] = &["all", "activity", "inbox", "scheduled", "draft"];

impl TabState {
    /// Derive selectors from `/content/:section?status=...`.
    ///
    /// A `scheduled` or `draft` section (or status parameter) opens that tab
    /// with the status filter shown. Any other section names a CMS type.
    pub fn from_route(section: Option<&str>, status: Option<&str>) -> Self {
        let selected_cms_type = section
            .filter(|s| !s.is_empty() && !NON_TYPE_SECTIONS.contains(s))
            .map(str::to_string);

        let tab = match (section, status) {
            (Some("scheduled"), _) => Some(ContentTab::Scheduled),
            (Some("draft"), _) => Some(ContentTab::Drafts),
            (_, Some("scheduled")) => Some(ContentTab::Scheduled),
            (_, Some("draft")) => Some(ContentTab::Drafts),
            _ => None,
        };

        TabState {
            tab: tab.unwrap_or_default(),
            show_status_filter: tab.is_some(),
            selected_cms_type,
        }
    }
}

/// Title-case a CMS type as it appears on records (`"article"` -> `"Article"`).
pub fn cms_type_value(cms_type: &str) -> String {
    let mut chars = cms_type.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticSource {
    StatusTab,
    CmsType,
}

/// A rule as shown in the filter bar.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayedRule<'a> {
    User(&'a FilterRule),
    Synthetic {
        source: SyntheticSource,
        rule: FilterRule,
    },
}

impl DisplayedRule<'_> {
    pub fn rule(&self) -> &FilterRule {
        match self {
            DisplayedRule::User(rule) => rule,
            DisplayedRule::Synthetic { rule, .. } => rule,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, DisplayedRule::Synthetic { .. })
    }
}

fn synthetic_rules(
    user: &[FilterRule],
    tab: ContentTab,
    show_status_filter: bool,
    cms_type: Option<&str>,
) -> Vec<(SyntheticSource, FilterRule)> {
    let targets = |field: &str| user.iter().any(|r| r.field == field);
    let mut out = Vec::new();

    if show_status_filter && !targets("status") {
        out.push((
            SyntheticSource::StatusTab,
            FilterRule::new(
                STATUS_AUTO_ID,
                "status",
                Condition::Choice(ChoiceOp::Is(tab.status_name().to_string())),
            ),
        ));
    }

    if let Some(cms_type) = cms_type.filter(|t| !t.is_empty()) {
        if !targets("cmsModel") {
            out.push((
                SyntheticSource::CmsType,
                FilterRule::new(
                    CMS_TYPE_AUTO_ID,
                    "cmsModel",
                    Condition::Choice(ChoiceOp::Is(cms_type_value(cms_type))),
                ),
            ));
        }
    }
    out
}

/// User rules followed by the synthesized selector rules.
pub fn displayed_rules<'a>(
    user: &'a [FilterRule],
    tab: ContentTab,
    show_status_filter: bool,
    cms_type: Option<&str>,
) -> Vec<DisplayedRule<'a>> {
    user.iter()
        .map(DisplayedRule::User)
        .chain(
            synthetic_rules(user, tab, show_status_filter, cms_type)
                .into_iter()
                .map(|(source, rule)| DisplayedRule::Synthetic { source, rule }),
        )
        .collect()
}

/// The rule list to evaluate: what [`displayed_rules`] shows, owned.
pub fn effective_rules(
    user: &[FilterRule],
    tab: ContentTab,
    show_status_filter: bool,
    cms_type: Option<&str>,
) -> Vec<FilterRule> {
    let mut rules = user.to_vec();
    rules.extend(
        synthetic_rules(user, tab, show_status_filter, cms_type)
            .into_iter()
            .map(|(_, rule)| rule),
    );
    rules
}

/// The user's editable rule list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    rules: Vec<FilterRule>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<FilterRule> {
        self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Append a rule after checking it against the registry.
    pub fn add(&mut self, rule: FilterRule, registry: &FieldRegistry) -> Result<()> {
        if rule.is_reserved() {
            return Err(FacetsError::ReservedRuleId(rule.id));
        }
        registry.validate(&rule)?;
        rule.condition.check_values()?;
        self.rules.push(rule);
        Ok(())
    }

    /// Replace the condition of rule `id`. Returns whether a rule was found.
    pub fn update(&mut self, id: &str, condition: Condition, registry: &FieldRegistry) -> Result<bool> {
        if is_reserved_id(id) {
            return Err(FacetsError::ReservedRuleId(id.to_string()));
        }
        let Some(rule) = self.rules.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        let candidate = FilterRule::new(rule.id.clone(), rule.field.clone(), condition);
        registry.validate(&candidate)?;
        candidate.condition.check_values()?;
        *rule = candidate;
        Ok(true)
    }

    /// Remove rule `id`. Reserved ids are ignored.
    pub fn remove(&mut self, id: &str) {
        if is_reserved_id(id) {
            return;
        }
        self.rules.retain(|r| r.id != id);
    }

    pub fn clear_all(&mut self) {
        self.rules.clear();
    }
}

impl From<Vec<FilterRule>> for FilterSet {
    fn from(rules: Vec<FilterRule>) -> Self {
        Self { rules }
    }
}
