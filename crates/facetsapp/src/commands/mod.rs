//! # Command Layer
//!
//! This module contains the **core business logic** of facets. Each command
//! lives in its own submodule and implements pure Rust functions over the
//! domain types.
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Run the filter and sort pipeline over a record collection
//! - Create, update and delete saved views through a [`ViewStore`](crate::store::ViewStore)
//! - Return structured results with affected views and messages
//! - Are completely UI-agnostic
//!
//! ## What Commands Do NOT Do
//!
//! - **Any I/O** beyond the store: No stdout, stderr, or terminal concerns
//! - **Argument parsing**: That's the CLI layer's job
//! - **Exit codes**: Return `Result`, let the caller decide
//!
//! ## Testing Strategy
//!
//! Command tests use [`MemBackend`](crate::store::MemBackend) to avoid
//! filesystem dependencies and pin the evaluation day with
//! [`EvalContext::on`](crate::filter::EvalContext::on).
//!
//! ## Command Modules
//!
//! - [`query`]: Filter, sort and count records
//! - [`views`]: Saved view management
//! - [`fields`]: Describe the field registry

use crate::views::CustomView;
use serde::Serialize;

pub mod fields;
pub mod query;
pub mod views;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_views: Vec<CustomView>,
    pub listed_views: Vec<CustomView>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_views(mut self, views: Vec<CustomView>) -> Self {
        self.affected_views = views;
        self
    }

    pub fn with_listed_views(mut self, views: Vec<CustomView>) -> Self {
        self.listed_views = views;
        self
    }
}
