//! # Facets Architecture
//!
//! Facets is a **UI-agnostic filter, sort and saved-view engine** for content
//! tables. It is a library that happens to have a CLI client, not the other
//! way around.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/facets)                                  │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Parses rule/sort expressions, resolves view names        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Query pipeline, view management, field listing           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────┐ ┌────────────────────────────┐
//! │  Engine                      │ │  Storage Layer (store/)    │
//! │  registry, filter, sort,     │ │  StorageBackend trait      │
//! │  sync, views                 │ │  FsBackend, MemBackend     │
//! └──────────────────────────────┘ └────────────────────────────┘
//! ```
//!
//! ## Key Principle: Pure Engine, Caller-Owned State
//!
//! The engine functions (`filter::apply_filters`, `sort::apply_sort`,
//! `sync::effective_rules`) are pure: they take the records and the current
//! state and return results without mutating either. The caller owns the
//! [`views::EditingState`] and calls the engine on every change. Only the
//! [`store::ViewStore`] holds state of its own.
//!
//! ## Invalid Rules Are Unrepresentable
//!
//! A rule's operator and value live in a per-type [`filter::Condition`], so a
//! date operator on a text field cannot be built. Unknown operators fail when
//! a rule is decoded or parsed, never silently at evaluation time.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Query, view and field commands
//! - [`registry`]: Fields, types and their legal operators
//! - [`filter`]: Rules and the predicate evaluator
//! - [`sort`]: Single-column sorting
//! - [`sync`]: Status tab and CMS type synthetic rules, the editable rule set
//! - [`views`]: Saved views and editing state
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Content records
//! - [`ingest`]: Mapping API posts to records
//! - [`config`]: Configuration management
//! - [`init`]: Data directory resolution and context setup
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod init;
pub mod model;
pub mod registry;
pub mod sort;
pub mod store;
pub mod sync;
pub mod views;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
