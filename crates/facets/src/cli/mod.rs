//! # CLI Behavior
//!
//! This is **one possible UI client** for facets, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ## Table State From Flags
//!
//! The dashboard keeps its state in a filter bar and a sidebar. Here the same
//! state is spelled out as flags, shared by `list`, `views save` and
//! `views update`:
//!
//! - `--filter field:operator[:value]` (repeatable) adds a user rule
//! - `--sort field[:asc|desc]` sets the single sort rule
//! - `--status-filter` shows the status tab as a rule
//! - `--cms-type TYPE` selects a CMS type section
//!
//! `list` also takes `--tab`, `--section` (a dashboard route section such as
//! `draft` or `article`) and `--view`. A loaded view is the starting state and
//! flags are layered on top of it.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup, dispatch, per-command handlers
//! - `print`: Tables, messages, view details
//! - `setup`: Argument parsing via clap, help text
//! - `styles`: Terminal styling constants

mod commands;
mod print;
pub mod setup;
mod styles;

pub use commands::run;
