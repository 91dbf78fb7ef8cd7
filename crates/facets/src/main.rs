//! # Facets CLI Architecture
//!
//! Facets ships a command-line client, but the binary is intentionally thin:
//! the CLI lives in `src/cli/`, while this file only invokes `cli::run()` and
//! handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/facetsapp/`: UI-agnostic library: records, rules, views, storage
//! - `crates/facets/`: this CLI tool, depends on the `facetsapp` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/facets/src/cli/)                         │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal rendering (print.rs, styles.rs)                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/facetsapp/src/api.rs)                    │
//! │  - Parses rule and sort expressions                         │
//! │  - Resolves view ids or names                               │
//! │  - Returns structured `CmdResult` / `QueryOutput` values    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (crates/facetsapp/src/commands/*)            │
//! │  - Filtering, sorting, view persistence                     │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward is UI agnostic. The CLI layer owns argument
//! parsing, context initialization, log setup, error reporting and rendering.
//!
//! ## Output Streams
//!
//! Results go to stdout. Diagnostics from `tracing` go to stderr, so
//! `facets list --json | jq` sees clean JSON even with `--verbose`.
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests beside the code and integration tests under
//!   `crates/facetsapp/tests/`.
//! - **CLI**: rendering helpers are unit tested in `print.rs`; the binary is
//!   driven end to end with `assert_cmd` in `tests/cli_e2e.rs`, pointing
//!   `--data` at a temporary directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
