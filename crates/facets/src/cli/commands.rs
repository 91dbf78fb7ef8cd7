//! # CLI Layer
//!
//! This module is **one possible UI client** for facets, it is not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the log subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Resolve the data directory, load config, open the view store
//! 3. **Dispatch**: Route commands to the API facade
//! 4. **Output Formatting**: Tables via `print.rs`, or JSON with `--json`
//! 5. **Error Handling**: Errors bubble up to `main`, which prints them and exits 1
//!
//! ## Logging
//!
//! Log lines go to stderr. The filter comes from `FACETS_LOG`, then
//! `RUST_LOG`, and defaults to `warn`. `--verbose` forces `debug`.

use super::print::{
    print_fields, print_json, print_messages, print_query, print_view_detail, print_views,
};
use super::setup::{Cli, Commands, ConfigCommands, StateArgs, ViewCommands};
use clap::Parser;
use clapfig::{Clapfig, ConfigAction, SearchMode, SearchPath};
use facetsapp::api::FacetsApi;
use facetsapp::commands::query::StatusCounts;
use facetsapp::config::FacetsConfig;
use facetsapp::error::{FacetsError, Result};
use facetsapp::filter::{EvalContext, FilterRule};
use facetsapp::init::{config_search_paths, default_data_dir, initialize, CONFIG_FILE};
use facetsapp::model::Record;
use facetsapp::sort::SortState;
use facetsapp::store::StorageBackend;
use facetsapp::sync::{ContentTab, TabState};
use facetsapp::views::{EditingState, ViewPatch};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Config goes straight to clapfig and never opens the view store
    if let Commands::Config { action } = &cli.command {
        return handle_config_command(action.as_ref(), cli.data.as_ref());
    }

    let mut ctx = initialize(cli.data.clone());
    let default_tab = ctx.config.default_tab();

    match cli.command {
        Commands::List {
            records,
            state,
            tab,
            section,
            view,
            json,
        } => handle_list(
            &mut ctx.api,
            ListArgs {
                records: &records,
                state: &state,
                tab: tab.as_deref(),
                section: section.as_deref(),
                view: view.as_deref(),
                json,
            },
            default_tab,
        ),
        Commands::Fields { json } => handle_fields(&ctx.api, json),
        Commands::Views { action } => {
            handle_views(&mut ctx.api, action.unwrap_or(ViewCommands::List), default_tab)
        }
        Commands::Config { .. } => Ok(()),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("FACETS_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

struct ListArgs<'a> {
    records: &'a Path,
    state: &'a StateArgs,
    tab: Option<&'a str>,
    section: Option<&'a str>,
    view: Option<&'a str>,
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListJson<'a> {
    tab: ContentTab,
    rules: &'a [FilterRule],
    counts: StatusCounts,
    records: &'a [&'a Record],
}

fn handle_list<B: StorageBackend>(
    api: &mut FacetsApi<B>,
    args: ListArgs<'_>,
    default_tab: ContentTab,
) -> Result<()> {
    let base = match args.view {
        Some(view) => Some(api.load_view(view)?),
        None => None,
    };
    let mut state = build_state(api, base, args.state)?;

    let route_tab = args
        .section
        .map(|section| state.apply_route(&TabState::from_route(Some(section), None)));
    let tab = match args.tab {
        Some(tab) => parse_tab(tab)?,
        None => route_tab.unwrap_or(default_tab),
    };

    tracing::debug!(
        %tab,
        rules = state.filters.len(),
        view = args.view.unwrap_or("-"),
        "resolved list state"
    );

    let records = api.load_records(args.records)?;
    let output = api.query(&records, &state, tab, &EvalContext::local())?;

    if args.json {
        print_json(&ListJson {
            tab,
            rules: &output.rules,
            counts: output.counts,
            records: &output.records,
        })
    } else {
        print_query(&output, tab);
        Ok(())
    }
}

fn handle_fields<B: StorageBackend>(api: &FacetsApi<B>, json: bool) -> Result<()> {
    let fields = api.fields();
    if json {
        print_json(&fields)
    } else {
        print_fields(&fields);
        Ok(())
    }
}

fn handle_views<B: StorageBackend>(
    api: &mut FacetsApi<B>,
    action: ViewCommands,
    default_tab: ContentTab,
) -> Result<()> {
    match action {
        ViewCommands::List => {
            let result = api.list_views();
            print_messages(&result.messages);
            print_views(&result.listed_views);
        }
        ViewCommands::Show { view } => {
            let result = api.show_view(&view)?;
            for view in &result.listed_views {
                print_view_detail(view);
            }
        }
        ViewCommands::Save { name, state, tab } => {
            let editing = build_state(api, None, &state)?;
            let tab = tab.as_deref().map(parse_tab).transpose()?.unwrap_or(default_tab);
            let result = api.save_view(&name, &editing)?;
            print_messages(&result.messages);
            for line in editing.save_preview(tab) {
                println!("  {}", line);
            }
        }
        ViewCommands::Update {
            view,
            name,
            state,
            clear_filters,
            clear_sort,
            no_status_filter,
            clear_cms_type,
        } => {
            let flags = build_state(api, None, &state)?;
            let patch = ViewPatch {
                name,
                filters: (!state.filters.is_empty() || clear_filters)
                    .then(|| flags.filters.rules().to_vec()),
                sorting: if state.sort.is_some() {
                    Some(flags.sorting.clone())
                } else if clear_sort {
                    Some(SortState::none())
                } else {
                    None
                },
                show_status_filter: if state.status_filter {
                    Some(true)
                } else if no_status_filter {
                    Some(false)
                } else {
                    None
                },
                selected_cms_type: if flags.selected_cms_type.is_some() {
                    Some(flags.selected_cms_type.clone())
                } else if clear_cms_type {
                    Some(None)
                } else {
                    None
                },
            };
            let result = api.update_view(&view, &patch)?;
            print_messages(&result.messages);
        }
        ViewCommands::Delete { view } => {
            let result = api.delete_view(&view)?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

/// Turn flags into editing state, layered over `base` when a view was loaded.
///
/// Flag rules are appended to the view's rules. A flag sort or CMS type
/// replaces the view's, and `--status-filter` can only switch the filter on.
fn build_state<B: StorageBackend>(
    api: &FacetsApi<B>,
    base: Option<EditingState>,
    args: &StateArgs,
) -> Result<EditingState> {
    let flags = api.editing_state(
        args.filters.as_slice(),
        args.sort.as_deref(),
        args.status_filter,
        args.cms_type.as_deref(),
    )?;
    let Some(mut state) = base else {
        return Ok(flags);
    };

    for rule in flags.filters.into_rules() {
        state.filters.add(rule, api.registry())?;
    }
    if !flags.sorting.is_empty() {
        state.sorting = flags.sorting;
    }
    state.show_status_filter |= flags.show_status_filter;
    if flags.selected_cms_type.is_some() {
        state.selected_cms_type = flags.selected_cms_type;
    }
    Ok(state)
}

fn parse_tab(tab: &str) -> Result<ContentTab> {
    tab.parse().map_err(FacetsError::Api)
}

/// Run a clapfig config action against `paths`.
fn config_action(paths: Vec<SearchPath>, action: &ConfigAction) -> Result<String> {
    let result = Clapfig::builder::<FacetsConfig>()
        .app_name("facets")
        .file_name(CONFIG_FILE)
        .search_paths(paths)
        .no_env()
        .strict(false)
        .handle(action)
        .map_err(|e| FacetsError::Config(e.to_string()))?;
    Ok(result.to_string())
}

/// Handle the `facets config` subcommand using clapfig directly.
fn handle_config_command(action: Option<&ConfigCommands>, data: Option<&PathBuf>) -> Result<()> {
    let load_paths = config_search_paths(data);
    match action {
        None => {
            // Bare `facets config` shows all resolved values
            let config: FacetsConfig = Clapfig::builder()
                .app_name("facets")
                .file_name(CONFIG_FILE)
                .search_paths(load_paths)
                .search_mode(SearchMode::Merge)
                .no_env()
                .strict(false)
                .load()
                .unwrap_or_default();

            let table =
                toml::Value::try_from(&config).map_err(|e| FacetsError::Config(e.to_string()))?;
            if let toml::Value::Table(t) = table {
                for (k, v) in &t {
                    println!("{} = {}", k, format_toml_value(v));
                }
            }
            Ok(())
        }
        Some(ConfigCommands::Gen { output }) => {
            let action = ConfigAction::Gen {
                output: output.clone(),
            };
            print!("{}", config_action(load_paths, &action)?);
            Ok(())
        }
        Some(ConfigCommands::Get { key }) => {
            let action = ConfigAction::Get {
                key: key.clone(),
                scope: None,
            };
            println!("{}", config_action(load_paths, &action)?);
            Ok(())
        }
        Some(ConfigCommands::Set { key, value }) => {
            // The target dir must be the only path so clapfig writes there
            let target = data.cloned().unwrap_or_else(default_data_dir);
            let action = ConfigAction::Set {
                key: key.clone(),
                value: value.clone(),
                scope: None,
            };
            println!("{}", config_action(vec![SearchPath::Path(target)], &action)?);
            Ok(())
        }
    }
}

/// Format a TOML value for display.
fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => format!("\"{}\"", s),
        toml::Value::Array(a) => toml::to_string(a).unwrap_or_else(|_| format!("{a:?}")),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facetsapp::registry::FieldRegistry;
    use facetsapp::sort::SortDirection;
    use facetsapp::store::{MemBackend, ViewStore};

    fn api() -> FacetsApi<MemBackend> {
        FacetsApi::new(
            ViewStore::open(MemBackend::new(), "views"),
            FieldRegistry::builtin(),
        )
    }

    fn args(filters: &[&str], sort: Option<&str>) -> StateArgs {
        StateArgs {
            filters: filters.iter().map(|s| s.to_string()).collect(),
            sort: sort.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn flags_alone_build_state() {
        let api = api();
        let state = build_state(&api, None, &args(&["status:is:Draft"], Some("title"))).unwrap();
        assert_eq!(state.filters.len(), 1);
        assert_eq!(state.sorting.rule().unwrap().field, "title");
    }

    #[test]
    fn flags_layer_over_view_state() {
        let api = api();
        let base = build_state(&api, None, &args(&["status:is:Draft"], Some("title"))).unwrap();
        let base = EditingState {
            show_status_filter: true,
            ..base
        };

        let state = build_state(
            &api,
            Some(base),
            &args(&["tags:contains:new"], Some("publishedAt:desc")),
        )
        .unwrap();
        assert_eq!(state.filters.len(), 2);
        assert_eq!(state.filters.rules()[0].field, "status");
        assert_eq!(state.sorting.rule().unwrap().direction, SortDirection::Desc);
        assert!(state.show_status_filter);
    }

    #[test]
    fn empty_flags_keep_view_state() {
        let api = api();
        let base = build_state(&api, None, &args(&["status:is:Draft"], Some("title"))).unwrap();
        let state = build_state(&api, Some(base.clone()), &StateArgs::default()).unwrap();
        assert_eq!(state, base);
    }

    #[test]
    fn tab_names_parse() {
        assert_eq!(parse_tab("drafts").unwrap(), ContentTab::Drafts);
        assert!(matches!(parse_tab("archived"), Err(FacetsError::Api(_))));
    }

    #[test]
    fn toml_values_format() {
        assert_eq!(format_toml_value(&toml::Value::String("x".into())), "\"x\"");
        assert_eq!(format_toml_value(&toml::Value::Boolean(true)), "true");
    }
}
