#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Env {
    temp: TempDir,
    records: PathBuf,
}

impl Env {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let records = temp.path().join("posts.json");
        fs::write(
            &records,
            r#"[
                {"id": "1", "title": "Live post", "status": "published",
                 "published_at": "2025-01-10T09:00:00Z", "cms_type": "Article",
                 "tags": ["community"]},
                {"id": "2", "title": "Draft post", "status": "draft", "cms_type": "Guide",
                 "tags": [{"name": "new"}]},
                {"id": "3", "title": "Upcoming post", "status": "scheduled",
                 "published_at": "2025-02-01T09:00:00Z", "cms_type": "Article"}
            ]"#,
        )
        .unwrap();
        Self { temp, records }
    }

    fn data(&self) -> &Path {
        self.temp.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("facets"));
        cmd.env("FACETS_DATA", self.data())
            .env_remove("FACETS_LOG")
            .env_remove("RUST_LOG")
            .arg("--data")
            .arg(self.data());
        cmd
    }

    fn list_json(&self, extra: &[&str]) -> Value {
        let output = self
            .cmd()
            .arg("list")
            .arg("--records")
            .arg(&self.records)
            .args(extra)
            .arg("--json")
            .output()
            .unwrap();
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

fn titles(value: &Value) -> Vec<String> {
    value["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn list_without_rules_returns_everything() {
    let env = Env::new();
    let out = env.list_json(&[]);
    assert_eq!(titles(&out), vec!["Live post", "Draft post", "Upcoming post"]);
    assert_eq!(out["counts"]["total"], 3);
    assert_eq!(out["tab"], "all");
}

#[test]
fn list_filters_and_sorts() {
    let env = Env::new();
    let out = env.list_json(&["--filter", "cmsModel:is:Article", "--sort", "title:desc"]);
    assert_eq!(titles(&out), vec!["Upcoming post", "Live post"]);

    let out = env.list_json(&["--filter", "publishedAt:is_empty"]);
    assert_eq!(titles(&out), vec!["Draft post"]);

    let out = env.list_json(&["--filter", "tags:contains:new,community"]);
    assert_eq!(titles(&out), vec!["Live post", "Draft post"]);
}

#[test]
fn status_filter_follows_tab() {
    let env = Env::new();
    let out = env.list_json(&["--status-filter", "--tab", "drafts"]);
    assert_eq!(titles(&out), vec!["Draft post"]);
    let rules = out["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0]["field"], "status");

    let out = env.list_json(&["--section", "scheduled"]);
    assert_eq!(titles(&out), vec!["Upcoming post"]);
    assert_eq!(out["tab"], "scheduled");
}

#[test]
fn cms_type_section_filters_by_type() {
    let env = Env::new();
    let out = env.list_json(&["--cms-type", "guide"]);
    assert_eq!(titles(&out), vec!["Draft post"]);
}

#[test]
fn table_output_lists_titles() {
    let env = Env::new();
    env.cmd()
        .arg("list")
        .arg("--records")
        .arg(&env.records)
        .args(["--filter", "status:is:Published"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Live post"))
        .stdout(predicate::str::contains("Draft post").not());
}

#[test]
fn bad_rule_is_an_error() {
    let env = Env::new();
    env.cmd()
        .arg("list")
        .arg("--records")
        .arg(&env.records)
        .args(["--filter", "nope:is:x"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: Unknown field: nope"));

    env.cmd()
        .arg("list")
        .arg("--records")
        .arg(&env.records)
        .args(["--filter", "locked:contains:x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid for toggle fields"));
}

#[test]
fn fields_lists_registry() {
    let env = Env::new();
    env.cmd()
        .args(["fields"])
        .assert()
        .success()
        .stdout(predicate::str::contains("publishedAt"))
        .stdout(predicate::str::contains("is_relative_to_today"));

    let output = env.cmd().args(["fields", "--json"]).output().unwrap();
    let fields: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(fields
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f["key"] == "tags" && f["fieldType"] == "multi-choice"));
}

#[test]
fn view_lifecycle() {
    let env = Env::new();

    env.cmd()
        .args(["views", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved views"));

    env.cmd()
        .args(["views", "save", "Drafts", "--filter", "status:is:Draft", "--sort", "title"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved view 'Drafts'"))
        .stdout(predicate::str::contains("1 filter"))
        .stdout(predicate::str::contains("Sort by title (asc)"));
    assert!(env.data().join("content-custom-views.json").exists());

    env.cmd()
        .args(["views", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Drafts"))
        .stdout(predicate::str::contains("1 filter, sorted"));

    env.cmd()
        .args(["views", "show", "drafts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("status is Draft"));

    let out = env.list_json(&["--view", "Drafts"]);
    assert_eq!(titles(&out), vec!["Draft post"]);

    env.cmd()
        .args(["views", "update", "Drafts", "--name", "Old drafts", "--clear-sort"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated view 'Old drafts'"));

    env.cmd()
        .args(["views", "show", "Old drafts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sort"))
        .stdout(predicate::str::contains("title (asc)").not());

    env.cmd()
        .args(["views", "delete", "Old drafts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted view 'Old drafts'"));

    env.cmd()
        .args(["views", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved views"));
}

#[test]
fn duplicate_view_names_warn() {
    let env = Env::new();
    env.cmd().args(["views", "save", "Mine"]).assert().success();
    env.cmd()
        .args(["views", "save", "Mine"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already named 'Mine'"));
}

#[test]
fn empty_view_name_is_rejected() {
    let env = Env::new();
    env.cmd()
        .args(["views", "save", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("View name cannot be empty"));
}

#[test]
fn missing_view_is_an_error() {
    let env = Env::new();
    env.cmd()
        .args(["views", "show", "Nope"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("View not found: Nope"));
}

#[test]
fn corrupt_store_lists_empty() {
    let env = Env::new();
    fs::write(env.data().join("content-custom-views.json"), "{not json").unwrap();
    env.cmd()
        .args(["views", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved views"));
    assert!(env.data().join("content-custom-views.corrupt.json").exists());
}

#[test]
fn config_uses_data_dir_file() {
    let env = Env::new();
    fs::write(env.data().join("facets.toml"), "storage_key = \"team-views\"\n").unwrap();

    env.cmd()
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("storage_key = \"team-views\""));

    env.cmd().args(["views", "save", "Team"]).assert().success();
    assert!(env.data().join("team-views.json").exists());
}

#[test]
fn view_with_unknown_field_is_rejected() {
    let env = Env::new();
    fs::write(
        env.data().join("content-custom-views.json"),
        r#"[{"id": "view-1-abc", "name": "Bad",
             "filters": [{"id": "1", "field": "bogus", "operator": "contains",
                          "value": "x", "fieldType": "text"}],
             "sorting": [], "showStatusFilter": false, "selectedCmsType": null,
             "createdAt": "2025-01-15T09:30:00.000Z",
             "updatedAt": "2025-01-15T09:30:00.000Z"}]"#,
    )
    .unwrap();

    env.cmd()
        .arg("list")
        .arg("--records")
        .arg(&env.records)
        .args(["--view", "Bad"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: Unknown field: bogus"));
}
