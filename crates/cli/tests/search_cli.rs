use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn setup_tables() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::write(
        root.join("styles.json"),
        r#"[
            {"Style": "Glassmorphism", "Keywords": "glass blur frosted translucent", "Notes": "Layered panels"},
            {"Style": "Brutalism", "Keywords": "raw bold stark", "Notes": "Heavy type"},
            {"Style": "Retro", "Keywords": "vintage pixel retro", "Notes": "8-bit palettes"}
        ]"#,
    )
    .unwrap();
    fs::write(
        root.join("colors.csv"),
        "Palette,Keywords\nOcean,blue teal calm\nSunset,orange red warm\n",
    )
    .unwrap();
    fs::write(
        root.join("tables.json"),
        r#"{
            "default_domain": "style",
            "domains": [
                {"name": "style", "file": "styles.json", "search_columns": ["Style", "Keywords"],
                 "output_columns": ["Style", "Notes"], "keywords": ["style", "glass", "retro"]},
                {"name": "color", "file": "colors.csv", "search_columns": ["Palette", "Keywords"],
                 "output_columns": ["Palette"], "keywords": ["color", "palette", "warm"],
                 "max_results": 1}
            ]
        }"#,
    )
    .unwrap();
    temp
}

#[allow(deprecated)]
fn ht_search(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ht-search").expect("binary");
    cmd.current_dir(workdir);
    cmd
}

#[test]
fn markdown_lists_ranked_rows() {
    let temp = setup_tables();
    ht_search(temp.path())
        .args(["frosted glass", "--config", "tables.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**Domain:** style | **Query:** frosted glass"))
        .stdout(predicate::str::contains("### Result 1"))
        .stdout(predicate::str::contains("- **Style:** Glassmorphism"));
}

#[test]
fn domain_is_detected_from_query() {
    let temp = setup_tables();
    let output = ht_search(temp.path())
        .args(["warm palette", "--config", "tables.json", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["domain"], "color");
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["columns"][0]["value"], "Sunset");
}

#[test]
fn explicit_domain_wins() {
    let temp = setup_tables();
    let output = ht_search(temp.path())
        .args(["retro", "--config", "tables.json", "--domain", "color", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["domain"], "color");
    assert_eq!(body["count"], 0);
}

#[test]
fn all_flag_searches_every_domain() {
    let temp = setup_tables();
    let output = ht_search(temp.path())
        .args(["retro warm", "--config", "tables.json", "--all", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["domains"][0]["domain"], "style");
    assert_eq!(body["domains"][0]["count"], 1);
    assert_eq!(body["domains"][1]["domain"], "color");
    assert_eq!(body["domains"][1]["results"][0]["columns"][0]["value"], "Sunset");
    assert_eq!(body["total"], 2);
}

#[test]
fn all_flag_conflicts_with_domain() {
    let temp = setup_tables();
    ht_search(temp.path())
        .args(["retro", "--config", "tables.json", "--all", "--domain", "style"])
        .assert()
        .failure();
}

#[test]
fn missing_config_fails() {
    let temp = tempdir().unwrap();
    ht_search(temp.path())
        .args(["anything", "--config", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read table config"));
}
