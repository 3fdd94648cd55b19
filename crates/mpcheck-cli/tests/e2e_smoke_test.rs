use std::{fs, path::Path};

use tempfile::tempdir;

use mpcheck::CheckError;
use mpcheck_cli::{Args, Outcome, run};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn component(root: &Path, path: &str, json: &str, axml: &str) {
    for (ext, content) in [("json", json), ("js", ""), ("axml", axml), ("acss", "")] {
        write(root, &format!("{path}.{ext}"), content);
    }
}

fn args(root: &Path) -> Args {
    Args {
        root: root.to_string_lossy().to_string(),
        highlights: Vec::new(),
        config: None,
        report: None,
        log_level: "off".to_string(),
    }
}

/// A small shop project with two pages sharing a card and a registry package.
fn shop(root: &Path) {
    write(
        root,
        "app.json",
        r#"{ "pages": ["pages/home/index", "pages/cart/index"], "window": {} }"#,
    );
    component(
        root,
        "pages/home/index",
        r#"{ "usingComponents": { "card": "/components/card/index", "ui-button": "ui-kit" } }"#,
        "<view class=\"home\">\n  <card title=\"{{ title }}\"/>\n  <ui-button>Buy</ui-button>\n</view>",
    );
    component(
        root,
        "pages/cart/index",
        r#"{ "usingComponents": { "card": "../../components/card/index" } }"#,
        "<scroll-view>\n  <block a:for=\"{{ items }}\"><card/></block>\n</scroll-view>",
    );
    component(root, "components/card/index", "{}", "<view><slot/></view>");
    component(root, "node_modules/ui-kit/index", "{}", "<button><slot/></button>");
}

#[test]
fn e2e_smoke_test_clean_project() {
    let dir = tempdir().expect("Failed to create temp directory");
    shop(dir.path());

    let outcome = run(&args(dir.path())).expect("check should succeed");
    assert_eq!(outcome, Outcome::Clean);
    assert_eq!(outcome.exit_code(), 0);
}

#[test]
fn e2e_smoke_test_fatal_project_exits_non_zero() {
    let dir = tempdir().expect("Failed to create temp directory");
    shop(dir.path());
    write(dir.path(), "pages/cart/index.axml", "<cart-item/>");

    let outcome = run(&args(dir.path())).expect("check should succeed");
    assert_eq!(outcome, Outcome::Fatal);
    assert_eq!(outcome.exit_code(), 1);
}

#[test]
fn e2e_smoke_test_warnings_only() {
    let dir = tempdir().expect("Failed to create temp directory");
    shop(dir.path());
    component(dir.path(), "pages/legacy", "{}", "<view/>");

    let outcome = run(&args(dir.path())).expect("check should succeed");
    assert_eq!(outcome, Outcome::Warnings);
    assert_eq!(outcome.exit_code(), 0);
}

#[test]
fn e2e_smoke_test_report_export() {
    let dir = tempdir().expect("Failed to create temp directory");
    shop(dir.path());
    let report_path = dir.path().join("report.json");

    let args = Args {
        highlights: vec!["components/card".to_string()],
        report: Some(report_path.to_string_lossy().to_string()),
        ..args(dir.path())
    };
    run(&args).expect("check should succeed");

    let json = fs::read_to_string(&report_path).expect("report should be written");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let pages = value["hierarchy"]["children"].as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["name"], "home");
    assert!(pages[0]["color"].is_string());
    assert!(pages[0]["children"][0]["color"].is_null());

    let card = value["graph"]["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|node| node["path"] == "components/card/index")
        .unwrap();
    assert_eq!(card["weight"], 2);
    assert!(value["errors"]["fatal"].as_object().unwrap().is_empty());
}

#[test]
fn e2e_smoke_test_config_from_project_root() {
    let dir = tempdir().expect("Failed to create temp directory");
    shop(dir.path());
    write(dir.path(), "pages/home/index.axml", "<view><lottie/></view>");
    write(
        dir.path(),
        "pages/home/index.json",
        r#"{ "usingComponents": {} }"#,
    );
    write(dir.path(), "mpcheck.toml", "[markup]\nbuiltin_elements = [\"lottie\"]\n");

    // ui-kit is no longer referenced but sits in the registry, so it is no orphan
    let outcome = run(&args(dir.path())).expect("check should succeed");
    assert_eq!(outcome, Outcome::Clean);
}

#[test]
fn e2e_smoke_test_run_errors() {
    let dir = tempdir().expect("Failed to create temp directory");

    let err = run(&args(dir.path())).unwrap_err();
    assert!(matches!(err, CheckError::InvalidProject(_)));

    shop(dir.path());
    let missing_config = Args {
        config: Some(dir.path().join("missing.toml").to_string_lossy().to_string()),
        ..args(dir.path())
    };
    assert!(matches!(run(&missing_config), Err(CheckError::Config(_))));

    let bad_highlight = Args {
        highlights: vec!["../outside".to_string()],
        ..args(dir.path())
    };
    assert!(matches!(run(&bad_highlight), Err(CheckError::Config(_))));
}
